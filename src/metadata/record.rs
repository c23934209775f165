//! Mintable item definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields shared by every record of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MintDefaults {
    /// NFT wallet that mints the items.
    pub wallet_id: u32,
    /// Address receiving royalties on resale.
    pub royalty_address: String,
    /// Royalty share, 0..=100.
    pub royalty_percentage: u16,
    /// Fee per mint in the smallest currency unit.
    pub fee: u64,
}

/// Columns every data row must carry: hash, uris, meta_hash, meta_uris,
/// license_hash, license_uris, edition_number, edition_total. An optional
/// ninth column holds the target address.
pub const REQUIRED_COLUMNS: usize = 8;

/// Why a single row could not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected at least 8 columns, found {0}")]
    TooFewColumns(usize),

    #[error("column '{column}' is not a positive integer: '{value}'")]
    InvalidNumber { column: &'static str, value: String },

    #[error("edition_number {number} exceeds edition_total {total}")]
    EditionOutOfRange { number: u32, total: u32 },

    #[error("column 'uris' must list at least one URI")]
    MissingContentUri,
}

/// One validated unit of work. Serializes to the `nft_mint_nft` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    #[serde(rename = "hash")]
    pub content_hash: String,
    #[serde(rename = "uris")]
    pub content_uris: Vec<String>,
    #[serde(rename = "meta_hash")]
    pub metadata_hash: String,
    #[serde(rename = "meta_uris")]
    pub metadata_uris: Vec<String>,
    pub license_hash: String,
    pub license_uris: Vec<String>,
    pub edition_number: u32,
    pub edition_total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_address: Option<String>,
    #[serde(flatten)]
    pub defaults: MintDefaults,
}

impl MetadataRecord {
    /// Build a record from the cells of row `index`.
    ///
    /// Row 0 is the template row: its cells are kept verbatim, missing cells
    /// are tolerated and its edition fields stay at 1. Data rows must carry
    /// every required column and valid edition numbers. The target column is
    /// read only in targeted mode, and may be absent even then.
    pub fn from_row(
        index: usize,
        cells: &[String],
        defaults: &MintDefaults,
        targets: bool,
    ) -> Result<Self, RecordError> {
        let is_template = index == 0;
        if !is_template && cells.len() < REQUIRED_COLUMNS {
            return Err(RecordError::TooFewColumns(cells.len()));
        }

        let cell = |i: usize| cells.get(i).map(|c| c.trim()).unwrap_or_default();

        let (edition_number, edition_total) = if is_template {
            (1, 1)
        } else {
            let number = parse_edition("edition_number", cell(6))?;
            let total = parse_edition("edition_total", cell(7))?;
            if number > total {
                return Err(RecordError::EditionOutOfRange { number, total });
            }
            (number, total)
        };

        let content_uris = split_uris(cell(1));
        if !is_template && content_uris.is_empty() {
            return Err(RecordError::MissingContentUri);
        }

        let target_address = if targets {
            Some(cell(8)).filter(|t| !t.is_empty()).map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            content_hash: cell(0).to_string(),
            content_uris,
            metadata_hash: cell(2).to_string(),
            metadata_uris: split_uris(cell(3)),
            license_hash: cell(4).to_string(),
            license_uris: split_uris(cell(5)),
            edition_number,
            edition_total,
            target_address,
            defaults: defaults.clone(),
        })
    }

    /// First content URI, used to label the item in logs.
    pub fn label(&self) -> &str {
        self.content_uris.first().map(String::as_str).unwrap_or_default()
    }
}

fn parse_edition(column: &'static str, value: &str) -> Result<u32, RecordError> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(RecordError::InvalidNumber {
            column,
            value: value.to_string(),
        }),
    }
}

/// A URI cell may list several URIs separated by whitespace.
fn split_uris(cell: &str) -> Vec<String> {
    cell.split_whitespace().map(str::to_string).collect()
}
