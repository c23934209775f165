//! Cursor persistence so an interrupted batch can resume mid-way.
//!
//! The file is rewritten twice per item: once the wallet accepted the mint
//! (recording the remote id as in flight) and once the item resolved. A run
//! killed while confirming therefore resumes by polling the recorded id
//! instead of submitting the item again.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Saved cursor of one metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursor {
    /// Metadata file the cursor belongs to.
    pub metadata_file: PathBuf,
    /// Next queue index to process.
    pub cursor: usize,
    /// Remote id of a submitted but unresolved mint of the item at `cursor`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_flight: Option<String>,
    /// Seconds since epoch of the last save.
    pub updated_at: u64,
}

/// JSON file holding the cursor of the current batch.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
    metadata_file: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>, metadata_file: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata_file: metadata_file.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved cursor if the file exists and belongs to the same
    /// metadata file.
    pub fn load(&self) -> std::io::Result<Option<SavedCursor>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let saved: SavedCursor = serde_json::from_reader(BufReader::new(file))?;

        if saved.metadata_file != self.metadata_file {
            tracing::warn!(
                cursor_file = ?self.path,
                saved_for = ?saved.metadata_file,
                current = ?self.metadata_file,
                "Ignoring cursor saved for a different metadata file"
            );
            return Ok(None);
        }

        tracing::info!(
            cursor = saved.cursor,
            in_flight = ?saved.in_flight,
            cursor_file = ?self.path,
            "Loaded saved cursor"
        );
        Ok(Some(saved))
    }

    /// Persist the cursor, replacing any previous value.
    pub fn save(&self, cursor: usize) -> std::io::Result<()> {
        self.write(cursor, None)
    }

    /// Persist the cursor together with the remote id of the mint submitted
    /// for the item at `cursor`.
    pub fn save_in_flight(&self, cursor: usize, remote_id: &str) -> std::io::Result<()> {
        self.write(cursor, Some(remote_id.to_string()))
    }

    fn write(&self, cursor: usize, in_flight: Option<String>) -> std::io::Result<()> {
        let saved = SavedCursor {
            metadata_file: self.metadata_file.clone(),
            cursor,
            in_flight,
            updated_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        };

        let tmp = self.path.with_extension("tmp");
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(writer, &saved)?;
        }
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(cursor, cursor_file = ?self.path, "Saved cursor");
        Ok(())
    }
}
