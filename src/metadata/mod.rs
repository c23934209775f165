//! Metadata input subsystem.
//!
//! # Data Flow
//! ```text
//! metadata file (delimited rows, row 0 reserved as template)
//!     → reader.rs (row splitting, empty rows skipped)
//!     → record.rs (per-row normalization + shared MintDefaults)
//!     → Vec<MetadataRecord> handed to the mint queue
//! ```

pub mod reader;
pub mod record;

pub use reader::{read_metadata, read_metadata_file, MetadataError};
pub use record::{MetadataRecord, MintDefaults, RecordError};
