use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading, writing or storing save records
#[derive(Debug, Error)]
pub enum SaveError {
    /// File missing, unreadable or unwritable
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode save record: {0}")]
    Encode(#[source] serde_json::Error),

    /// Bytes on disk are not a save record in the expected encoding
    #[error("Failed to decode save file {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// Decoded record is missing required fields or uses a newer format
    #[error("Save file {} is not valid: {reason}", .path.display())]
    Validation { path: PathBuf, reason: String },

    #[error("Encoded save is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("Slot {number} is outside 1..={count}")]
    SlotOutOfRange { number: u32, count: u32 },

    #[error("No save slot is selected")]
    NoSlotSelected,

    #[error("Invalid save file naming pattern: {0}")]
    Naming(#[from] regex::Error),
}

impl SaveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SaveError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from the file not existing
    pub fn is_not_found(&self) -> bool {
        matches!(self, SaveError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
