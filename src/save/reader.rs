use std::path::{Path, PathBuf};

use super::encoding::SaveEncoding;
use super::error::SaveError;
use super::naming::SaveFileNaming;
use super::record::SaveRecord;

/// Result of reading every slot file in a directory
#[derive(Debug, Default)]
pub struct BulkRead {
    /// Successfully read records keyed by the slot number in their file name
    pub records: Vec<(u32, SaveRecord)>,
    /// Files that matched the naming pattern but could not be read
    pub failures: Vec<SaveError>,
}

/// Reads and validates save files
#[derive(Debug, Clone)]
pub struct SaveReader {
    encoding: SaveEncoding,
    max_bytes: u64,
    naming: SaveFileNaming,
}

impl SaveReader {
    pub fn new(encoding: SaveEncoding, max_bytes: u64, naming: SaveFileNaming) -> Self {
        Self {
            encoding,
            max_bytes,
            naming,
        }
    }

    pub fn naming(&self) -> &SaveFileNaming {
        &self.naming
    }

    /// Read one save file and check it is resumable
    pub fn read(&self, path: &Path) -> Result<SaveRecord, SaveError> {
        let size = std::fs::metadata(path)
            .map_err(|e| SaveError::io(path, e))?
            .len();
        if size > self.max_bytes {
            return Err(SaveError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| SaveError::io(path, e))?;
        self.decode(&bytes, path)
    }

    /// Decode and validate bytes read from `path`
    pub fn decode(&self, bytes: &[u8], path: &Path) -> Result<SaveRecord, SaveError> {
        let json = self.encoding.decode(bytes).map_err(|reason| SaveError::Decode {
            path: path.to_path_buf(),
            reason,
        })?;

        let record: SaveRecord =
            serde_json::from_slice(&json).map_err(|e| SaveError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if let Some(reason) = record.validation_problem() {
            return Err(SaveError::Validation {
                path: path.to_path_buf(),
                reason,
            });
        }

        Ok(record)
    }

    /// Read every file in `dir` whose name fits the slot naming pattern.
    ///
    /// Non-matching files are skipped silently; matching files that fail to
    /// read are collected in `failures` without stopping the scan.
    pub fn read_all(&self, dir: &Path) -> Result<BulkRead, SaveError> {
        let entries = std::fs::read_dir(dir).map_err(|e| SaveError::io(dir, e))?;

        let mut candidates: Vec<(u32, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name();
                let slot = self.naming.slot_number(name.to_str()?)?;
                Some((slot, entry.path()))
            })
            .collect();
        candidates.sort();

        let mut bulk = BulkRead::default();
        for (slot, path) in candidates {
            match self.read(&path) {
                Ok(mut record) => {
                    if record.slot_number != slot {
                        tracing::debug!(
                            path = %path.display(),
                            recorded = record.slot_number,
                            slot,
                            "Save file slot differs from its name, using the name"
                        );
                        record.slot_number = slot;
                    }
                    bulk.records.push((slot, record));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable save file");
                    bulk.failures.push(e);
                }
            }
        }

        Ok(bulk)
    }
}
