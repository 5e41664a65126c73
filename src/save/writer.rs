use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::encoding::SaveEncoding;
use super::error::SaveError;
use super::record::SaveRecord;

/// Serializes records and replaces destination files atomically
#[derive(Debug, Clone)]
pub struct SaveWriter {
    encoding: SaveEncoding,
    max_bytes: u64,
}

impl SaveWriter {
    pub fn new(encoding: SaveEncoding, max_bytes: u64) -> Self {
        Self {
            encoding,
            max_bytes,
        }
    }

    pub fn encoding(&self) -> SaveEncoding {
        self.encoding
    }

    /// Encode `record` without touching the filesystem
    pub fn encode(&self, record: &SaveRecord) -> Result<Vec<u8>, SaveError> {
        let json = serde_json::to_vec_pretty(record).map_err(SaveError::Encode)?;
        let bytes = self.encoding.encode(json);
        let size = bytes.len() as u64;
        if size > self.max_bytes {
            return Err(SaveError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(bytes)
    }

    /// Write `record` to `destination`.
    ///
    /// The bytes go to a temp file in the destination directory which is then
    /// renamed over the destination, so an existing file is either fully
    /// replaced or left as it was. A record that could not be read back is
    /// refused before anything touches the disk.
    pub fn write(&self, record: &SaveRecord, destination: &Path) -> Result<(), SaveError> {
        if let Some(reason) = record.validation_problem() {
            return Err(SaveError::Validation {
                path: destination.to_path_buf(),
                reason,
            });
        }
        let bytes = self.encode(record)?;

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| SaveError::io(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SaveError::io(dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| SaveError::io(tmp.path(), e))?;
        tmp.persist(destination)
            .map_err(|e| SaveError::io(destination, e.error))?;

        tracing::debug!(
            path = %destination.display(),
            bytes = bytes.len(),
            "Wrote save file"
        );
        Ok(())
    }
}
