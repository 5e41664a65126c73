use regex::Regex;

use super::error::SaveError;

/// Slot file names: `{prefix}_0{slot}.{extension}`
#[derive(Debug, Clone)]
pub struct SaveFileNaming {
    prefix: String,
    extension: String,
    pattern: Regex,
}

impl SaveFileNaming {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Result<Self, SaveError> {
        let prefix = prefix.into();
        let extension = extension.into().trim_start_matches('.').to_string();
        let suffix = if extension.is_empty() {
            String::new()
        } else {
            regex::escape(&format!(".{extension}"))
        };
        let pattern = Regex::new(&format!(r"^{}_0(\d+){}$", regex::escape(&prefix), suffix))?;
        Ok(Self {
            prefix,
            extension,
            pattern,
        })
    }

    pub fn file_name(&self, slot_number: u32) -> String {
        if self.extension.is_empty() {
            format!("{}_0{}", self.prefix, slot_number)
        } else {
            format!("{}_0{}.{}", self.prefix, slot_number, self.extension)
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.slot_number(file_name).is_some()
    }

    /// Slot number encoded in `file_name`, `None` if the name does not fit.
    ///
    /// Only the canonical spelling counts, so `save_001.json` is not a
    /// second file for slot 1.
    pub fn slot_number(&self, file_name: &str) -> Option<u32> {
        let number: u32 = self
            .pattern
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())?;
        (self.file_name(number) == file_name).then_some(number)
    }
}
