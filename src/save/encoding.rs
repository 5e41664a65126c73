use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// On-disk representation of an encoded record.
///
/// The reader is configured with the mode to expect; it never sniffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveEncoding {
    /// Pretty-printed UTF-8 JSON
    #[default]
    Plain,
    /// Base64 over the JSON bytes, so saves are not casually hand-edited
    Obfuscated,
}

impl SaveEncoding {
    pub fn encode(&self, json: Vec<u8>) -> Vec<u8> {
        match self {
            SaveEncoding::Plain => json,
            SaveEncoding::Obfuscated => STANDARD.encode(json).into_bytes(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        match self {
            SaveEncoding::Plain => Ok(bytes.to_vec()),
            SaveEncoding::Obfuscated => STANDARD
                .decode(bytes.trim_ascii())
                .map_err(|e| format!("invalid obfuscated payload: {e}")),
        }
    }
}
