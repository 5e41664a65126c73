use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::save::{SaveEncoding, SaveError, SaveFileNaming, SaveReader, SaveWriter};
use crate::util::paths::{config_path, saves_dir};

/// Example configuration file contents (bundled with the library)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Save engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding slot files
    pub save_dir: PathBuf,
    /// File name prefix for slot files
    pub file_prefix: String,
    /// File extension for slot files (without the dot)
    pub file_extension: String,
    /// Number of user-facing slots
    pub slot_count: u32,
    /// Encoding mode used for both writing and reading
    pub encoding: SaveEncoding,
    /// Upper bound on an encoded save, in bytes
    pub max_save_bytes: u64,
    /// How long a load waits for the scene-ready notification (None = forever)
    pub scene_ready_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: saves_dir(),
            file_prefix: "save".to_string(),
            file_extension: "json".to_string(),
            slot_count: 5,
            encoding: SaveEncoding::Plain,
            max_save_bytes: 4 * 1024 * 1024,
            scene_ready_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// TOML representation of the `[saves]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSavesConfig {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub extension: Option<String>,
    pub slots: Option<u32>,
    pub encoding: Option<SaveEncoding>,
    pub max_bytes: Option<u64>,
}

/// TOML representation of the `[loader]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLoaderConfig {
    pub scene_ready_timeout_ms: Option<u64>,
}

/// Root TOML configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub saves: Option<TomlSavesConfig>,
    pub loader: Option<TomlLoaderConfig>,
}

impl Config {
    /// Load configuration from the default location, merging with defaults.
    ///
    /// Writes the bundled example on first run.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No config file, using defaults");
                return Config::default();
            }
        };

        match Self::from_toml_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
                Config::default()
            }
        }
    }

    /// Parse a TOML document and merge it over the defaults
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(saves) = toml_config.saves {
            if let Some(dir) = saves.dir {
                config.save_dir = dir;
            }
            if let Some(prefix) = saves.prefix {
                config.file_prefix = prefix;
            }
            if let Some(extension) = saves.extension {
                config.file_extension = extension;
            }
            if let Some(slots) = saves.slots {
                config.slot_count = slots.max(1);
            }
            if let Some(encoding) = saves.encoding {
                config.encoding = encoding;
            }
            if let Some(max_bytes) = saves.max_bytes {
                config.max_save_bytes = max_bytes;
            }
        }

        if let Some(loader) = toml_config.loader {
            if let Some(timeout_ms) = loader.scene_ready_timeout_ms {
                config.scene_ready_timeout = match timeout_ms {
                    0 => None,
                    ms => Some(Duration::from_millis(ms)),
                };
            }
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_save_dir(mut self, dir: PathBuf) -> Self {
        self.save_dir = dir;
        self
    }

    pub fn with_slot_count(mut self, count: u32) -> Self {
        self.slot_count = count.max(1);
        self
    }

    pub fn with_encoding(mut self, encoding: SaveEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_scene_ready_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scene_ready_timeout = timeout;
        self
    }

    pub fn naming(&self) -> Result<SaveFileNaming, SaveError> {
        SaveFileNaming::new(self.file_prefix.clone(), self.file_extension.clone())
    }

    pub fn reader(&self) -> Result<SaveReader, SaveError> {
        Ok(SaveReader::new(
            self.encoding,
            self.max_save_bytes,
            self.naming()?,
        ))
    }

    pub fn writer(&self) -> SaveWriter {
        SaveWriter::new(self.encoding, self.max_save_bytes)
    }
}
