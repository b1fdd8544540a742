use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bencode::{DecodeOptions, DuplicateKeys, MAX_DEPTH};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "bencode.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_depth: usize,
    pub strict_integers: bool,
    pub duplicate_keys: DuplicateKeys,
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            strict_integers: false,
            duplicate_keys: DuplicateKeys::LastWins,
            pretty: false,
        }
    }
}

impl Config {
    /// Loads `path` if given (it must exist), otherwise `bencode.toml` when
    /// present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))
            }
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
            strict_integers: self.strict_integers,
            duplicate_keys: self.duplicate_keys,
        }
    }
}
