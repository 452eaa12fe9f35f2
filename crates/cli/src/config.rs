//! CLI configuration file.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stage delays for simulated invitation sends, in milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct InviteDelays {
    pub preparing: u64,
    pub generating_link: u64,
    pub sending: u64,
}

impl Default for InviteDelays {
    fn default() -> Self {
        Self {
            preparing: 1000,
            generating_link: 1000,
            sending: 1500,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CliConfig {
    /// Where stored collections live; `None` means `~/.fynkr/data` wherever
    /// the config file is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Origin used in client invite links
    pub invite_base_url: String,
    /// Simulated payment processing time
    pub payment_delay_ms: u64,
    pub invite_stage_delays_ms: InviteDelays,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
            invite_base_url: "http://localhost:5173".to_string(),
            payment_delay_ms: 2000,
            invite_stage_delays_ms: InviteDelays::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self)?)?;
        Ok(())
    }

    /// `~/.fynkr`, or `.fynkr` when there is no home directory.
    pub fn home() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".fynkr"))
            .unwrap_or_else(|| PathBuf::from(".fynkr"))
    }

    pub fn default_path() -> PathBuf {
        Self::home().join("config.json")
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| Self::home().join("data"))
    }
}
