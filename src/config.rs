use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::PageLayout;
use crate::pipeline::RetryPolicy;
use crate::services::{ollama_url_from_env, DEFAULT_OLLAMA_URL};

/// Application-level constants
pub const APP_NAME: &str = "DischargeLetter";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SETTINGS_FILE: &str = "settings.json";

/// Get the application data directory: `~/DischargeLetter/`.
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the directory exported letters are written to.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

pub fn settings_path() -> PathBuf {
    app_data_dir().join(SETTINGS_FILE)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "discharge_letter_lib=info,discharge_letter=info,warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cannot write settings file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// User-adjustable settings, stored as JSON. Every field has a default, so
/// a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ollama_url: String,
    pub summary_model: String,
    /// Upper bound on summary length, in words.
    pub summary_max_len: u32,
    pub summary_min_len: u32,
    pub source_lang: String,
    pub target_lang: String,
    pub request_timeout_secs: u64,
    pub retry: RetryPolicy,
    pub layout: PageLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            summary_model: "llama3.2".to_string(),
            summary_max_len: 100,
            summary_min_len: 30,
            source_lang: "auto".to_string(),
            target_lang: "de".to_string(),
            request_timeout_secs: 120,
            retry: RetryPolicy::default(),
            layout: PageLayout::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, then let `OLLAMA_HOST` override the Ollama URL.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = Self::load(path)?;
        settings.ollama_url = ollama_url_from_env(&settings.ollama_url);
        Ok(settings)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_with_env(&settings_path())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(path, json).map_err(write_err)
    }
}
