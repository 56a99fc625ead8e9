//! Configuration type definitions

use std::path::Path;

use serde::Deserialize;

use crate::error::ScaffoldResult;
use crate::fs::DEFAULT_FILE_MODE;

use super::loader::{self, ConfigWarning};

/// What to do with an existing file that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Replace the file with a freshly bootstrapped one and log a warning
    #[default]
    Regenerate,
    /// Fail the sync and leave the file untouched
    Abort,
}

impl ParseErrorPolicy {
    pub const VALUES: &'static [&'static str] = &["regenerate", "abort"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "regenerate" => Some(Self::Regenerate),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }
}

/// Sync configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub on_parse_error: ParseErrorPolicy,

    /// Unix permission bits for written files
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,

    /// Skip the write when the printed file equals what is on disk
    #[serde(default = "default_true")]
    pub skip_unchanged: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            on_parse_error: ParseErrorPolicy::default(),
            file_mode: DEFAULT_FILE_MODE,
            skip_unchanged: true,
        }
    }
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// `tracing-subscriber` env-filter directive
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ScaffoldResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ScaffoldResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `scaffold.toml` from the project root, or defaults when absent,
    /// then apply environment overrides.
    pub fn load_or_default(project_root: &Path) -> ScaffoldResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (SCAFFOLD_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |name| std::env::var(name).ok())
    }
}
