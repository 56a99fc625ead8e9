//! Configuration module for scaffold
//!
//! Settings are resolved in this order:
//! 1. Environment variables (SCAFFOLD_*)
//! 2. Project config (`scaffold.toml` at the project root)
//! 3. Built-in defaults

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{parse_with_warnings, ConfigWarning, CONFIG_FILE_NAME};
pub use types::{Config, LogConfig, ParseErrorPolicy, SyncConfig};
