//! Error types for scaffold
//!
//! Uses `thiserror` for library errors; the generation pass wraps them with
//! `anyhow` context.

use std::path::PathBuf;
use thiserror::Error;

use crate::syntax::ParseError;

/// Result type alias for scaffold operations
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Main error type for scaffold operations
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Target file exists but could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing file does not parse and the parse-error policy is `abort`
    #[error("{path} does not parse ({source}); refusing to regenerate it")]
    Unparseable {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A template or element fragment is not valid Go
    #[error("invalid template for {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: ParseError,
    },

    /// The template declares something other than what the request names
    #[error("template for {expected} declares {found}")]
    TemplateMismatch { expected: String, found: String },

    /// Configuration value out of range or malformed
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
