//! Syntax errors for the Go front end

use thiserror::Error;

/// Why a piece of Go source could not be read into a tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unexpected character '{found}'")]
    UnexpectedChar { line: u32, found: String },

    #[error("line {line}: unexpected '{found}'")]
    UnbalancedDelimiter { line: u32, found: String },

    #[error("line {line}: expected '{expected}', found '{found}'")]
    MismatchedDelimiter {
        line: u32,
        expected: String,
        found: String,
    },

    #[error("line {line}: '{delim}' is never closed")]
    UnclosedDelimiter { line: u32, delim: String },

    #[error("missing package clause")]
    MissingPackage,

    #[error("line {line}: expected {expected}, found '{found}'")]
    Unexpected {
        line: u32,
        expected: String,
        found: String,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("expected exactly one {what}, found {count}")]
    WrongCount { what: &'static str, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_mismatched() {
        let err = ParseError::MismatchedDelimiter {
            line: 4,
            expected: "}".to_string(),
            found: ")".to_string(),
        };
        assert_eq!(err.to_string(), "line 4: expected '}', found ')'");
    }

    #[test]
    fn parse_error_display_missing_package() {
        assert_eq!(ParseError::MissingPackage.to_string(), "missing package clause");
    }
}
