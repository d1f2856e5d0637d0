//! Parse error types.
//!
//! Lexical and syntax errors share one shape so that an error thrown by a
//! strict parse and one collected by a tolerant parse compare equal.

use serde::Serialize;
use thiserror::Error;

/// The kind of error raised while reading source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed token: bad escape, unterminated literal or comment,
    /// invalid regular expression flags
    LexicalError,
    /// Grammar violation: unexpected token, illegal break/continue target,
    /// duplicate binding, strict mode violation
    SyntaxError,
}

/// An error located in the source text.
///
/// `message` is `description` prefixed with `Line N: `.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, ParseError};
///
/// let err = ParseError::new(ErrorKind::SyntaxError, 4, 1, 4, "Unexpected token <");
/// assert_eq!(err.message, "Line 1: Unexpected token <");
/// assert_eq!(err.to_string(), err.message);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ParseError {
    /// Error kind, serialized as `name`
    #[serde(rename = "name")]
    pub kind: ErrorKind,
    /// Human readable message including the line prefix
    pub message: String,
    /// Message without the line prefix
    pub description: String,
    /// Byte offset of the offending position
    pub index: usize,
    /// Line number (1-based)
    pub line_number: u32,
    /// Column number (0-based)
    pub column: u32,
}

impl ParseError {
    /// Create an error at the given location.
    pub fn new(
        kind: ErrorKind,
        index: usize,
        line_number: u32,
        column: u32,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            kind,
            message: format!("Line {}: {}", line_number, description),
            description,
            index,
            line_number,
            column,
        }
    }

    /// True for errors raised by the scanner.
    pub fn is_lexical(&self) -> bool {
        self.kind == ErrorKind::LexicalError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefix() {
        let err = ParseError::new(ErrorKind::LexicalError, 0, 3, 0, "Unexpected token ILLEGAL");
        assert_eq!(err.message, "Line 3: Unexpected token ILLEGAL");
        assert!(err.is_lexical());
    }

    #[test]
    fn test_serialized_shape() {
        let err = ParseError::new(ErrorKind::SyntaxError, 7, 2, 1, "Unexpected identifier");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["name"], "SyntaxError");
        assert_eq!(json["lineNumber"], 2);
        assert_eq!(json["index"], 7);
        assert_eq!(json["description"], "Unexpected identifier");
    }
}
