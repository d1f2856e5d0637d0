//! Strict-fail and tolerant error collection.

use core_types::{ErrorKind, ParseError};
use tracing::debug;

/// Decides whether an error aborts the parse or is recorded and skipped.
///
/// In strict-fail mode [`ErrorHandler::tolerate`] hands the error straight
/// back so that `?` propagates it. In tolerant mode it is appended to the
/// error list and parsing continues.
#[derive(Debug, Default, Clone)]
pub struct ErrorHandler {
    tolerant: bool,
    errors: Vec<ParseError>,
}

impl ErrorHandler {
    /// Create a handler.
    pub fn new(tolerant: bool) -> Self {
        Self {
            tolerant,
            errors: Vec::new(),
        }
    }

    /// True when errors are being collected.
    pub fn is_tolerant(&self) -> bool {
        self.tolerant
    }

    /// Append an error unconditionally.
    pub fn record(&mut self, error: ParseError) {
        debug!(
            line = error.line_number,
            column = error.column,
            description = %error.description,
            "error recorded"
        );
        self.errors.push(error);
    }

    /// Record `error` in tolerant mode, return it otherwise.
    pub fn tolerate(&mut self, error: ParseError) -> Result<(), ParseError> {
        if self.tolerant {
            self.record(error);
            Ok(())
        } else {
            Err(error)
        }
    }

    /// Build a syntax error at a location.
    pub fn create_error(index: usize, line: u32, column: u32, description: &str) -> ParseError {
        ParseError::new(ErrorKind::SyntaxError, index, line, column, description)
    }

    /// Build a lexical error at a location.
    pub fn create_lexical_error(
        index: usize,
        line: u32,
        column: u32,
        description: &str,
    ) -> ParseError {
        ParseError::new(ErrorKind::LexicalError, index, line, column, description)
    }

    /// Errors collected so far.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Take the collected errors, leaving the list empty.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_fail_returns_error() {
        let mut handler = ErrorHandler::new(false);
        let err = ErrorHandler::create_error(3, 1, 3, "Unexpected token ;");
        assert_eq!(handler.tolerate(err.clone()), Err(err));
        assert!(handler.errors().is_empty());
    }

    #[test]
    fn test_tolerant_records_error() {
        let mut handler = ErrorHandler::new(true);
        let err = ErrorHandler::create_lexical_error(0, 1, 0, "Unexpected token ILLEGAL");
        assert!(handler.tolerate(err.clone()).is_ok());
        assert_eq!(handler.take_errors(), vec![err]);
        assert!(handler.errors().is_empty());
    }
}
