//! Unit tests for ParseError and ErrorKind

use core_types::{ErrorKind, ParseError};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_variants() {
        let _lexical = ErrorKind::LexicalError;
        let _syntax = ErrorKind::SyntaxError;
    }

    #[test]
    fn test_error_kind_serializes_by_name() {
        let json = serde_json::to_value(ErrorKind::LexicalError).unwrap();
        assert_eq!(json, "LexicalError");
    }
}

#[cfg(test)]
mod parse_error_tests {
    use super::*;

    #[test]
    fn test_parse_error_fields() {
        let err = ParseError::new(ErrorKind::SyntaxError, 12, 2, 3, "Unexpected token )");
        assert_eq!(err.index, 12);
        assert_eq!(err.line_number, 2);
        assert_eq!(err.column, 3);
        assert_eq!(err.description, "Unexpected token )");
        assert_eq!(err.message, "Line 2: Unexpected token )");
        assert!(!err.is_lexical());
    }

    #[test]
    fn test_parse_error_display_is_message() {
        let err = ParseError::new(ErrorKind::LexicalError, 0, 1, 0, "Unexpected token ILLEGAL");
        assert_eq!(format!("{}", err), "Line 1: Unexpected token ILLEGAL");
    }

    #[test]
    fn test_parse_error_is_std_error() {
        let err = ParseError::new(ErrorKind::SyntaxError, 0, 1, 0, "Unexpected end of input");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.to_string().contains("Unexpected end of input"));
    }

    #[test]
    fn test_equal_errors_compare_equal() {
        let a = ParseError::new(ErrorKind::SyntaxError, 3, 1, 3, "Unexpected number");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_shape_keys() {
        let err = ParseError::new(ErrorKind::SyntaxError, 1, 1, 1, "Unexpected string");
        let json = serde_json::to_value(&err).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["column", "description", "index", "lineNumber", "message", "name"]
        );
    }
}
