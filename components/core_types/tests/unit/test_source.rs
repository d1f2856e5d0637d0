//! Unit tests for SourcePosition, Span, Range and Location

use core_types::{Location, Range, SourceLocation, SourcePosition, Span};

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_start() {
        let pos = SourcePosition::START;
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 0);
        assert_eq!(pos.offset, 0);
    }

    #[test]
    fn test_source_position_copy() {
        let pos1 = SourcePosition {
            line: 5,
            column: 10,
            offset: 100,
        };
        let pos2 = pos1;
        assert_eq!(pos1, pos2);
    }
}

#[cfg(test)]
mod range_tests {
    use super::*;

    #[test]
    fn test_range_len_and_empty() {
        assert_eq!(Range::new(4, 9).len(), 5);
        assert!(Range::new(3, 3).is_empty());
        assert!(!Range::new(3, 4).is_empty());
    }

    #[test]
    fn test_range_contains() {
        let outer = Range::new(0, 10);
        assert!(outer.contains(&Range::new(2, 5)));
        assert!(outer.contains(&Range::new(0, 10)));
        assert!(!outer.contains(&Range::new(8, 11)));
    }
}

#[cfg(test)]
mod location_tests {
    use super::*;

    #[test]
    fn test_location_json_without_source() {
        let loc = Location {
            start: SourceLocation { line: 1, column: 0 },
            end: SourceLocation { line: 1, column: 3 },
            source: None,
        };
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["start"]["line"], 1);
        assert_eq!(json["end"]["column"], 3);
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_span_to_location_keeps_lines() {
        let span = Span::new(
            SourcePosition {
                line: 2,
                column: 1,
                offset: 6,
            },
            SourcePosition {
                line: 3,
                column: 0,
                offset: 12,
            },
        );
        let loc = span.location(None);
        assert_eq!(loc.start, SourceLocation { line: 2, column: 1 });
        assert_eq!(loc.end, SourceLocation { line: 3, column: 0 });
        assert_eq!(span.range(), Range::new(6, 12));
    }
}
