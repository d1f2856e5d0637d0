//! Source positions, ranges and locations.
//!
//! The scanner keeps a [`SourcePosition`] (offset, line and column) for every
//! token boundary. Nodes keep the [`Span`] between two such positions and, on
//! request, expose it as an ESTree `range` ([`Range`]) and/or `loc`
//! ([`Location`]).

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

/// A point in the source text.
///
/// `offset` is a byte offset into the source string, `line` is 1-based and
/// `column` is the 0-based byte distance from the start of the line.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition {
///     line: 2,
///     column: 4,
///     offset: 15,
/// };
///
/// assert_eq!(pos.location().line, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based)
    pub column: u32,
    /// Byte offset from the start of the source
    pub offset: usize,
}

impl SourcePosition {
    /// The position at the very start of a source text.
    pub const START: SourcePosition = SourcePosition {
        line: 1,
        column: 0,
        offset: 0,
    };

    /// Line/column view of this position.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
        }
    }
}

/// Line/column pair as it appears inside an ESTree `loc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based)
    pub column: u32,
}

/// The `loc` record of a node, token or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Where the construct starts
    pub start: SourceLocation,
    /// Where the construct ends (exclusive)
    pub end: SourceLocation,
    /// Caller-supplied file name, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Half-open byte range `[start, end)`, serialized as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Range {
    /// Create a range from two offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the range covers nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `other` lies entirely inside this range.
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl Serialize for Range {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.start)?;
        tuple.serialize_element(&self.end)?;
        tuple.end()
    }
}

/// Start and end positions of a syntactic construct.
///
/// Always tracked internally; only surfaced as `range`/`loc` when requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position
    pub start: SourcePosition,
    /// End position (exclusive)
    pub end: SourcePosition,
}

impl Span {
    /// Create a span from two positions.
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Byte range covered by this span.
    pub fn range(&self) -> Range {
        Range::new(self.start.offset, self.end.offset)
    }

    /// `loc` record for this span, stamped with an optional file name.
    pub fn location(&self, source: Option<&str>) -> Location {
        Location {
            start: self.start.location(),
            end: self.end.location(),
            source: source.map(str::to_string),
        }
    }
}
