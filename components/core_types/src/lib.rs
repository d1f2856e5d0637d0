//! Shared source-location and error types for the ECMAScript front end.
//!
//! # Overview
//!
//! - [`SourcePosition`] - offset/line/column of a point in the source
//! - [`Span`] - start and end positions of a construct
//! - [`Range`] - the ESTree `range` pair
//! - [`Location`] / [`SourceLocation`] - the ESTree `loc` record
//! - [`ParseError`] / [`ErrorKind`] - located lexical and syntax errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, ParseError, SourcePosition, Span};
//!
//! let span = Span::new(SourcePosition::START, SourcePosition { line: 1, column: 5, offset: 5 });
//! assert_eq!(span.range().len(), 5);
//!
//! let error = ParseError::new(ErrorKind::SyntaxError, 5, 1, 5, "Unexpected end of input");
//! assert_eq!(error.line_number, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{ErrorKind, ParseError};
pub use source::{Location, Range, SourceLocation, SourcePosition, Span};
