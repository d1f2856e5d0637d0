//! ECMAScript parser producing ESTree-shaped syntax trees.
//!
//! Parses scripts and modules (with optional JSX) into a typed AST that
//! serializes to the ESTree JSON layout, or splits source text into tokens.
//!
//! # Overview
//!
//! - [`parse`], [`parse_script`], [`parse_module`] - source text to [`Program`]
//! - [`parse_with_delegate`] - parse, handing every finished node to a [`Delegate`]
//! - [`tokenize`], [`tokenize_with`] - source text to a [`TokenList`]
//! - [`Options`] - location tracking, comments, tolerant mode, JSX, ...
//! - [`ast`] - the node types
//! - [`ParseError`] - the located error returned by every entry point
//!
//! # Example
//!
//! ```
//! use esparse::{parse_script, Options};
//!
//! let program = parse_script("let answer = 42;", Options::new().with_range(true)).unwrap();
//! let json = serde_json::to_value(&program).unwrap();
//! assert_eq!(json["body"][0]["type"], "VariableDeclaration");
//! assert_eq!(json["body"][0]["range"], serde_json::json!([0, 16]));
//!
//! let error = parse_script("let = ;", Options::default()).unwrap_err();
//! assert_eq!(error.line_number, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod character;
pub mod comment_handler;
pub mod delegate;
pub mod error_handler;
pub(crate) mod messages;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod tokenizer;
pub mod visit;

pub use ast::{Node, Program};
pub use comment_handler::attach_comments;
pub use core_types::{ErrorKind, ParseError};
pub use delegate::Delegate;
pub use options::{Options, SourceType};
pub use parser::Parser;
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize_with, TokenList, Tokenizer};
pub use visit::NodeMut;

/// Parse `source` with the grammar selected by `options.source_type`.
pub fn parse(source: &str, options: Options) -> Result<Program, ParseError> {
    let program = Parser::new(source, options.clone()).parse_program()?;
    Ok(finish(program, &options))
}

/// Parse `source` as a classic script.
pub fn parse_script(source: &str, options: Options) -> Result<Program, ParseError> {
    parse(source, options.with_source_type(SourceType::Script))
}

/// Parse `source` as an ES module.
pub fn parse_module(source: &str, options: Options) -> Result<Program, ParseError> {
    parse(source, options.with_source_type(SourceType::Module))
}

/// Parse `source`, passing each node to `delegate` as soon as it is finished.
///
/// Children are seen before their parents and the [`Program`] last. Nodes
/// rewritten by the delegate are returned in place of the originals.
/// Comments are attached after the delegate has seen the whole tree.
pub fn parse_with_delegate(
    source: &str,
    options: Options,
    delegate: &mut dyn Delegate,
) -> Result<Program, ParseError> {
    let program = Parser::new(source, options.clone())
        .with_delegate(delegate)
        .parse_program()?;
    Ok(finish(program, &options))
}

/// Split `source` into tokens.
pub fn tokenize(source: &str, options: Options) -> Result<TokenList<Token>, ParseError> {
    tokenize_with(source, options, |token| token)
}

/// Attach comments and drop the comment list unless it was asked for.
fn finish(mut program: Program, options: &Options) -> Program {
    if options.attach_comment {
        let comments = program.comments.take().unwrap_or_default();
        attach_comments(&mut program, &comments);
        if options.comment {
            program.comments = Some(comments);
        }
    }
    program
}
