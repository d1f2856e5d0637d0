//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Grammar selector for the top level of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Classic script: no import/export, sloppy mode unless `"use strict"`
    #[default]
    Script,
    /// ES module: strict, import/export allowed, `await` reserved
    Module,
}

impl SourceType {
    /// `"script"` or `"module"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Script => "script",
            SourceType::Module => "module",
        }
    }
}

/// Options accepted by `parse` and `tokenize`.
///
/// Every flag defaults to `false`, the source type to [`SourceType::Script`].
///
/// # Examples
///
/// ```
/// use esparse::{Options, SourceType};
///
/// let options = Options::new()
///     .with_range(true)
///     .with_source_type(SourceType::Module);
/// assert!(options.range);
///
/// let from_json = Options::from_json(r#"{"range": true, "sourceType": "module"}"#).unwrap();
/// assert_eq!(options, from_json);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Accept JSX syntax in expressions
    pub jsx: bool,
    /// Stamp `loc` on nodes and tokens
    pub loc: bool,
    /// Stamp `range` on nodes and tokens
    pub range: bool,
    /// Record the token list on `Program.tokens`
    pub tokens: bool,
    /// Record comments on `Program.comments`
    pub comment: bool,
    /// Attach comments to nodes as leading/trailing/inner comments
    pub attach_comment: bool,
    /// Keep the source text of literals in `raw`
    pub raw: bool,
    /// Collect recoverable errors on `Program.errors` instead of failing
    pub tolerant: bool,
    /// Top-level grammar
    pub source_type: SourceType,
    /// File name stamped into `loc.source`
    pub source: Option<String>,
}

impl Options {
    /// Default options: script grammar, no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object with camelCase keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Enable or disable JSX.
    pub fn with_jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    /// Enable or disable `loc`.
    pub fn with_loc(mut self, enabled: bool) -> Self {
        self.loc = enabled;
        self
    }

    /// Enable or disable `range`.
    pub fn with_range(mut self, enabled: bool) -> Self {
        self.range = enabled;
        self
    }

    /// Enable or disable the token list.
    pub fn with_tokens(mut self, enabled: bool) -> Self {
        self.tokens = enabled;
        self
    }

    /// Enable or disable comment capture.
    pub fn with_comment(mut self, enabled: bool) -> Self {
        self.comment = enabled;
        self
    }

    /// Enable or disable comment attachment.
    pub fn with_attach_comment(mut self, enabled: bool) -> Self {
        self.attach_comment = enabled;
        self
    }

    /// Enable or disable `raw` on literals.
    pub fn with_raw(mut self, enabled: bool) -> Self {
        self.raw = enabled;
        self
    }

    /// Enable or disable tolerant mode.
    pub fn with_tolerant(mut self, enabled: bool) -> Self {
        self.tolerant = enabled;
        self
    }

    /// Select script or module grammar.
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    /// Set the file name reported in `loc.source`.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Comments are scanned into records when either capture or attachment is on.
    pub(crate) fn tracks_comments(&self) -> bool {
        self.comment || self.attach_comment
    }

    /// The `source` name if `loc` is on, `None` if `loc` is off.
    pub(crate) fn loc_source(&self) -> Option<Option<&str>> {
        self.loc.then(|| self.source.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.source_type, SourceType::Script);
        assert!(!options.range && !options.loc && !options.tolerant);
        assert!(options.loc_source().is_none());
    }

    #[test]
    fn test_from_json_camel_case() {
        let options =
            Options::from_json(r#"{"attachComment": true, "loc": true, "source": "a.js"}"#).unwrap();
        assert!(options.attach_comment);
        assert!(options.tracks_comments());
        assert_eq!(options.loc_source(), Some(Some("a.js")));
    }

    #[test]
    fn test_from_json_rejects_bad_source_type() {
        assert!(Options::from_json(r#"{"sourceType": "commonjs"}"#).is_err());
    }

    #[test]
    fn test_builder_chain() {
        let options = Options::new().with_jsx(true).with_tolerant(true).with_source("x.js");
        assert!(options.jsx && options.tolerant);
        assert_eq!(options.source.as_deref(), Some("x.js"));
    }
}
