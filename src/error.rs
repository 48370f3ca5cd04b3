//! Error type for the markdown parser seam.

use thiserror::Error;

/// Error returned by an injected `MarkdownParser` implementation.
///
/// The built-in parser never fails; this exists so substituted parsers
/// can report conversion failures. The renderer consumes it internally
/// and masks it with the escaped-text fallback, so it never reaches the
/// hosting page.
#[derive(Debug, Clone, Error)]
#[error("markdown conversion failed: {message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
