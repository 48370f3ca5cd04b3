//! Presentation utilities for chat pages: markdown rendering and
//! message timestamps.
//!
//! Two independent, stateless components:
//!
//! - [`MarkdownRenderer`] - markdown to sanitized HTML with an
//!   escaped-text fallback, plus batch hydration of elements carrying
//!   raw markdown in a `data-markdown` attribute
//! - [`timestamp`] - short / long / ISO 8601 forms of a point in time
//!   and the HTML timestamp fragments used by the live chat view and
//!   frozen exports
//!
//! Rendering is best-effort by contract: no operation surfaces an
//! error to the page. Hosts that ship markdown in the initial document
//! call [`MarkdownRenderer::run_at_ready`] once at startup.

pub mod config;
mod dom;
mod error;
mod markdown;
pub mod timestamp;

pub use error::ParseError;
pub use markdown::{
    AmmoniaSanitizer, CmarkParser, HtmlSanitizer, MarkdownParser, MarkdownRenderer,
    decode_entities, escape_html, host_fragment,
};
pub use timestamp::{
    MessageRole, format_iso, format_long, format_short, live_fragment, static_fragment,
};
