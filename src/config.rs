//! Markup contract constants.
//!
//! Centralizes the selector, attribute, and CSS class names shared by the
//! markdown renderer and the timestamp fragment builders. Consumers that
//! produce or query this markup themselves should use these constants
//! rather than repeating the literals.

// =============================================================================
// Markdown Hydration
// =============================================================================

/// Class marking elements whose content is client-rendered markdown.
pub const MARKDOWN_CLASS: &str = "rendered-markdown";

/// Attribute carrying the raw (HTML-escaped) markdown source.
pub const MARKDOWN_ATTR: &str = "data-markdown";

/// Default batch-hydration selector: marked elements that carry source.
pub const DEFAULT_MARKDOWN_SELECTOR: &str = ".rendered-markdown[data-markdown]";

// =============================================================================
// Timestamp Fragments
// =============================================================================

/// Base class applied to every timestamp fragment.
pub const TIMESTAMP_CLASS: &str = "message-timestamp";

/// Attribute carrying the machine-readable ISO 8601 time.
pub const TIME_ATTR: &str = "data-time";
