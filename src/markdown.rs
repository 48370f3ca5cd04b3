//! Markdown rendering for chat content.
//!
//! Converts untrusted markdown to HTML that is safe to insert into the
//! page, and hydrates document elements that carry raw markdown in a
//! `data-markdown` attribute. Rendering is best-effort by contract:
//! every failure path degrades to HTML-escaped text, so a bad message
//! can never break the hosting page.

use pulldown_cmark::{Options, Parser, html};
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::config::{DEFAULT_MARKDOWN_SELECTOR, MARKDOWN_ATTR, MARKDOWN_CLASS};
use crate::dom::{console_error, console_warn, document, on_content_loaded};
use crate::error::ParseError;

// =============================================================================
// Capability Seams
// =============================================================================

/// A markdown-to-HTML conversion capability.
pub trait MarkdownParser {
    /// Convert markdown text to an HTML string.
    fn parse(&self, markdown: &str) -> Result<String, ParseError>;
}

/// An HTML sanitization capability.
pub trait HtmlSanitizer {
    /// Reduce an HTML string to a safe-to-insert subset.
    fn sanitize(&self, html: &str) -> String;
}

/// Default parser backed by `pulldown-cmark`.
///
/// Supports extended markdown syntax including:
/// - Strikethrough (`~~text~~`)
/// - Tables
/// - Footnotes
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkParser;

impl MarkdownParser for CmarkParser {
    fn parse(&self, markdown: &str) -> Result<String, ParseError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);

        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        Ok(html_output)
    }
}

/// Default sanitizer backed by `ammonia`.
///
/// Whitelist-based: safe tags (like `<p>`, `<strong>`) survive, while
/// script-capable elements and attributes are stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmmoniaSanitizer;

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> String {
        ammonia::clean(html)
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Markdown renderer with injectable parser and sanitizer capabilities.
///
/// [`MarkdownRenderer::new`] installs the defaults. [`with_parts`] takes
/// explicit capabilities, where `None` models a host without that
/// capability: a missing parser switches [`render`] to the escaped
/// fallback, a missing sanitizer passes converted HTML through as-is.
///
/// [`with_parts`]: MarkdownRenderer::with_parts
/// [`render`]: MarkdownRenderer::render
pub struct MarkdownRenderer {
    parser: Option<Box<dyn MarkdownParser>>,
    sanitizer: Option<Box<dyn HtmlSanitizer>>,
}

impl MarkdownRenderer {
    /// Renderer with the default parser and sanitizer installed.
    pub fn new() -> Self {
        Self {
            parser: Some(Box::new(CmarkParser)),
            sanitizer: Some(Box::new(AmmoniaSanitizer)),
        }
    }

    /// Renderer with explicit capabilities.
    pub fn with_parts(
        parser: Option<Box<dyn MarkdownParser>>,
        sanitizer: Option<Box<dyn HtmlSanitizer>>,
    ) -> Self {
        Self { parser, sanitizer }
    }

    /// Convert markdown to HTML for insertion into the page.
    ///
    /// Never fails. A missing parser or a conversion error degrades to
    /// [`escape_html`] output with newlines turned into `<br>`; a
    /// missing sanitizer returns the converted HTML unsanitized and
    /// logs a warning.
    pub fn render(&self, markdown: &str) -> String {
        let Some(parser) = self.parser.as_deref() else {
            console_warn("markdown parser unavailable, falling back to escaped text");
            return escaped_fallback(markdown);
        };

        let html = match parser.parse(markdown) {
            Ok(html) => html,
            Err(err) => {
                console_error(&err.to_string());
                return escaped_fallback(markdown);
            }
        };

        match self.sanitizer.as_deref() {
            Some(sanitizer) => sanitizer.sanitize(&html),
            None => {
                console_warn("html sanitizer unavailable, inserting unsanitized output");
                html
            }
        }
    }

    /// Hydrate a single element carrying markdown in `data-markdown`.
    ///
    /// The attribute value is entity-decoded first to recover the
    /// markdown source stored HTML-escaped by the producer. Elements
    /// without the attribute, or with an empty value, are left
    /// untouched.
    pub fn render_one(&self, element: &Element) {
        let Some(markdown) = element.get_attribute(MARKDOWN_ATTR) else {
            return;
        };
        if markdown.is_empty() {
            return;
        }
        element.set_inner_html(&self.render(&decode_entities(&markdown)));
    }

    /// Hydrate every element under `container` matching `selector`.
    ///
    /// Elements that fail the attribute check are skipped; one bad
    /// element never aborts the batch.
    pub fn render_all_in(&self, container: &Element, selector: &str) {
        let Ok(elements) = container.query_selector_all(selector) else {
            console_warn(&format!("invalid markdown selector: {selector}"));
            return;
        };
        for index in 0..elements.length() {
            if let Some(node) = elements.item(index)
                && let Ok(element) = node.dyn_into::<Element>()
            {
                self.render_one(&element);
            }
        }
    }

    /// Hydrate the whole document with the default selector.
    pub fn render_document(&self) {
        if let Some(document) = document()
            && let Some(root) = document.document_element()
        {
            self.render_all_in(&root, DEFAULT_MARKDOWN_SELECTOR);
        }
    }

    /// Run [`render_document`] once the document's content is parsed.
    ///
    /// Explicit opt-in initialization for hosts that ship markdown in
    /// the initial page: call this once at startup. Fires at most once.
    ///
    /// [`render_document`]: MarkdownRenderer::render_document
    pub fn run_at_ready(self) {
        on_content_loaded(move || self.render_document());
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Escaping
// =============================================================================

/// Escape all HTML-significant characters so `text` displays literally.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Resolve HTML character references back to literal characters.
///
/// Handles the named entities produced by [`escape_html`] plus numeric
/// references in decimal (`&#39;`) and hex (`&#x27;`) form. Anything
/// unrecognized passes through unchanged. Inverse of [`escape_html`]:
/// `decode_entities(&escape_html(s)) == s` for every `s`.
pub fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        decoded.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_reference(rest) {
            Some((ch, consumed)) => {
                decoded.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Longest reference worth scanning for: `&#x10FFFF;` plus slack.
const MAX_REFERENCE_LEN: usize = 12;

/// Decode one `&...;` reference at the start of `text`.
///
/// Returns the character and the byte length consumed, or `None` when
/// the text does not begin with a recognizable reference.
fn decode_reference(text: &str) -> Option<(char, usize)> {
    let end = text
        .char_indices()
        .take(MAX_REFERENCE_LEN)
        .find(|&(_, ch)| ch == ';')
        .map(|(index, _)| index)?;
    let body = &text[1..end];

    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((ch, end + 1))
}

/// Fallback rendering: escaped text with explicit line breaks.
fn escaped_fallback(markdown: &str) -> String {
    escape_html(markdown).replace('\n', "<br>")
}

// =============================================================================
// Carrier Fragment
// =============================================================================

/// Build the carrier element that [`MarkdownRenderer::render_all_in`]
/// later hydrates.
///
/// The markdown source is stored HTML-escaped in the `data-markdown`
/// attribute, so the element is inert until hydration and the attribute
/// value round-trips through [`decode_entities`].
pub fn host_fragment(markdown: &str) -> String {
    format!(
        "<div class=\"message-text {MARKDOWN_CLASS}\" {MARKDOWN_ATTR}=\"{}\"></div>",
        escape_html(markdown)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingParser;

    impl MarkdownParser for FailingParser {
        fn parse(&self, _markdown: &str) -> Result<String, ParseError> {
            Err(ParseError::new("boom"))
        }
    }

    struct TaggingSanitizer;

    impl HtmlSanitizer for TaggingSanitizer {
        fn sanitize(&self, html: &str) -> String {
            format!("[clean]{html}")
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(
            escape_html("\"quoted\" 'single'"),
            "&quot;quoted&quot; &#39;single&#39;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_escape_html_leaves_no_significant_chars() {
        let escaped = escape_html("<a href=\"x\">&'</a>");
        assert_eq!(escaped, "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
        for ch in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(ch));
        }
    }

    #[test]
    fn test_decode_entities_round_trip() {
        let cases = [
            "",
            "plain",
            "<b>&amp;</b>",
            "a & b < c > d \"e\" 'f'",
            "&#39; already encoded",
            "line\nbreak",
            "unicode: caf\u{e9} \u{1f600}",
        ];
        for case in cases {
            assert_eq!(decode_entities(&escape_html(case)), case);
        }
    }

    #[test]
    fn test_decode_numeric_references() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&apos;&nbsp;"), "'\u{a0}");
        assert_eq!(decode_entities("&#x1F600;"), "\u{1f600}");
    }

    #[test]
    fn test_decode_leaves_unknown_references() {
        let input = "&bogus; & &#xZZ; &unterminated";
        assert_eq!(decode_entities(input), input);
    }

    #[test]
    fn test_render_without_parser_escapes() {
        let renderer = MarkdownRenderer::with_parts(None, None);
        let input = "**bold** & <script>\nnext";
        assert_eq!(
            renderer.render(input),
            "**bold** &amp; &lt;script&gt;<br>next"
        );
    }

    #[test]
    fn test_render_parser_failure_matches_missing_parser() {
        let failing = MarkdownRenderer::with_parts(
            Some(Box::new(FailingParser)),
            Some(Box::new(AmmoniaSanitizer)),
        );
        let missing = MarkdownRenderer::with_parts(None, None);
        let input = "a <b>\nc";
        assert_eq!(failing.render(input), missing.render(input));
    }

    #[test]
    fn test_render_sanitizes_script_markup() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("hello <script>alert(1)</script>");
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("hello"));
    }

    #[test]
    fn test_render_plain_markdown() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("# Title\n\nbody **bold**");
        assert!(rendered.contains("<h1>"));
        assert!(rendered.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_extended_syntax() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("~~gone~~");
        assert!(rendered.contains("<del>gone</del>"));
    }

    #[test]
    fn test_render_never_fails_on_degenerate_input() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(renderer.render(""), "");
        // Whitespace-only input renders to empty or whitespace markup,
        // but must not panic.
        let _ = renderer.render("   \n\t  ");
    }

    #[test]
    fn test_render_applies_injected_sanitizer() {
        let renderer = MarkdownRenderer::with_parts(
            Some(Box::new(CmarkParser)),
            Some(Box::new(TaggingSanitizer)),
        );
        assert!(renderer.render("x").starts_with("[clean]"));
    }

    #[test]
    fn test_render_without_sanitizer_passes_through() {
        let renderer = MarkdownRenderer::with_parts(Some(Box::new(CmarkParser)), None);
        assert_eq!(renderer.render("plain *em*"), "<p>plain <em>em</em></p>\n");
    }

    #[test]
    fn test_host_fragment_round_trips_source() {
        let markdown = "**bold** & \"quotes\"\n- item";
        let fragment = host_fragment(markdown);
        assert!(fragment.starts_with("<div class=\"message-text rendered-markdown\" data-markdown=\""));
        assert!(fragment.ends_with("\"></div>"));

        let value = fragment
            .split("data-markdown=\"")
            .nth(1)
            .and_then(|rest| rest.strip_suffix("\"></div>"))
            .unwrap();
        assert!(!value.contains('"'));
        assert_eq!(decode_entities(value), markdown);
    }
}
