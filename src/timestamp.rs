//! Timestamp formatting for chat messages.
//!
//! Produces the human-readable (short and long) and machine-readable
//! (ISO 8601) forms of a point in time, and the fixed-shape HTML
//! fragments chat views and exports place next to each message. All
//! operations are pure; callers wanting the current time pass
//! `Utc::now()`.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::{TIMESTAMP_CLASS, TIME_ATTR};

/// Which side of the conversation a message belongs to.
///
/// Only controls the CSS classification of the produced fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageRole {
    User,
    #[default]
    Bot,
}

impl MessageRole {
    /// CSS class stem for this role (`user` or `bot`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clock time on a 12-hour dial, e.g. `2:30 PM`.
pub fn format_short(time: DateTime<Utc>) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Full date and time, e.g. `Mar 5, 2024, 2:30 PM`.
pub fn format_long(time: DateTime<Utc>) -> String {
    time.format("%b %-d, %Y, %-I:%M %p").to_string()
}

/// ISO 8601 with milliseconds and UTC designator, e.g.
/// `2024-03-05T14:30:00.000Z`. Machine-sortable and
/// timezone-unambiguous.
pub fn format_iso(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Timestamp fragment for the live chat view.
///
/// The tooltip carries the long form and a `data-time` attribute
/// carries the exact ISO time so the view can re-read it
/// programmatically.
pub fn live_fragment(time: DateTime<Utc>, role: MessageRole) -> String {
    format!(
        "<div class=\"{TIMESTAMP_CLASS} {role}-timestamp\" title=\"{}\" {TIME_ATTR}=\"{}\">{}</div>",
        format_long(time),
        format_iso(time),
        format_short(time),
    )
}

/// Timestamp fragment for frozen exports.
///
/// Same visible text and tooltip as [`live_fragment`], without the
/// machine-readable attribute: an export has no need to re-read the
/// exact timestamp.
pub fn static_fragment(time: DateTime<Utc>, role: MessageRole) -> String {
    format!(
        "<div class=\"{TIMESTAMP_CLASS} {role}-timestamp\" title=\"{}\">{}</div>",
        format_long(time),
        format_short(time),
    )
}
