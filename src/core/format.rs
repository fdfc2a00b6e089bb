//! # Formatting
//!
//! Pure helpers that turn message data into display strings:
//! timestamps into clock/date labels, and raw message text into
//! something safe to put on a terminal.
//!
//! Nothing here panics on bad input. An unparseable timestamp or a
//! broken format pattern produces an empty label.

use std::borrow::Cow;
use std::fmt::{self, Write};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// 24-hour clock, e.g. `14:05`.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";
/// Weekday plus full date, e.g. `Monday, Jan 01, 2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%A, %b %d, %Y";

const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Which clock timestamps are displayed in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayZone {
    #[default]
    Local,
    Utc,
}

/// Display patterns for time labels and the date header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormats {
    pub time: String,
    pub date: String,
    pub zone: DisplayZone,
}

impl Default for TimeFormats {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME_FORMAT.to_string(),
            date: DEFAULT_DATE_FORMAT.to_string(),
            zone: DisplayZone::Local,
        }
    }
}

impl TimeFormats {
    /// Clock label for a bubble (`""` if `ts` can't be parsed).
    pub fn time_label(&self, ts: &str) -> String {
        self.label(ts, &self.time)
    }

    /// Label for the transcript date header (`""` if `ts` can't be parsed).
    pub fn date_label(&self, ts: &str) -> String {
        self.label(ts, &self.date)
    }

    fn label(&self, ts: &str, pattern: &str) -> String {
        let Some(instant) = parse_timestamp(ts, self.zone) else {
            return String::new();
        };
        match self.zone {
            DisplayZone::Local => render(instant.with_timezone(&Local), pattern),
            DisplayZone::Utc => render(instant, pattern),
        }
    }
}

/// Parses an RFC 3339 timestamp, falling back to a naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` read in the display zone.
pub fn parse_timestamp(ts: &str, zone: DisplayZone) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(ts, NAIVE_TIMESTAMP_FORMAT).ok()?;
    match zone {
        DisplayZone::Utc => Some(Utc.from_utc_datetime(&naive)),
        DisplayZone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Formats into a fresh string. chrono reports an invalid pattern as a
/// `fmt::Error`, which we turn into an empty label.
fn render<Tz: TimeZone>(instant: DateTime<Tz>, pattern: &str) -> String
where
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    match write!(out, "{}", instant.format(pattern)) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

/// Hour:minute in local time.
pub fn format_time(ts: &str) -> String {
    TimeFormats::default().time_label(ts)
}

/// Weekday and full date in local time.
pub fn format_date_header(ts: &str) -> String {
    TimeFormats::default().date_label(ts)
}

/// Current instant as an RFC 3339 string with millisecond precision and a `Z` suffix.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Makes message text inert for terminal display.
///
/// Text is never interpreted. Control characters (including ESC, so no
/// escape sequences reach the terminal) are replaced with visible Unicode
/// control pictures, `\r\n` collapses to `\n`, and tabs expand to four spaces.
/// Markup-looking content like `<b>` is left exactly as typed.
pub fn display_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => out.push('\n'),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\t' => out.push_str("    "),
            '\u{7f}' => out.push('\u{2421}'),
            c if (c as u32) < 0x20 => {
                out.push(char::from_u32(0x2400 + c as u32).unwrap_or('\u{FFFD}'))
            }
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn needs_escape(c: char) -> bool {
    c != '\n' && c.is_control()
}

/// Caps `text` at `limit` characters, replacing the last kept one with `…`.
/// A limit of 0 means unlimited.
pub fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    if limit == 0 || text.chars().count() <= limit {
        return Cow::Borrowed(text);
    }
    let mut out: String = text.chars().take(limit - 1).collect();
    out.push('…');
    Cow::Owned(out)
}
