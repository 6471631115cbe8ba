//! Note display helpers: titles, timestamps, escaping, and Markdown rendering.
//!
//! Notes arrive from the API with optional fields; everything here degrades
//! to a placeholder ("Untitled", "N/A") instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pulldown_cmark::{Options, Parser};
use once_cell::sync::Lazy;
use regex::Regex;

pub const UNTITLED: &str = "Untitled";
pub const NOT_AVAILABLE: &str = "N/A";

static HEADING_MARKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+\s*").expect("heading pattern"));

// ============================================================================
// Titles
// ============================================================================

/// First line of the content with any leading `#` heading marks removed.
pub fn note_title(content: Option<&str>) -> String {
    let Some(content) = content else {
        return UNTITLED.to_string();
    };
    let first_line = content.lines().next().unwrap_or("");

    let title = HEADING_MARKS.replace(first_line, "").trim().to_string();

    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Parse an API timestamp. Accepts RFC 3339, naive date-times, and bare
/// dates (all read as UTC). Anything else, including the `NA` the crawler
/// writes for failed pages, is treated as missing.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn format_date(value: Option<&str>) -> String {
    match value.and_then(parse_timestamp) {
        Some(dt) => dt.format("%b %-d, %Y %H:%M").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

// ============================================================================
// Text Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Markdown Rendering
// ============================================================================

pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options);
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    // Imported pages may carry raw HTML
    ammonia::clean(&html_output)
}
