//! Free-text date and number extraction.
//!
//! Period labels and release dates arrive as free text in several ad hoc
//! formats (`"1 Dec - 5 Dec 2025"`, `"Highlight of week 22 Dec - 26 Dec
//! 2025"`, `"2025-12-01"`, `"TBD"`). Every extraction routine in the
//! pipeline lives here, and every routine is total: unparseable input maps
//! to an explicit fallback value, never an error.
//!
//! A new format observed in real data is an additive pattern in this module
//! (a new entry in [`RELEASE_DATE_FORMATS`] or a new regex), not a special
//! case at a call site.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Month abbreviations in sort-key order.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Accepted release-date formats, tried in order after RFC 3339.
pub const RELEASE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%m/%d/%Y",
];

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}").unwrap())
}

fn day_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})\s+([A-Za-z]{3})").unwrap())
}

/// Derive a sortable integer key from a period-label string.
///
/// Extracts a 4-digit year anywhere in the label (0 when absent) and the
/// first `day month-abbreviation` occurrence (`"22 Dec"`; day 0 / January
/// when absent), then combines them as `year * 10000 + month * 100 + day`.
/// An unrecognized month abbreviation counts as January. Total over all
/// inputs; a label with nothing extractable keys to 0.
pub fn week_range_sort_key(label: &str) -> i64 {
    let year = year_re()
        .find(label)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0);

    let (day, month_index) = match day_month_re().captures(label) {
        Some(caps) => {
            let day = caps[1].parse::<i64>().unwrap_or(0);
            let month = normalize_month(&caps[2]);
            (day, month)
        }
        None => (0, 0),
    };

    year * 10_000 + (month_index + 1) * 100 + day
}

fn normalize_month(abbrev: &str) -> i64 {
    let mut chars = abbrev.chars();
    let normalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => return 0,
    };
    MONTHS
        .iter()
        .position(|m| *m == normalized)
        .map(|idx| idx as i64)
        .unwrap_or(0)
}

/// The first component of a period label split on `" - "`.
///
/// Returns `None` when the label is absent or the component is empty, so
/// callers can fall back to a document display name.
pub fn week_range_start(label: &str) -> Option<&str> {
    let start = label.split(" - ").next().unwrap_or("").trim();
    if start.is_empty() {
        None
    } else {
        Some(start)
    }
}

/// Parse a free-text release date.
///
/// Tries RFC 3339, then each entry of [`RELEASE_DATE_FORMATS`]. Returns
/// `None` when nothing matches; callers decide the fallback (the chart
/// layer treats `None` as "now" so unparseable releases sort last).
pub fn parse_release_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in RELEASE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    None
}

/// Extract an integer from a formatted value string.
///
/// Digit-substring concatenation, not locale-aware parsing: all non-digit
/// characters are stripped and the remainder parsed. `"45 cards"` → 45,
/// `"1,024"` → 1024 (the comma is dropped, not treated as a separator),
/// `"N/A"` → 0, `""` → 0. Values too large for `u64` also fall back to 0.
pub fn extract_count(value: &str) -> u64 {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
