//! Shared value-level helpers.
//!
//! Parsing predicates used by type inference, the scorer and the imputer live
//! here so every stage agrees on what "parses as an integer" means.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

// Basic local@domain.tld shape, compiled once.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid regex: email")
});

// =============================================================================
// Parsing Predicates
// =============================================================================

/// Parse a whole number with an optional sign.
///
/// ```rust,ignore
/// assert_eq!(parse_integer(" -42 "), Some(-42));
/// assert_eq!(parse_integer("4.0"), None);
/// ```
pub fn parse_integer(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Parse a finite decimal number. `NaN` and infinities are rejected.
pub fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a date or date-time with a chrono format string.
///
/// Date-only formats yield midnight of that day.
pub fn parse_date(s: &str, format: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    NaiveDateTime::parse_from_str(trimmed, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Check a value against the basic email shape.
pub fn is_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s.trim())
}

/// Form used to compare text values for equality: trimmed and case-folded.
#[inline]
pub fn normalize_for_comparison(s: &str) -> String {
    s.trim().to_lowercase()
}

// =============================================================================
// Statistics
// =============================================================================

/// Median of a list of numbers; the mean of the two middle values for an even
/// count. `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value. Ties go to the value seen first.
pub fn mode<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&'a str, usize)> = None;
    for value in order {
        let count = counts[value];
        // strictly greater keeps the earliest value on ties
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Render a number the way a float column would spell it.
pub fn format_float(value: f64) -> String {
    format!("{}", value)
}

// =============================================================================
// Tests
// =============================================================================
