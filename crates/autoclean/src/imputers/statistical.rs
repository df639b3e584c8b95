//! Statistical fill values.
//!
//! Each function looks only at the observed (non-missing) values of one column
//! and returns the text to write into its missing cells.

use crate::config::CleaningConfig;
use crate::utils::{format_float, median, mode, parse_date, parse_float, parse_integer};

/// Median of an integer column, rounded half away from zero.
///
/// Works in `i128` so the mean of the two middle values cannot overflow.
pub(crate) fn integer_median(values: &[&str]) -> Option<String> {
    let mut numbers: Vec<i64> = values.iter().filter_map(|v| parse_integer(v)).collect();
    if numbers.is_empty() {
        return None;
    }
    numbers.sort_unstable();

    let mid = numbers.len() / 2;
    let median = if numbers.len() % 2 == 1 {
        numbers[mid] as i128
    } else {
        let sum = numbers[mid - 1] as i128 + numbers[mid] as i128;
        if sum % 2 == 0 {
            sum / 2
        } else if sum > 0 {
            (sum + 1) / 2
        } else {
            (sum - 1) / 2
        }
    };
    Some(median.to_string())
}

/// Median of a float column in shortest `f64` form.
pub(crate) fn float_median(values: &[&str]) -> Option<String> {
    let numbers: Vec<f64> = values.iter().filter_map(|v| parse_float(v)).collect();
    median(&numbers).map(format_float)
}

/// Majority class of a boolean column, spelled with the token the column
/// uses most for that class.
///
/// A tie goes to false. With no values the result is `"false"`.
pub(crate) fn boolean_majority(values: &[&str], config: &CleaningConfig) -> String {
    let trues: Vec<&str> = values
        .iter()
        .copied()
        .filter(|v| config.parse_boolean(v) == Some(true))
        .collect();
    let falses: Vec<&str> = values
        .iter()
        .copied()
        .filter(|v| config.parse_boolean(v) == Some(false))
        .collect();

    let winners = if trues.len() > falses.len() {
        trues
    } else {
        falses
    };
    mode(winners).unwrap_or("false").to_string()
}

/// Chronological median of a date column; the lower middle for an even count.
///
/// Returns the raw text of the observed value, so the column keeps its own
/// spelling. Ties in time keep first-seen order.
pub(crate) fn median_date(values: &[&str], format: &str) -> Option<String> {
    let mut dated: Vec<(chrono::NaiveDateTime, &str)> = values
        .iter()
        .filter_map(|v| parse_date(v, format).map(|d| (d, *v)))
        .collect();
    if dated.is_empty() {
        return None;
    }
    dated.sort_by_key(|(d, _)| *d);
    Some(dated[(dated.len() - 1) / 2].1.to_string())
}

/// Most frequent value; first-seen wins ties.
pub(crate) fn most_frequent(values: &[&str]) -> Option<String> {
    mode(values.iter().copied()).map(str::to_string)
}
