//! Type inference logic for column analysis.
//!
//! A candidate type is accepted only when *every* non-missing value conforms
//! to it. Candidates are tried in a fixed priority order, so overlapping
//! vocabularies ("0"/"1" are both boolean and integer) resolve the same way
//! every time.

use crate::config::CleaningConfig;
use crate::types::ColumnType;
use crate::utils::{is_email, parse_date, parse_float, parse_integer};

/// Whether a single value conforms to a structured candidate.
///
/// Dates need a format and are handled by [`detect_date_format`]; asking for
/// `Date`, `Categorical` or `Text` here returns false.
fn value_conforms(value: &str, candidate: ColumnType, config: &CleaningConfig) -> bool {
    match candidate {
        ColumnType::Boolean => config.parse_boolean(value).is_some(),
        ColumnType::Integer => parse_integer(value).is_some(),
        ColumnType::Float => parse_float(value).is_some(),
        ColumnType::Email => is_email(value),
        ColumnType::Date | ColumnType::Categorical | ColumnType::Text => false,
    }
}

/// First configured date format that parses every value.
pub(crate) fn detect_date_format<'c>(values: &[&str], config: &'c CleaningConfig) -> Option<&'c str> {
    if values.is_empty() {
        return None;
    }
    config
        .date_formats
        .iter()
        .map(String::as_str)
        .find(|format| values.iter().all(|v| parse_date(v, format).is_some()))
}

/// Fraction of values (0.0 - 1.0) conforming to a structured candidate.
///
/// For dates this is the best fraction reached by any single format.
pub(crate) fn conforming_fraction(
    values: &[&str],
    candidate: ColumnType,
    config: &CleaningConfig,
) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let matched = if candidate == ColumnType::Date {
        config
            .date_formats
            .iter()
            .map(|format| {
                values
                    .iter()
                    .filter(|v| parse_date(v, format).is_some())
                    .count()
            })
            .max()
            .unwrap_or(0)
    } else {
        values
            .iter()
            .filter(|v| value_conforms(v, candidate, config))
            .count()
    };

    matched as f64 / values.len() as f64
}

/// Structured candidate matched by the largest share of values, with that
/// share. Earlier candidates win ties; `None` when no value matched any.
pub(crate) fn dominant_structured_type(
    values: &[&str],
    config: &CleaningConfig,
) -> Option<(ColumnType, f64)> {
    let mut best: Option<(ColumnType, f64)> = None;
    for candidate in ColumnType::STRUCTURED {
        let fraction = conforming_fraction(values, candidate, config);
        if fraction > 0.0 && best.is_none_or(|(_, f)| fraction > f) {
            best = Some((candidate, fraction));
        }
    }
    best
}

/// Whether a distinct-value count is low enough to call a column categorical.
pub(crate) fn is_categorical(distinct: usize, row_count: usize, config: &CleaningConfig) -> bool {
    distinct <= config.categorical_limit(row_count)
}

/// Infer the type of a column from its non-missing values.
///
/// Returns the type and, for dates, the winning format.
pub(crate) fn infer_column_type(
    values: &[&str],
    distinct: usize,
    row_count: usize,
    config: &CleaningConfig,
) -> (ColumnType, Option<String>) {
    if values.is_empty() {
        return (ColumnType::Text, None);
    }

    for candidate in [ColumnType::Boolean, ColumnType::Integer, ColumnType::Float] {
        if values.iter().all(|v| value_conforms(v, candidate, config)) {
            return (candidate, None);
        }
    }

    if let Some(format) = detect_date_format(values, config) {
        return (ColumnType::Date, Some(format.to_string()));
    }

    if values.iter().all(|v| is_email(v)) {
        return (ColumnType::Email, None);
    }

    if is_categorical(distinct, row_count, config) {
        return (ColumnType::Categorical, None);
    }

    (ColumnType::Text, None)
}

/// Share of values that conform to the column's type without falling back to
/// free text.
///
/// Structured types conform by construction. For categorical and text columns
/// `f` is the share held by the dominant structured type and the result is
/// `max(f, 1 - f)`: pure text scores 1, an even split scores 0.5.
///
/// Also returns the dominant structured type with its share `f`, when any
/// value matched one.
pub(crate) fn type_consistency(
    column_type: ColumnType,
    values: &[&str],
    config: &CleaningConfig,
) -> (f64, Option<(ColumnType, f64)>) {
    if column_type.is_structured() || values.is_empty() {
        return (1.0, None);
    }
    match dominant_structured_type(values, config) {
        Some((dominant, f)) => (f.max(1.0 - f), Some((dominant, f))),
        None => (1.0, None),
    }
}
