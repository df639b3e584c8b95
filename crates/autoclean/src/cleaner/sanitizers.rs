//! Value sanitization applied around type inference.

use crate::config::CleaningConfig;
use crate::table::{Cell, Table};
use crate::types::{ColumnChanges, ColumnProfile, ColumnType};
use tracing::debug;

/// Trim stored text and turn blanks and missing-value markers into
/// [`Cell::Missing`], as configured.
///
/// Returns the new table and one change record per column.
pub(crate) fn sanitize_table(table: &Table, config: &CleaningConfig) -> (Table, Vec<ColumnChanges>) {
    let mut changes = vec![ColumnChanges::default(); table.width()];

    let sanitized = table.map_columns(|idx, column| {
        let record = &mut changes[idx];
        let cells = column
            .cells()
            .iter()
            .map(|cell| sanitize_cell(cell, config, record))
            .collect();

        if record.new_missing() > 0 || record.values_trimmed > 0 {
            debug!(
                "Sanitized '{}': {} trimmed, {} blank, {} markers",
                column.name(),
                record.values_trimmed,
                record.blanks_to_missing,
                record.markers_to_missing
            );
        }
        cells
    });

    (sanitized, changes)
}

fn sanitize_cell(cell: &Cell, config: &CleaningConfig, record: &mut ColumnChanges) -> Cell {
    let Some(value) = cell.as_text() else {
        return cell.clone();
    };

    let trimmed = value.trim();
    if config.blank_as_missing && trimmed.is_empty() {
        record.blanks_to_missing += 1;
        return Cell::Missing;
    }
    if config.is_missing_marker(trimmed) {
        record.markers_to_missing += 1;
        return Cell::Missing;
    }
    if config.trim_whitespace && trimmed.len() != value.len() {
        record.values_trimmed += 1;
        return Cell::text(trimmed);
    }
    cell.clone()
}

/// Lowercase every value of the email columns.
///
/// Returns the new table and, per column, how many values changed.
pub(crate) fn normalize_emails(table: &Table, profiles: &[ColumnProfile]) -> (Table, Vec<usize>) {
    let mut counts = vec![0usize; table.width()];

    let normalized = table.map_columns(|idx, column| {
        let is_email = profiles
            .iter()
            .any(|p| p.name == column.name() && p.column_type == ColumnType::Email);
        if !is_email {
            return column.cells().to_vec();
        }

        column
            .cells()
            .iter()
            .map(|cell| match cell.as_text() {
                Some(value) => {
                    let lower = value.to_lowercase();
                    if lower != value {
                        counts[idx] += 1;
                    }
                    Cell::Text(lower)
                }
                None => cell.clone(),
            })
            .collect()
    });

    (normalized, counts)
}
