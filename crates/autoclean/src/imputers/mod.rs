//! Missing-value imputation.
//!
//! Every column is filled on its own with a strategy picked from its
//! inferred type:
//! - Integer / Float: median
//! - Boolean: majority class
//! - Date: chronological median
//! - Email / Categorical / Text: mode
//!
//! Columns without a single observed value fall back to a fixed default.

mod statistical;

use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result};
use crate::profiler::detect_date_format;
use crate::table::{Cell, Column, Table};
use crate::types::{ColumnProfile, ColumnType, ImputationRecord, ImputationStrategy};
use tracing::debug;

/// Result of one imputation pass.
#[derive(Debug, Clone)]
pub struct ImputationOutcome {
    /// Table without any [`Cell::Missing`].
    pub table: Table,
    /// Missing cells per column before filling, in column order.
    pub missing_counts: Vec<usize>,
    /// What was written into each column; `None` when nothing was missing.
    pub records: Vec<Option<ImputationRecord>>,
}

impl ImputationOutcome {
    pub fn total_filled(&self) -> usize {
        self.missing_counts.iter().sum()
    }
}

/// Fills missing cells with type-appropriate values.
pub struct MissingValueImputer<'a> {
    config: &'a CleaningConfig,
}

impl<'a> MissingValueImputer<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self { config }
    }

    /// Fill every missing cell of `table`.
    ///
    /// `profiles` maps column names to their inferred types; every column of
    /// the table needs an entry. Non-missing cells are never changed.
    pub fn impute(&self, table: &Table, profiles: &[ColumnProfile]) -> Result<ImputationOutcome> {
        let mut missing_counts = Vec::with_capacity(table.width());
        let mut records = Vec::with_capacity(table.width());
        let mut columns = Vec::with_capacity(table.width());

        for column in table.columns() {
            let profile = profiles
                .iter()
                .find(|p| p.name == column.name())
                .ok_or_else(|| CleaningError::ColumnNotFound(column.name().to_string()))?;

            let missing = column.missing_count();
            missing_counts.push(missing);
            if missing == 0 {
                records.push(None);
                columns.push(column.clone());
                continue;
            }

            let (strategy, fill) = self.fill_for(column, profile);
            debug!(
                "Filled {} missing values in '{}' with {:?}: {}",
                missing,
                column.name(),
                strategy,
                fill.as_text().unwrap_or("<unknown date>")
            );

            let cells = column
                .cells()
                .iter()
                .map(|cell| if cell.is_missing() { fill.clone() } else { cell.clone() })
                .collect();
            columns.push(column.with_cells(cells));
            records.push(Some(ImputationRecord {
                strategy,
                fill_value: fill.as_text().map(str::to_string),
                filled: missing,
            }));
        }

        Ok(ImputationOutcome {
            table: Table::new(columns)?,
            missing_counts,
            records,
        })
    }

    /// Strategy and fill cell for one column.
    fn fill_for(&self, column: &Column, profile: &ColumnProfile) -> (ImputationStrategy, Cell) {
        let values: Vec<&str> = column.present_values().collect();

        match profile.column_type {
            ColumnType::Integer => match statistical::integer_median(&values) {
                Some(median) => (ImputationStrategy::Median, Cell::Text(median)),
                None => (ImputationStrategy::Default, Cell::text("0")),
            },
            ColumnType::Float => match statistical::float_median(&values) {
                Some(median) => (ImputationStrategy::Median, Cell::Text(median)),
                None => (ImputationStrategy::Default, Cell::text("0")),
            },
            ColumnType::Boolean if values.is_empty() => {
                (ImputationStrategy::Default, Cell::text("false"))
            }
            ColumnType::Boolean => (
                ImputationStrategy::Majority,
                Cell::Text(statistical::boolean_majority(&values, self.config)),
            ),
            ColumnType::Date => {
                let format = profile
                    .date_format
                    .as_deref()
                    .or_else(|| detect_date_format(&values, self.config));
                match format.and_then(|f| statistical::median_date(&values, f)) {
                    Some(median) => (ImputationStrategy::MedianDate, Cell::Text(median)),
                    None => (ImputationStrategy::UnknownDate, Cell::UnknownDate),
                }
            }
            ColumnType::Email | ColumnType::Categorical | ColumnType::Text => {
                match statistical::most_frequent(&values) {
                    Some(mode) => (ImputationStrategy::Mode, Cell::Text(mode)),
                    None => (
                        ImputationStrategy::Placeholder,
                        Cell::text(self.config.placeholder_token.as_str()),
                    ),
                }
            }
        }
    }
}
