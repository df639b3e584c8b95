//! Column profiling.
//!
//! This module assigns every column a [`ColumnType`] and collects the facts the
//! later stages need: the winning date format, distinct counts, and how
//! consistently the values fit a single type.

mod type_inference;

use std::collections::HashSet;

use crate::config::CleaningConfig;
use crate::table::{Column, Table};
use crate::types::{ColumnProfile, ColumnType};
use tracing::debug;

pub(crate) use type_inference::{detect_date_format, type_consistency};

/// Assigns semantic types to columns.
///
/// Inference reads every non-missing value, never a sample, and never
/// mutates the column.
pub struct TypeInferencer<'a> {
    config: &'a CleaningConfig,
}

impl<'a> TypeInferencer<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self { config }
    }

    /// Infer the type of one column.
    pub fn infer(&self, column: &Column) -> ColumnType {
        self.profile(column).column_type
    }

    /// Infer the type of one column along with its supporting facts.
    pub fn profile(&self, column: &Column) -> ColumnProfile {
        let values: Vec<&str> = column.present_values().collect();
        let distinct = values.iter().collect::<HashSet<_>>().len();

        let (column_type, date_format) =
            type_inference::infer_column_type(&values, distinct, column.len(), self.config);
        let (type_consistency, dominant) =
            type_inference::type_consistency(column_type, &values, self.config);

        debug!(
            "  {}: {} ({} values, {} distinct, consistency {:.2})",
            column.name(),
            column_type,
            values.len(),
            distinct,
            type_consistency
        );

        ColumnProfile {
            name: column.name().to_string(),
            column_type,
            date_format,
            non_missing_count: values.len(),
            distinct_count: distinct,
            type_consistency,
            dominant_structured_type: dominant.map(|(t, _)| t),
            dominant_type_share: dominant.map(|(_, share)| share).unwrap_or(0.0),
        }
    }

    /// Profile every column of a table, in column order.
    pub fn profile_table(&self, table: &Table) -> Vec<ColumnProfile> {
        table.columns().iter().map(|c| self.profile(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_collects_facts() {
        let config = CleaningConfig::default();
        let inferencer = TypeInferencer::new(&config);
        let column = Column::from_values(
            "joined",
            [Some("2024-01-02"), None, Some("2023-05-06"), Some("2024-01-02")],
        );

        let profile = inferencer.profile(&column);
        assert_eq!(profile.column_type, ColumnType::Date);
        assert_eq!(profile.date_format.as_deref(), Some("%Y-%m-%d"));
        assert_eq!(profile.non_missing_count, 3);
        assert_eq!(profile.distinct_count, 2);
        assert_eq!(profile.type_consistency, 1.0);
    }

    #[test]
    fn test_all_missing_column_is_text() {
        let config = CleaningConfig::default();
        let inferencer = TypeInferencer::new(&config);
        let column = Column::from_values("empty", [None::<&str>, None, None]);
        assert_eq!(inferencer.infer(&column), ColumnType::Text);
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let column = Column::from_values("tag", [Some("a"), Some("b"), Some("c")]);

        let loose = CleaningConfig::default();
        assert_eq!(
            TypeInferencer::new(&loose).infer(&column),
            ColumnType::Categorical
        );

        let strict = CleaningConfig::builder()
            .max_categorical_distinct(2)
            .categorical_ratio(0.0)
            .build()
            .unwrap();
        assert_eq!(TypeInferencer::new(&strict).infer(&column), ColumnType::Text);
    }

    #[test]
    fn test_profile_table_keeps_column_order() {
        let config = CleaningConfig::default();
        let table = Table::new(vec![
            Column::from_values("flag", [Some("yes"), Some("no")]),
            Column::from_values("n", [Some("1"), Some("22")]),
        ])
        .unwrap();

        let profiles = TypeInferencer::new(&config).profile_table(&table);
        let types: Vec<_> = profiles.iter().map(|p| p.column_type).collect();
        assert_eq!(types, vec![ColumnType::Boolean, ColumnType::Integer]);
    }
}
