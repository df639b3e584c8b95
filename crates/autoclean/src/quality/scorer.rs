use crate::config::CleaningConfig;
use crate::profiler::type_consistency;
use crate::table::{Column, Table};
use crate::types::{ColumnProfile, ColumnScore, ColumnType, QualityScore};
use tracing::debug;

/// Computes per-column and overall quality scores for one table.
pub struct QualityScorer<'a> {
    config: &'a CleaningConfig,
}

impl<'a> QualityScorer<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self { config }
    }

    /// Score `table`.
    ///
    /// `missing_counts` holds the missing cells to charge per column, in
    /// column order; columns past its end are counted from the table.
    /// Column types and type consistency come from `profiles`, matched by
    /// name; a column without a profile is scored as text.
    pub fn score(
        &self,
        table: &Table,
        profiles: &[ColumnProfile],
        missing_counts: &[usize],
        duplicate_count: usize,
    ) -> QualityScore {
        let row_count = table.height();
        if table.width() == 0 {
            return QualityScore {
                row_count,
                ..QualityScore::zero()
            };
        }

        let columns: Vec<ColumnScore> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let (column_type, consistency) =
                    match profiles.iter().find(|p| p.name == column.name()) {
                        Some(profile) => (profile.column_type, profile.type_consistency),
                        None => {
                            let values: Vec<&str> = column.present_values().collect();
                            let (consistency, _) =
                                type_consistency(ColumnType::Text, &values, self.config);
                            (ColumnType::Text, consistency)
                        }
                    };
                let missing = missing_counts
                    .get(idx)
                    .copied()
                    .unwrap_or_else(|| column.missing_count());
                self.score_column(column, column_type, consistency, missing, row_count)
            })
            .collect();

        let mean_composite =
            columns.iter().map(|c| c.composite).sum::<f64>() / columns.len() as f64;
        let duplicate_penalty = if row_count == 0 {
            0.0
        } else {
            self.config.duplicate_penalty * duplicate_count as f64 / row_count as f64
        };
        let overall = (mean_composite * 100.0 - duplicate_penalty).clamp(0.0, 100.0);

        debug!(
            "Scored {} columns x {} rows: {:.1} (duplicate penalty {:.1})",
            columns.len(),
            row_count,
            overall,
            duplicate_penalty
        );

        QualityScore {
            row_count,
            duplicate_count,
            duplicate_penalty,
            overall,
            columns,
        }
    }

    fn score_column(
        &self,
        column: &Column,
        column_type: ColumnType,
        consistency: f64,
        missing_count: usize,
        row_count: usize,
    ) -> ColumnScore {
        let distinct_count = column.distinct_count();

        let completeness = if row_count == 0 {
            0.0
        } else {
            (1.0 - missing_count as f64 / row_count as f64).clamp(0.0, 1.0)
        };
        let uniqueness = self.uniqueness(column_type, distinct_count, row_count);
        let composite = self
            .config
            .score_weights
            .combine(completeness, uniqueness, consistency);

        ColumnScore {
            name: column.name().to_string(),
            column_type,
            missing_count,
            distinct_count,
            completeness,
            uniqueness,
            consistency,
            composite,
        }
    }

    /// Only categorical columns are judged on their distinct count: past the
    /// categorical limit the score falls linearly, reaching 0 at twice it.
    fn uniqueness(&self, column_type: ColumnType, distinct: usize, row_count: usize) -> f64 {
        if column_type != ColumnType::Categorical {
            return 1.0;
        }
        let limit = self.config.categorical_limit(row_count);
        if distinct <= limit {
            return 1.0;
        }
        (1.0 - (distinct - limit) as f64 / limit as f64).max(0.0)
    }
}
