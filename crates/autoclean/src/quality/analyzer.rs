use crate::table::Table;
use crate::types::{ColumnProfile, IssueKind, QualityIssue};

/// Share of missing cells above which a column is flagged.
const HIGH_MISSING_RATE: f64 = 0.5;

/// Share of values matching one structured type at which a text column is
/// reported as mixed.
const MIXED_TYPE_SHARE: f64 = 0.5;

pub struct QualityAnalyzer;

impl QualityAnalyzer {
    /// Notes about the input table, in a fixed order: duplicates first, then
    /// per column in column order.
    ///
    /// `table` is the sanitized input before deduplication and `profiles`
    /// were inferred from it.
    pub fn identify_issues(
        table: &Table,
        profiles: &[ColumnProfile],
        duplicate_count: usize,
    ) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        if duplicate_count > 0 {
            issues.push(QualityIssue {
                kind: IssueKind::DuplicateRecords,
                column: None,
                detail: format!(
                    "{} of {} records repeat an earlier record",
                    duplicate_count,
                    table.height()
                ),
            });
        }

        for column in table.columns() {
            let Some(profile) = profiles.iter().find(|p| p.name == column.name()) else {
                continue;
            };
            if profile.non_missing_count == 0 {
                issues.push(QualityIssue {
                    kind: IssueKind::NoObservedValues,
                    column: Some(column.name().to_string()),
                    detail: "Column has no observed values; filled with a default".to_string(),
                });
                continue;
            }

            if !profile.column_type.is_structured()
                && let Some(dominant) = profile.dominant_structured_type
                && profile.dominant_type_share >= MIXED_TYPE_SHARE
            {
                let share = profile.dominant_type_share;
                issues.push(QualityIssue {
                    kind: IssueKind::MixedTypes,
                    column: Some(column.name().to_string()),
                    detail: format!(
                        "{:.0}% of values are {} but the column fell back to {}",
                        share * 100.0,
                        dominant,
                        profile.column_type
                    ),
                });
            }

            let missing_rate = column.missing_count() as f64 / table.height() as f64;
            if missing_rate > HIGH_MISSING_RATE {
                issues.push(QualityIssue {
                    kind: IssueKind::HighMissingRate,
                    column: Some(column.name().to_string()),
                    detail: format!("{:.1}% of values are missing", missing_rate * 100.0),
                });
            }
        }

        issues
    }
}
