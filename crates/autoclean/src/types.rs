use serde::{Deserialize, Serialize};
use std::fmt;

use crate::table::Table;

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Date,
    Email,
    Categorical,
    Text,
}

impl ColumnType {
    /// Candidates whose values have a parseable shape, in inference priority
    /// order.
    pub const STRUCTURED: [ColumnType; 5] = [
        ColumnType::Boolean,
        ColumnType::Integer,
        ColumnType::Float,
        ColumnType::Date,
        ColumnType::Email,
    ];

    /// Whether every value of a column of this type was parsed against a shape.
    pub fn is_structured(&self) -> bool {
        !matches!(self, ColumnType::Categorical | ColumnType::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Email => "email",
            ColumnType::Categorical => "categorical",
            ColumnType::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Everything type inference learned about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    /// chrono format that parsed every value, for date columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    pub non_missing_count: usize,
    pub distinct_count: usize,
    /// Fraction of non-missing values that conform to a single type (0.0 - 1.0).
    pub type_consistency: f64,
    /// Most common structured type among the values of a categorical or text
    /// column, when at least one value matched any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_structured_type: Option<ColumnType>,
    /// Share of non-missing values held by `dominant_structured_type`; 0 when
    /// there is none.
    #[serde(default)]
    pub dominant_type_share: f64,
}

/// Records considered equivalent by the duplicate resolver.
///
/// Indices refer to record positions in the table handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub kept: usize,
    pub dropped: Vec<usize>,
}

/// How missing values of a column were filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStrategy {
    Median,
    Majority,
    MedianDate,
    Mode,
    /// Zero for numbers, `false` for booleans.
    Default,
    Placeholder,
    UnknownDate,
}

/// What the imputer did to one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub strategy: ImputationStrategy,
    /// Text written into every filled cell; `None` for the unknown-date marker.
    pub fill_value: Option<String>,
    pub filled: usize,
}

/// Per-column counts of the normalizations applied before inference and
/// after deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChanges {
    pub values_trimmed: usize,
    pub blanks_to_missing: usize,
    pub markers_to_missing: usize,
    pub emails_normalized: usize,
}

impl ColumnChanges {
    pub fn new_missing(&self) -> usize {
        self.blanks_to_missing + self.markers_to_missing
    }
}

/// Score components of one column of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScore {
    pub name: String,
    pub column_type: ColumnType,
    pub missing_count: usize,
    pub distinct_count: usize,
    pub completeness: f64,
    pub uniqueness: f64,
    pub consistency: f64,
    pub composite: f64,
}

impl ColumnScore {
    /// Score of a column without any rows: every component is 0.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: ColumnType::Text,
            missing_count: 0,
            distinct_count: 0,
            completeness: 0.0,
            uniqueness: 0.0,
            consistency: 0.0,
            composite: 0.0,
        }
    }
}

/// Output of one scoring pass over a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub row_count: usize,
    pub duplicate_count: usize,
    pub duplicate_penalty: f64,
    /// Overall score (0.0 - 100.0).
    pub overall: f64,
    pub columns: Vec<ColumnScore>,
}

impl QualityScore {
    /// Score of a table without rows or columns.
    pub fn zero() -> Self {
        Self {
            row_count: 0,
            duplicate_count: 0,
            duplicate_penalty: 0.0,
            overall: 0.0,
            columns: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnScore> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Per-column entry of the quality report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    pub missing_count_before: usize,
    pub missing_count_after: usize,
    /// Records removed as duplicates; the same for every column of a table.
    pub duplicate_records_removed: usize,
    pub distinct_value_count_before: usize,
    pub distinct_value_count: usize,
    pub changes: ColumnChanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputation: Option<ImputationRecord>,
    pub score_before: ColumnScore,
    pub score_after: ColumnScore,
}

impl ColumnQuality {
    /// Entry for a column of a table without rows; typed as text like any
    /// column without observed values.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: ColumnType::Text,
            date_format: None,
            missing_count_before: 0,
            missing_count_after: 0,
            duplicate_records_removed: 0,
            distinct_value_count_before: 0,
            distinct_value_count: 0,
            changes: ColumnChanges::default(),
            imputation: None,
            score_before: ColumnScore::empty(name),
            score_after: ColumnScore::empty(name),
        }
    }
}

/// Kind of a machine-readable note attached to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyInput,
    NoObservedValues,
    MixedTypes,
    DuplicateRecords,
    HighMissingRate,
}

/// A deterministic note for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub detail: String,
}

/// Machine-readable outcome of one pipeline run.
///
/// Built once per run and never mutated afterwards. It carries every metric
/// a renderer needs so nothing has to be re-derived from the tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Set when the input had zero rows or zero columns.
    pub empty_input: bool,
    pub rows_before: usize,
    pub rows_after: usize,
    pub column_count: usize,
    pub duplicate_records_removed: usize,
    pub duplicate_groups: Vec<DuplicateGroup>,
    /// Overall score of the input (0.0 - 100.0).
    pub score_before: f64,
    /// Overall score of the cleaned table (0.0 - 100.0).
    pub score_after: f64,
    /// Headline score; equal to `score_after`.
    pub overall_score: f64,
    pub columns: Vec<ColumnQuality>,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    /// Report for input without rows or columns, with one zero-count entry
    /// per column.
    pub fn empty(column_names: &[&str], rows_before: usize) -> Self {
        Self {
            empty_input: true,
            rows_before,
            rows_after: 0,
            column_count: column_names.len(),
            duplicate_records_removed: 0,
            duplicate_groups: Vec::new(),
            score_before: 0.0,
            score_after: 0.0,
            overall_score: 0.0,
            columns: column_names.iter().map(|name| ColumnQuality::empty(name)).collect(),
            issues: vec![QualityIssue {
                kind: IssueKind::EmptyInput,
                column: None,
                detail: format!(
                    "Input has {} rows and {} columns; nothing to clean",
                    rows_before,
                    column_names.len()
                ),
            }],
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Total number of cells filled by imputation.
    pub fn total_imputed(&self) -> usize {
        self.columns
            .iter()
            .filter_map(|c| c.imputation.as_ref())
            .map(|i| i.filled)
            .sum()
    }

    /// Score gained by cleaning, in points.
    pub fn quality_improvement(&self) -> f64 {
        self.score_after - self.score_before
    }
}

/// Output of [`CleaningPipeline::run`](crate::CleaningPipeline::run).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningResult {
    pub cleaned_table: Table,
    pub report: QualityReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ColumnType::Categorical).unwrap(),
            "\"categorical\""
        );
        let parsed: ColumnType = serde_json::from_str("\"email\"").unwrap();
        assert_eq!(parsed, ColumnType::Email);
        assert_eq!(ColumnType::Date.to_string(), "date");
    }

    #[test]
    fn test_structured_candidates_order() {
        assert_eq!(ColumnType::STRUCTURED[0], ColumnType::Boolean);
        assert!(ColumnType::STRUCTURED.iter().all(|t| t.is_structured()));
        assert!(!ColumnType::Text.is_structured());
    }

    #[test]
    fn test_empty_report() {
        let report = QualityReport::empty(&["a", "b", "c"], 0);
        assert!(report.empty_input);
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.column_count, 3);
        let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        let b = report.column("b").unwrap();
        assert_eq!(b.missing_count_before, 0);
        assert!(b.imputation.is_none());
        assert_eq!(b.score_after.composite, 0.0);
        assert_eq!(report.issues[0].kind, IssueKind::EmptyInput);
        assert_eq!(report.total_imputed(), 0);
    }
}
