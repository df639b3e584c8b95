//! Main cleaning pipeline module.
//!
//! This module provides the [`CleaningPipeline`] struct and its builder,
//! which run the cleaning stages in a fixed order.

use crate::cleaner::{DuplicateResolver, Sanitizer};
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::Result;
use crate::imputers::MissingValueImputer;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::TypeInferencer;
use crate::quality::{QualityAnalyzer, QualityScorer};
use crate::table::{Column, Table};
use crate::types::{CleaningResult, ColumnQuality, QualityReport};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The cleaning pipeline.
///
/// Use [`CleaningPipeline::builder()`] to create one. A pipeline holds no
/// per-run state, so one instance can clean any number of tables, from any
/// number of threads.
///
/// # Example
///
/// ```rust
/// use autoclean::{CleaningPipeline, Column, Table};
///
/// let table = Table::new(vec![
///     Column::from_values("name", [Some("A"), Some("A"), Some("B"), None]),
///     Column::from_values("age", [Some("10"), Some("20"), None, Some("40")]),
/// ])?;
///
/// let result = CleaningPipeline::builder().build()?.run(&table)?;
/// assert_eq!(result.cleaned_table.height(), 4);
/// assert_eq!(result.report.total_imputed(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct CleaningPipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(CleaningPipeline: Send, Sync);

impl CleaningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a table and describe what was done.
    ///
    /// The input is never modified. The same input and configuration always
    /// give the same result.
    ///
    /// # Errors
    ///
    /// Fails with [`CleaningError::MalformedTable`](crate::CleaningError::MalformedTable)
    /// or [`CleaningError::DuplicateColumn`](crate::CleaningError::DuplicateColumn)
    /// when the table breaks its shape invariants. Empty input is not an
    /// error.
    pub fn run(&self, table: &Table) -> Result<CleaningResult> {
        match self.run_internal(table) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Cleaning pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage(&self, stage: CleaningStage, message: &str) {
        self.report_progress(ProgressUpdate::new(stage, 0.0, message));
    }

    fn run_internal(&self, raw: &Table) -> Result<CleaningResult> {
        let start_time = Instant::now();
        info!("Starting cleaning pipeline...");

        // Step 1: Validate the shape
        self.stage(CleaningStage::Validating, "Validating input...");
        raw.validate()?;

        if raw.is_empty() {
            info!(
                "Input has {} rows and {} columns; nothing to clean",
                raw.height(),
                raw.width()
            );
            return Ok(CleaningResult {
                cleaned_table: raw.truncated(),
                report: QualityReport::empty(&raw.column_names(), raw.height()),
            });
        }

        // Step 2: Sanitize raw text
        self.stage(CleaningStage::Sanitizing, "Sanitizing values...");
        info!("Step 1: Sanitizing {} columns...", raw.width());
        let sanitizer = Sanitizer::new(&self.config);
        let (sanitized, mut changes) = sanitizer.sanitize(raw);

        // Step 3: Infer column types (read-only)
        self.stage(CleaningStage::TypeInference, "Inferring column types...");
        info!("Step 2: Inferring column types...");
        let profiles = TypeInferencer::new(&self.config).profile_table(&sanitized);

        // Step 4: Find duplicates; the count also feeds the "before" score
        self.stage(CleaningStage::Deduplication, "Removing duplicate records...");
        info!("Step 3: Removing duplicate records...");
        let dedupe = DuplicateResolver.dedupe(&sanitized);

        // Step 5: Score the input
        self.stage(CleaningStage::Scoring, "Scoring input...");
        info!("Step 4: Scoring input...");
        let scorer = QualityScorer::new(&self.config);
        let missing_before: Vec<usize> =
            sanitized.columns().iter().map(Column::missing_count).collect();
        let score_before = scorer.score(
            &sanitized,
            &profiles,
            &missing_before,
            dedupe.duplicate_count,
        );
        let issues = QualityAnalyzer::identify_issues(
            &sanitized,
            &profiles,
            dedupe.duplicate_count,
        );

        // Step 6: Normalize emails
        self.stage(CleaningStage::Normalization, "Normalizing emails...");
        let (normalized, email_counts) = sanitizer.normalize_emails(&dedupe.table, &profiles);
        for (record, count) in changes.iter_mut().zip(email_counts) {
            record.emails_normalized = count;
        }

        // Step 7: Impute missing values
        self.stage(CleaningStage::Imputation, "Imputing missing values...");
        info!("Step 5: Imputing missing values...");
        let imputation = MissingValueImputer::new(&self.config).impute(&normalized, &profiles)?;
        info!("Filled {} missing values", imputation.total_filled());

        // Step 8: Score the result and assemble the report
        self.stage(CleaningStage::Reporting, "Building report...");
        info!("Step 6: Scoring cleaned table...");
        let cleaned = imputation.table;
        let residual: Vec<usize> = cleaned.columns().iter().map(Column::missing_count).collect();
        // imputed cells still count against completeness
        let score_after = scorer.score(&cleaned, &profiles, &imputation.missing_counts, 0);

        let columns: Vec<ColumnQuality> = cleaned
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| ColumnQuality {
                name: column.name().to_string(),
                column_type: profiles[idx].column_type,
                date_format: profiles[idx].date_format.clone(),
                missing_count_before: missing_before[idx],
                missing_count_after: residual[idx],
                duplicate_records_removed: dedupe.duplicate_count,
                distinct_value_count_before: profiles[idx].distinct_count,
                distinct_value_count: column.distinct_count(),
                changes: changes[idx],
                imputation: imputation.records[idx].clone(),
                score_before: score_before.columns[idx].clone(),
                score_after: score_after.columns[idx].clone(),
            })
            .collect();

        let report = QualityReport {
            empty_input: false,
            rows_before: raw.height(),
            rows_after: cleaned.height(),
            column_count: cleaned.width(),
            duplicate_records_removed: dedupe.duplicate_count,
            duplicate_groups: dedupe.groups,
            score_before: score_before.overall,
            score_after: score_after.overall,
            overall_score: score_after.overall,
            columns,
            issues,
        };

        info!(
            "Cleaning completed in {:.2?}: score {:.1} -> {:.1}, {} -> {} rows",
            start_time.elapsed(),
            report.score_before,
            report.score_after,
            report.rows_before,
            report.rows_after
        );

        Ok(CleaningResult {
            cleaned_table: cleaned,
            report,
        })
    }
}

/// Builder for creating a [`CleaningPipeline`] instance.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = CleaningPipeline::builder()
///     .config(CleaningConfig::builder().placeholder_token("N/A").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
/// ```
#[derive(Default)]
pub struct CleaningPipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(CleaningPipelineBuilder: Send);

impl CleaningPipelineBuilder {
    /// Set the cleaning configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during a run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<CleaningPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(CleaningPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
