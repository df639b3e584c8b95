//! Progress reporting for the cleaning pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use autoclean::CleaningPipeline;
//!
//! let result = CleaningPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(&table)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Checking the table shape
    Validating,
    /// Trimming values and mapping blanks and markers to missing
    Sanitizing,
    /// Assigning a semantic type to every column
    TypeInference,
    /// Removing duplicate records
    Deduplication,
    /// Scoring the input table
    Scoring,
    /// Normalizing email columns
    Normalization,
    /// Filling missing values
    Imputation,
    /// Scoring the cleaned table and assembling the report
    Reporting,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Validating => "Validating Input",
            Self::Sanitizing => "Sanitizing Values",
            Self::TypeInference => "Inferring Types",
            Self::Deduplication => "Removing Duplicates",
            Self::Scoring => "Scoring Input",
            Self::Normalization => "Normalizing Emails",
            Self::Imputation => "Imputing Values",
            Self::Reporting => "Building Report",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run spent in this stage (0.0 - 1.0).
    ///
    /// Weights of the working stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Validating => 0.05,
            Self::Sanitizing => 0.10,
            Self::TypeInference => 0.20,
            Self::Deduplication => 0.15,
            Self::Scoring => 0.15,
            Self::Normalization => 0.05,
            Self::Imputation => 0.20,
            Self::Reporting => 0.10,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Overall progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Validating => 0.0,
            Self::Sanitizing => 0.05,
            Self::TypeInference => 0.15,
            Self::Deduplication => 0.35,
            Self::Scoring => 0.50,
            Self::Normalization => 0.65,
            Self::Imputation => 0.70,
            Self::Reporting => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// One progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: CleaningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: CleaningStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from a running pipeline.
///
/// Implementations must be `Send + Sync` so a pipeline can run on a worker
/// thread while updates go elsewhere. `report` is called a handful of times
/// per run and should not block.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
static_assertions::assert_impl_all!(CleaningStage: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const WORKING_STAGES: [CleaningStage; 8] = [
        CleaningStage::Validating,
        CleaningStage::Sanitizing,
        CleaningStage::TypeInference,
        CleaningStage::Deduplication,
        CleaningStage::Scoring,
        CleaningStage::Normalization,
        CleaningStage::Imputation,
        CleaningStage::Reporting,
    ];

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = WORKING_STAGES.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_base_progress_is_cumulative() {
        let mut expected = 0.0f32;
        for stage in WORKING_STAGES {
            assert!(
                (stage.base_progress() - expected).abs() < 1e-5,
                "{:?}",
                stage
            );
            expected += stage.weight();
        }
        assert!((CleaningStage::Complete.base_progress() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(CleaningStage::Imputation, 0.5, "Imputing...");
        assert_eq!(update.stage, CleaningStage::Imputation);
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.80).abs() < 1e-5);
        assert_eq!(update.message, "Imputing...");
    }

    #[test]
    fn test_progress_update_terminal() {
        let done = ProgressUpdate::complete("Done");
        assert_eq!(done.stage, CleaningStage::Complete);
        assert_eq!(done.progress, 1.0);

        let failed = ProgressUpdate::failed("boom");
        assert_eq!(failed.stage, CleaningStage::Failed);
        assert_eq!(failed.message, "boom");
    }

    #[test]
    fn test_closure_reporter() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let reporter = ClosureProgressReporter::new(move |_update| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(CleaningStage::Validating, 0.0, "start"));
        reporter.report(ProgressUpdate::complete("end"));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&CleaningStage::TypeInference).unwrap();
        assert_eq!(json, "\"type_inference\"");
    }
}
