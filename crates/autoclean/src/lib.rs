//! Automatic cleaning and quality scoring for messy tabular data.
//!
//! # Overview
//!
//! Hand the library a table whose values are all text and it returns a
//! cleaned copy plus a [`QualityReport`] describing what was wrong and what
//! was fixed:
//!
//! - **Sanitization**: trimming, blank and marker values become missing
//! - **Type Inference**: integer, float, boolean, date, email, categorical, text
//! - **Deduplication**: case- and whitespace-insensitive duplicate records
//! - **Imputation**: median, majority, chronological median or mode per type
//! - **Quality Scoring**: completeness, uniqueness and type consistency,
//!   before and after cleaning
//!
//! Runs are deterministic: the same table and [`CleaningConfig`] always give
//! the same cleaned table and report.
//!
//! # Quick Start
//!
//! ```rust
//! use autoclean::{CleaningPipeline, Table};
//!
//! let table = Table::from_rows(
//!     &["name", "age"],
//!     &[
//!         vec![Some("A"), Some("10")],
//!         vec![Some("A"), Some("20")],
//!         vec![Some("B"), Some("")],
//!         vec![Some(""), Some("40")],
//!     ],
//! )?;
//!
//! let result = CleaningPipeline::builder().build()?.run(&table)?;
//! let age = result.cleaned_table.column("age")?;
//! assert_eq!(age.cells()[2].as_text(), Some("20"));
//! println!("Quality: {:.1} -> {:.1}", result.report.score_before, result.report.score_after);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Configuration
//!
//! Every threshold, vocabulary and weight lives in [`CleaningConfig`]:
//!
//! ```rust,ignore
//! use autoclean::CleaningConfig;
//!
//! let config = CleaningConfig::builder()
//!     .max_categorical_distinct(50)
//!     .boolean_vocabulary(["si", "true"], ["no", "false"])
//!     .placeholder_token("N/A")
//!     .build()?;
//! ```
//!
//! # DataFrames
//!
//! [`Table::from_dataframe`] and [`Table::to_dataframe`] convert from and to
//! polars, and [`ReportWriter`] saves a [`CleaningResult`] to disk.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod frame;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DedupeOutcome, DuplicateResolver, Sanitizer};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError, ScoreWeights};
pub use error::{CleaningError, ResultExt};
pub use imputers::{ImputationOutcome, MissingValueImputer};
pub use pipeline::{
    CleaningPipeline, CleaningPipelineBuilder, CleaningStage, ClosureProgressReporter,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::TypeInferencer;
pub use quality::{QualityAnalyzer, QualityScorer};
pub use reporting::{OutputFiles, ReportWriter};
pub use table::{Cell, Column, Table};
pub use types::{
    CleaningResult, ColumnChanges, ColumnProfile, ColumnQuality, ColumnScore, ColumnType,
    DuplicateGroup, ImputationRecord, ImputationStrategy, IssueKind, QualityIssue, QualityReport,
    QualityScore,
};
