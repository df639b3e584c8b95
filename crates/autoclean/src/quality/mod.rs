//! Data quality scoring module.
//!
//! This module scores a table on completeness, uniqueness and type
//! consistency, and collects machine-readable notes about the input.

mod analyzer;
mod scorer;

pub use analyzer::QualityAnalyzer;
pub use scorer::QualityScorer;
