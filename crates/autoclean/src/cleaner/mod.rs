//! Record- and value-level cleaning.
//!
//! This module provides:
//! - Sanitization of raw text (trimming, blanks and markers to missing)
//! - Duplicate record removal
//! - Email normalization

mod dedupe;
mod sanitizers;

pub use dedupe::DedupeOutcome;

use crate::config::CleaningConfig;
use crate::table::Table;
use crate::types::{ColumnChanges, ColumnProfile};
use tracing::{debug, info};

/// Removes records that repeat an earlier record.
pub struct DuplicateResolver;

impl DuplicateResolver {
    /// Keep the first occurrence of every normalized record.
    ///
    /// Comparison trims and lowercases text; the kept record retains its
    /// original text and the output keeps the input order.
    pub fn dedupe(&self, table: &Table) -> DedupeOutcome {
        let outcome = dedupe::dedupe_table(table);

        if outcome.duplicate_count > 0 {
            let pct = outcome.duplicate_count as f64 / table.height() as f64 * 100.0;
            info!(
                "Removed {} duplicate records ({:.1}%) in {} groups",
                outcome.duplicate_count,
                pct,
                outcome.groups.len()
            );
        } else {
            debug!("No duplicate records found");
        }

        outcome
    }
}

/// Text-level normalization driven by [`CleaningConfig`].
pub struct Sanitizer<'a> {
    config: &'a CleaningConfig,
}

impl<'a> Sanitizer<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self { config }
    }

    /// Trim values and turn blanks and missing markers into missing cells.
    pub fn sanitize(&self, table: &Table) -> (Table, Vec<ColumnChanges>) {
        let (table, changes) = sanitizers::sanitize_table(table, self.config);

        let new_missing: usize = changes.iter().map(ColumnChanges::new_missing).sum();
        let trimmed: usize = changes.iter().map(|c| c.values_trimmed).sum();
        if new_missing > 0 || trimmed > 0 {
            info!(
                "Sanitized input: {} values trimmed, {} values marked missing",
                trimmed, new_missing
            );
        }

        (table, changes)
    }

    /// Lowercase email columns; a no-op when email normalization is off.
    ///
    /// Returns per-column counts of changed values.
    pub fn normalize_emails(&self, table: &Table, profiles: &[ColumnProfile]) -> (Table, Vec<usize>) {
        if !self.config.normalize_emails {
            return (table.clone(), vec![0; table.width()]);
        }

        let (table, counts) = sanitizers::normalize_emails(table, profiles);
        let total: usize = counts.iter().sum();
        if total > 0 {
            info!("Normalized {} email values", total);
        }
        (table, counts)
    }
}
