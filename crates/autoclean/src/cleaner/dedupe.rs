//! Duplicate record detection.
//!
//! Two records are duplicates when they agree on every column after text is
//! trimmed and case-folded. Missing matches only missing.

use std::collections::HashMap;

use crate::table::{Cell, Table};
use crate::types::DuplicateGroup;
use crate::utils::normalize_for_comparison;

/// Comparison form of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Missing,
    Text(String),
    UnknownDate,
}

impl From<&Cell> for CellKey {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Missing => CellKey::Missing,
            Cell::Text(s) => CellKey::Text(normalize_for_comparison(s)),
            Cell::UnknownDate => CellKey::UnknownDate,
        }
    }
}

/// Result of one deduplication pass.
#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    /// First occurrence of every record, in original order and original text.
    pub table: Table,
    pub duplicate_count: usize,
    /// One group per record that had at least one duplicate.
    pub groups: Vec<DuplicateGroup>,
}

/// Drop every record equivalent to an earlier record.
pub(crate) fn dedupe_table(table: &Table) -> DedupeOutcome {
    let height = table.height();
    let mut first_seen: HashMap<Vec<CellKey>, usize> = HashMap::with_capacity(height);
    let mut kept: Vec<usize> = Vec::with_capacity(height);
    // keyed by the kept index; order of `kept` gives the group order
    let mut dropped: HashMap<usize, Vec<usize>> = HashMap::new();

    for idx in 0..height {
        let key: Vec<CellKey> = table.row(idx).into_iter().map(CellKey::from).collect();
        match first_seen.get(&key) {
            Some(&original) => dropped.entry(original).or_default().push(idx),
            None => {
                first_seen.insert(key, idx);
                kept.push(idx);
            }
        }
    }

    let duplicate_count = height - kept.len();
    let groups = kept
        .iter()
        .filter_map(|&idx| {
            dropped.remove(&idx).map(|dropped| DuplicateGroup {
                kept: idx,
                dropped,
            })
        })
        .collect();

    DedupeOutcome {
        table: table.take_rows(&kept),
        duplicate_count,
        groups,
    }
}
