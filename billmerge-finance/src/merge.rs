//! Concatenate parsed exports into one ledger and drop exact duplicates.
//!
//! Overlapping exports (e.g. two WeChat downloads covering the same week)
//! produce identical rows; only the first occurrence is kept.

use billmerge_core::{Ledger, Transaction};
use std::collections::HashSet;
use tracing::info;

/// Row counts around deduplication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub before: usize,
    pub after: usize,
}

impl DedupReport {
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

/// Concatenate parsed tables in the order given.
pub fn concat(tables: impl IntoIterator<Item = Vec<Transaction>>) -> Ledger {
    tables.into_iter().flatten().collect()
}

/// Remove rows equal to an earlier row in every field, preserving order.
pub fn dedup(ledger: Ledger) -> (Ledger, DedupReport) {
    let before = ledger.len();
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(before);
        ledger.iter().map(|txn| seen.insert(txn.key())).collect()
    };

    let deduped: Ledger = ledger
        .into_iter()
        .zip(keep)
        .filter_map(|(txn, keep)| keep.then_some(txn))
        .collect();

    let report = DedupReport {
        before,
        after: deduped.len(),
    };
    (deduped, report)
}

/// Concatenate and deduplicate, logging the counts.
pub fn merge(tables: impl IntoIterator<Item = Vec<Transaction>>) -> (Ledger, DedupReport) {
    let (ledger, report) = dedup(concat(tables));
    info!(
        before = report.before,
        after = report.after,
        removed = report.removed(),
        "deduplicated ledger"
    );
    (ledger, report)
}
