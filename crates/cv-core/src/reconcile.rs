//! Baseline/overlay reconciliation.
//!
//! Unions the flattened baseline and overlay, classifies every leaf key and
//! collects the failure states that were observed for the overlay.

use std::collections::HashSet;

use serde::Serialize;

use crate::flatten::FlatEntry;
use crate::key::KeyPath;
use crate::state::{FailureState, FailureStates};

/// Keys excluded from failure accumulation, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct IgnorePaths(HashSet<KeyPath>);

impl IgnorePaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &KeyPath) -> bool {
        self.0.contains(key)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IgnorePaths {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| KeyPath::new(s.as_ref())).collect())
    }
}

/// Facts about one leaf key for one overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub is_unknown: bool,
    pub is_missing: bool,
    pub is_ignored: bool,
}

impl Classification {
    /// States that count towards failure. Always empty for ignored keys.
    pub fn failure_states(&self) -> FailureStates {
        let mut states = FailureStates::new();
        if self.is_ignored {
            return states;
        }
        if self.is_missing {
            states.insert(FailureState::Missing);
        }
        if self.is_unknown {
            states.insert(FailureState::Unknown);
        }
        states
    }
}

/// One output row: a section header or a classified leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciledRow<'a> {
    Header(&'a FlatEntry),
    Leaf {
        entry: &'a FlatEntry,
        classification: Classification,
    },
}

impl<'a> ReconciledRow<'a> {
    pub fn entry(&self) -> &'a FlatEntry {
        match self {
            ReconciledRow::Header(entry) => entry,
            ReconciledRow::Leaf { entry, .. } => entry,
        }
    }

    pub fn classification(&self) -> Option<Classification> {
        match self {
            ReconciledRow::Header(_) => None,
            ReconciledRow::Leaf { classification, .. } => Some(*classification),
        }
    }
}

/// Result of reconciling one overlay.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation<'a> {
    /// Visible rows in union order.
    pub rows: Vec<ReconciledRow<'a>>,

    /// Failure states of every non-ignored leaf, visible or not.
    pub observed: FailureStates,
}

/// Reconcile one overlay against the baseline.
///
/// The union lists baseline entries first, then overlay-only entries in
/// overlay order. When both sides have the same key the baseline entry is
/// displayed. A key that is a section on one side and a leaf on the other
/// appears once per kind, so neither side's leaves are hidden.
///
/// A non-empty `show` drops leaf rows whose failure states do not intersect
/// it; header rows are always kept.
pub fn reconcile<'a>(
    baseline: &'a [FlatEntry],
    overlay: &'a [FlatEntry],
    ignore_paths: &IgnorePaths,
    show: &FailureStates,
) -> Reconciliation<'a> {
    let baseline_leaves = leaf_keys(baseline);
    let overlay_leaves = leaf_keys(overlay);

    let mut seen: HashSet<(&KeyPath, bool)> = HashSet::new();
    let mut reconciliation = Reconciliation::default();

    for entry in baseline.iter().chain(overlay) {
        if !seen.insert((&entry.key, entry.is_parent())) {
            continue;
        }

        if entry.is_parent() {
            reconciliation.rows.push(ReconciledRow::Header(entry));
            continue;
        }

        let classification = Classification {
            is_unknown: !baseline_leaves.contains(&entry.key),
            is_missing: !overlay_leaves.contains(&entry.key),
            is_ignored: ignore_paths.contains(&entry.key),
        };
        let current = classification.failure_states();
        reconciliation.observed.merge(&current);

        if show.is_empty() || current.intersects(show) {
            reconciliation.rows.push(ReconciledRow::Leaf {
                entry,
                classification,
            });
        }
    }

    reconciliation
}

fn leaf_keys(entries: &[FlatEntry]) -> HashSet<&KeyPath> {
    entries
        .iter()
        .filter(|e| !e.is_parent())
        .map(|e| &e.key)
        .collect()
}
