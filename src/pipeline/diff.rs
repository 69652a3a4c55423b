//! Change detection between the current trend set and the last delivered one.
//!
//! Comparison is by set equality of primary names; order, duplicates,
//! metrics and links do not count as changes.

use std::collections::{BTreeSet, HashSet};

use crate::models::Snapshot;

/// Names that entered or left the trend list since the last delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl TrendDiff {
    /// Diff `current` against the previous snapshot; everything is added when there is none.
    pub fn between(previous: Option<&Snapshot>, current: &HashSet<String>) -> Self {
        let Some(previous) = previous else {
            return Self {
                added: current.iter().cloned().collect(),
                removed: BTreeSet::new(),
            };
        };

        let added = current
            .iter()
            .filter(|name| !previous.trend_names.contains(*name))
            .cloned()
            .collect();
        let removed = previous
            .trend_names
            .iter()
            .filter(|name| !current.contains(*name))
            .cloned()
            .collect();

        Self { added, removed }
    }

    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Whether a notification should go out for `current`.
///
/// Always true without a previous snapshot, even for an empty set.
pub fn should_notify(current: &HashSet<String>, previous: Option<&Snapshot>) -> bool {
    match previous {
        None => true,
        Some(snapshot) => !snapshot.same_names(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_previous_always_notifies() {
        assert!(should_notify(&names(&["Storm"]), None));
        assert!(should_notify(&HashSet::new(), None));
    }

    #[test]
    fn test_reordered_set_is_unchanged() {
        let previous = Snapshot::new(["Storm", "Election", "GameNight"], "t");
        let current = names(&["GameNight", "Storm", "Election"]);

        assert!(!should_notify(&current, Some(&previous)));
        assert!(!TrendDiff::between(Some(&previous), &current).has_changes());
    }

    #[test]
    fn test_single_replacement_notifies() {
        let previous = Snapshot::new(["Storm", "Election", "GameNight"], "t");
        let current = names(&["Storm", "Election", "Finals"]);

        assert!(should_notify(&current, Some(&previous)));

        let diff = TrendDiff::between(Some(&previous), &current);
        assert_eq!(diff.added, BTreeSet::from(["Finals".to_string()]));
        assert_eq!(diff.removed, BTreeSet::from(["GameNight".to_string()]));
        assert_eq!(diff.change_count(), 2);
    }

    #[test]
    fn test_decision_is_idempotent() {
        let previous = Snapshot::new(["A", "B"], "t");
        let current = names(&["A", "C"]);

        let first = should_notify(&current, Some(&previous));
        let second = should_notify(&current, Some(&previous));
        assert_eq!(first, second);
    }

    #[test]
    fn test_subset_and_superset_are_changes() {
        let previous = Snapshot::new(["A", "B"], "t");

        assert!(should_notify(&names(&["A"]), Some(&previous)));
        assert!(should_notify(&names(&["A", "B", "C"]), Some(&previous)));
        assert!(should_notify(&HashSet::new(), Some(&previous)));
    }

    #[test]
    fn test_first_run_diff_is_all_added() {
        let diff = TrendDiff::between(None, &names(&["A", "B"]));
        assert_eq!(diff.added.len(), 2);
        assert!(diff.removed.is_empty());
    }
}
