//! Persisted record of the last delivered trend set.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The trend-name set of the last notification that was actually sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Primary trend names (sorted on disk)
    pub trend_names: BTreeSet<String>,

    /// Display timestamp the notification carried
    pub timestamp: String,

    /// Wall-clock time the notification was sent
    #[serde(default = "Utc::now")]
    pub sent_at: DateTime<Utc>,

    /// SHA-256 of the sorted names, for comparing runs in logs
    #[serde(default)]
    pub fingerprint: String,
}

impl Snapshot {
    /// Build a snapshot for a set of names that has just been delivered.
    pub fn new<I, S>(names: I, timestamp: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let trend_names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let fingerprint = fingerprint(&trend_names);

        Self {
            trend_names,
            timestamp: timestamp.into(),
            sent_at: Utc::now(),
            fingerprint,
        }
    }

    /// Whether the stored set equals `names`, ignoring order and duplicates.
    pub fn same_names(&self, names: &HashSet<String>) -> bool {
        self.trend_names.len() == names.len()
            && names.iter().all(|n| self.trend_names.contains(n))
    }
}

/// Hex SHA-256 over the sorted, newline-joined names.
fn fingerprint(names: &BTreeSet<String>) -> String {
    let mut hasher = Sha256::new();
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_order_insensitive() {
        let a = Snapshot::new(["Storm", "Election"], "t");
        let b = Snapshot::new(["Election", "Storm", "Storm"], "t");
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.fingerprint.len(), 64);
    }

    #[test]
    fn test_serialized_field_names() {
        let snapshot = Snapshot::new(["B", "A"], "Oct 16, 03:00 PM EDT");
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["trendNames"], serde_json::json!(["A", "B"]));
        assert_eq!(value["timestamp"], "Oct 16, 03:00 PM EDT");
        assert!(value.get("sentAt").is_some());
    }

    #[test]
    fn test_minimal_document_deserializes() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"trendNames": ["A"], "timestamp": "x"}"#).unwrap();
        assert!(snapshot.trend_names.contains("A"));
        assert!(snapshot.fingerprint.is_empty());
    }

    #[test]
    fn test_same_names() {
        let snapshot = Snapshot::new(["A", "B"], "t");
        let reordered: HashSet<String> = ["B", "A"].iter().map(|s| s.to_string()).collect();
        let extra: HashSet<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();

        assert!(snapshot.same_names(&reordered));
        assert!(!snapshot.same_names(&extra));
    }
}
