//! Result types: histograms, snapshot captures, and per-circuit slots.

use chrono::{DateTime, Utc};
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Histogram of classical outcomes: bitstring → count.
///
/// Bitstrings follow register order with clbit 0 rightmost. Insertion is
/// a plain counter increment, so accumulation across shots is
/// commutative — shot completion order never shows in the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `bitstring`.
    pub fn add(&mut self, bitstring: impl Into<String>) {
        *self.0.entry(bitstring.into()).or_insert(0) += 1;
    }

    /// Get the count for a bitstring (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded outcomes.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// The most frequent outcome, if any.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.0
            .iter()
            .max_by_key(|&(_, &count)| count)
            .map(|(bitstring, &count)| (bitstring.as_str(), count))
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (bitstring, count) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(bitstring, &count)| (bitstring.as_str(), count))
    }
}

/// One captured snapshot value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotData {
    /// Full amplitude vector.
    Statevector(Vec<Complex64>),
    /// Probability distribution over basis outcomes.
    Probabilities(Vec<f64>),
    /// Per-qubit ⟨Z⟩ expectation values.
    ExpectationZ(Vec<f64>),
}

/// One snapshot capture, tagged with the shot that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Shot index the capture happened in.
    pub shot: u32,
    /// The captured value.
    pub data: SnapshotData,
}

/// Snapshot key → ordered captures. Keys colliding across shots
/// accumulate; nothing overwrites. `BTreeMap` keeps serialization order
/// deterministic.
pub type SnapshotStore = BTreeMap<String, Vec<SnapshotEntry>>;

/// The result slot for one circuit of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitResult {
    /// Circuit name.
    pub name: String,
    /// Whether the circuit ran to completion.
    pub success: bool,
    /// Shots actually executed.
    pub shots: u32,
    /// Classical outcome histogram (empty when the circuit has no
    /// classical register).
    #[serde(default, skip_serializing_if = "Counts::is_empty")]
    pub counts: Counts,
    /// Snapshot captures, keyed by label.
    #[serde(default, skip_serializing_if = "SnapshotStore::is_empty")]
    pub snapshots: SnapshotStore,
    /// Exact final statevector, when an adapter extracted one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statevector: Option<Vec<Complex64>>,
    /// Wall-clock execution time in seconds.
    pub time_taken: f64,
    /// Error message when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CircuitResult {
    /// Build a failed slot from an error.
    pub fn failed(name: impl Into<String>, error: impl std::fmt::Display, time_taken: f64) -> Self {
        Self {
            name: name.into(),
            success: false,
            shots: 0,
            counts: Counts::new(),
            snapshots: SnapshotStore::new(),
            statevector: None,
            time_taken,
            error: Some(error.to_string()),
        }
    }
}

/// The result of a whole batch: one slot per submitted circuit, in
/// submission order, plus batch metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Batch identifier echoed from the qobj.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// True only when every circuit succeeded.
    pub success: bool,
    /// Name of the backend that produced this result.
    pub backend: String,
    /// When the batch started.
    pub started_at: DateTime<Utc>,
    /// When the batch finished.
    pub finished_at: DateTime<Utc>,
    /// Per-circuit result slots.
    pub results: Vec<CircuitResult>,
}

impl BatchResult {
    /// Look up a circuit's slot by name.
    pub fn circuit(&self, name: &str) -> Option<&CircuitResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.add("00");
        counts.add("11");
        counts.add("00");
        assert_eq!(counts.get("00"), 2);
        assert_eq!(counts.get("11"), 1);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.most_frequent(), Some(("00", 2)));
    }

    #[test]
    fn test_counts_merge_is_order_independent() {
        let mut forward = Counts::new();
        let mut backward = Counts::new();
        let outcomes = ["0", "1", "1", "0", "1"];
        for o in outcomes {
            forward.add(o);
        }
        for o in outcomes.iter().rev() {
            backward.add(*o);
        }
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_circuit_result_serialization_skips_empty() {
        let result = CircuitResult {
            name: "c0".into(),
            success: true,
            shots: 1,
            counts: Counts::new(),
            snapshots: SnapshotStore::new(),
            statevector: None,
            time_taken: 0.1,
            error: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("counts"));
        assert!(!json.contains("snapshots"));
        assert!(!json.contains("statevector"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_snapshot_entries_keep_shot_tags() {
        let mut store = SnapshotStore::new();
        store.entry("mid".into()).or_default().push(SnapshotEntry {
            shot: 0,
            data: SnapshotData::Probabilities(vec![1.0]),
        });
        store.entry("mid".into()).or_default().push(SnapshotEntry {
            shot: 1,
            data: SnapshotData::Probabilities(vec![1.0]),
        });
        assert_eq!(store["mid"].len(), 2);
        assert_eq!(store["mid"][1].shot, 1);
    }
}
