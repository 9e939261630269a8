//! Circuit operations — the closed tagged variant the executor dispatches on.

use serde::{Deserialize, Serialize};

use crate::gate::Gate;

/// What a snapshot captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    /// Full amplitude vector at the snapshot point.
    Statevector,
    /// Probability distribution over computational-basis outcomes.
    Probabilities,
    /// Per-qubit Pauli-Z expectation values.
    ExpectationZ,
}

impl SnapshotKind {
    /// Parse a snapshot kind from its qobj name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "statevector" => Some(SnapshotKind::Statevector),
            "probabilities" => Some(SnapshotKind::Probabilities),
            "expectation_z" => Some(SnapshotKind::ExpectationZ),
            _ => None,
        }
    }
}

/// One step of a compiled circuit.
///
/// Immutable once parsed from the program description; every qubit and
/// clbit index has already been checked against the register bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Apply a unitary gate.
    Gate(Gate),
    /// Projective measurement of `qubits` into `clbits` (same length).
    Measure {
        /// Measured qubit indices.
        qubits: Vec<u32>,
        /// Destination classical bit indices, parallel to `qubits`.
        clbits: Vec<u32>,
    },
    /// Collapse `qubits` and force them back to |0⟩.
    Reset {
        /// Reset qubit indices.
        qubits: Vec<u32>,
    },
    /// Capture the current state under `key` without mutating it.
    Snapshot {
        /// Snapshot label. Reserved keys are an adapter convention; the
        /// core stores them like any other key.
        key: String,
        /// What to capture.
        kind: SnapshotKind,
    },
    /// Synchronization point; a no-op for simulation.
    Barrier,
}

impl Operation {
    /// Whether this operation collapses the state stochastically.
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Operation::Measure { .. } | Operation::Reset { .. })
    }
}
