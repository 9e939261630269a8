//! Raw qobj document shapes.
//!
//! These mirror the JSON a frontend emits: dynamically shaped, everything
//! optional that can be optional. They exist only at the boundary — the
//! executor works on the strict [`Circuit`](crate::Circuit) type that
//! [`Circuit::compile`](crate::Circuit::compile) produces from them.

use serde::{Deserialize, Serialize};

/// Batch-level run configuration, overridable per circuit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of shots to run each circuit for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
    /// Base seed for the random source. Absent means nondeterministic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Maximum addressable qubit count (memory bound).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_qubits: Option<u32>,
}

impl RunConfig {
    /// Merge a per-circuit override over this config. Fields present in
    /// `over` win.
    pub fn merged_with(&self, over: &RunConfig) -> RunConfig {
        RunConfig {
            shots: over.shots.or(self.shots),
            seed: over.seed.or(self.seed),
            max_qubits: over.max_qubits.or(self.max_qubits),
        }
    }
}

/// A full qobj document: one batch of circuits plus shared config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Qobj {
    /// Batch identifier, echoed into the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Batch-level configuration.
    #[serde(default)]
    pub config: RunConfig,
    /// The circuits to run.
    pub circuits: Vec<QobjCircuit>,
}

impl Qobj {
    /// Parse a qobj document from JSON text.
    pub fn from_json(text: &str) -> crate::QobjResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One circuit entry of a qobj document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QobjCircuit {
    /// Circuit name; defaults to its batch position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Per-circuit config override (e.g. forcing shots=1).
    #[serde(default)]
    pub config: RunConfig,
    /// The compiled operation stream.
    pub compiled_circuit: CompiledCircuit,
}

/// The compiled circuit payload: register sizes and the operation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledCircuit {
    /// Register declarations.
    pub header: CircuitHeader,
    /// Ordered operation list.
    #[serde(default)]
    pub operations: Vec<QobjInstruction>,
}

/// Register declarations for one circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitHeader {
    /// Quantum register width.
    pub number_of_qubits: u32,
    /// Classical register width.
    #[serde(default)]
    pub number_of_clbits: u32,
}

/// One raw operation entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QobjInstruction {
    /// Operation name: a basis gate, `measure`, `reset`, `snapshot`, or
    /// `barrier`.
    pub name: String,
    /// Qubit operands.
    #[serde(default)]
    pub qubits: Vec<u32>,
    /// Classical bit operands (measure only).
    #[serde(default)]
    pub clbits: Vec<u32>,
    /// Gate parameters. For snapshots the first param may carry a numeric
    /// key, a convention some frontends use instead of `label`.
    #[serde(default)]
    pub params: Vec<f64>,
    /// Snapshot label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Snapshot kind name; defaults to `statevector`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_type: Option<String>,
}
