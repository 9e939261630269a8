//! Statevector-mode adapter over the simulator core.
//!
//! The core is shot-oriented: it samples histograms and treats every
//! snapshot key alike. This adapter layers the statevector-backend
//! convention on top:
//!
//! 1. shots are forced to 1 (logged, not an error),
//! 2. mid-circuit measure/reset are rejected per circuit,
//! 3. a snapshot under the reserved key [`FINAL_STATE_KEY`] is appended
//!    to every circuit,
//! 4. after the run, that snapshot is popped from the snapshot map and
//!    renamed into the dedicated `statevector` result field.
//!
//! The renaming is deliberately kept out of the core: there the reserved
//! key is a snapshot like any other.

use chrono::Utc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, instrument, warn};

use alsvid_core::{
    BatchResult, CancelToken, CircuitResult, Executor, NoiseModel, SimError, SimResult,
    SnapshotData, SnapshotEntry,
};
use alsvid_qobj::{Circuit, Qobj, SnapshotKind};

/// Reserved snapshot key for the end-of-circuit state. Chosen to stay
/// clear of user labels; inherited from the frontends this adapter
/// serves.
pub const FINAL_STATE_KEY: &str = "32767";

/// Errors specific to statevector mode.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatevectorError {
    /// The circuit collapses state mid-run, so no exact final vector
    /// exists.
    #[error("circuit '{circuit}': statevector simulator does not support measure or reset")]
    UnsupportedOp {
        /// Name of the offending circuit.
        circuit: String,
    },

    /// The underlying simulation failed.
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// A simulator frontend that returns exact final statevectors.
pub struct StatevectorSimulator {
    executor: Executor,
}

impl StatevectorSimulator {
    /// Create a statevector simulator with default limits.
    pub fn new() -> Self {
        Self {
            executor: Executor::new().with_backend_name("statevector_simulator"),
        }
    }

    /// Set the base seed (only relevant when a noise model is attached).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.executor = self.executor.with_seed(seed);
        self
    }

    /// Set the qubit ceiling.
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.executor = self.executor.with_max_qubits(max_qubits);
        self
    }

    /// Attach a noise model.
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.executor = self.executor.with_noise(noise);
        self
    }

    /// Use an externally held cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.executor = self.executor.with_cancel_token(cancel);
        self
    }

    /// Run a qobj batch in statevector mode.
    ///
    /// Per-circuit failure policy matches the core: every circuit gets a
    /// slot, and a rejected circuit never disturbs its siblings.
    #[instrument(skip(self, qobj))]
    pub fn run(&self, qobj: &Qobj) -> BatchResult {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(qobj.circuits.len());

        for (index, raw) in qobj.circuits.iter().enumerate() {
            let start = Instant::now();
            let slot = match Circuit::compile(raw, &qobj.config, index) {
                Ok(circuit) => self.run_circuit(circuit).unwrap_or_else(|err| {
                    warn!(%err, "statevector circuit failed");
                    CircuitResult::failed(
                        raw.name
                            .clone()
                            .unwrap_or_else(|| format!("circuit{index}")),
                        &err,
                        start.elapsed().as_secs_f64(),
                    )
                }),
                Err(err) => CircuitResult::failed(
                    raw.name
                        .clone()
                        .unwrap_or_else(|| format!("circuit{index}")),
                    &err,
                    start.elapsed().as_secs_f64(),
                ),
            };
            results.push(slot);
        }

        BatchResult {
            id: qobj.id.clone(),
            success: results.iter().all(|r| r.success),
            backend: "statevector_simulator".to_string(),
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    /// Run one compiled circuit and extract its exact final state.
    pub fn run_circuit(&self, mut circuit: Circuit) -> Result<CircuitResult, StatevectorError> {
        if circuit.has_stochastic_ops() {
            return Err(StatevectorError::UnsupportedOp {
                circuit: circuit.name,
            });
        }
        if circuit.shots != 1 {
            info!(
                circuit = %circuit.name,
                shots = circuit.shots,
                "statevector simulator only supports 1 shot, setting shots=1"
            );
            circuit.shots = 1;
        }
        circuit.snapshot(FINAL_STATE_KEY, SnapshotKind::Statevector);

        let mut slot = self.executor.run_circuit(&circuit)?;
        extract_final_state(&mut slot);
        Ok(slot)
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pop the reserved snapshot and rename it into the `statevector` field.
fn extract_final_state(slot: &mut CircuitResult) {
    if let Some(mut entries) = slot.snapshots.remove(FINAL_STATE_KEY) {
        if let Some(SnapshotEntry {
            data: SnapshotData::Statevector(amplitudes),
            ..
        }) = entries.pop()
        {
            slot.statevector = Some(amplitudes);
        }
    }
}

/// Convenience: run one circuit and return just the final amplitudes.
pub fn simulate(circuit: Circuit) -> SimResult<Vec<num_complex::Complex64>> {
    let slot = StatevectorSimulator::new()
        .run_circuit(circuit)
        .map_err(|err| match err {
            StatevectorError::Sim(e) => e,
            other => SimError::Internal(other.to_string()),
        })?;
    Ok(slot.statevector.unwrap_or_default())
}
