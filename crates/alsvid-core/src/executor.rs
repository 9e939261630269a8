//! The circuit executor: per-shot state machine and batch orchestration.

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use alsvid_qobj::{Circuit, Operation, Qobj};

use crate::error::{SimError, SimResult};
use crate::gates;
use crate::measure;
use crate::noise::{self, NoiseModel};
use crate::result::{BatchResult, CircuitResult, Counts, SnapshotEntry, SnapshotStore};
use crate::state::Statevector;

/// Default qubit ceiling: 2^24 amplitudes ≈ 256 MiB per in-flight shot.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Squared-norm drift beyond this after a shot's op walk aborts the
/// circuit with a numerical error.
const NORM_TOLERANCE: f64 = 1e-6;

/// Cooperative cancellation flag, checked at shot boundaries.
///
/// Clone it, hand one copy to the executor, keep the other to trip from
/// another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs compiled circuits shot by shot.
///
/// Per shot the machine is Ready → Running ↔ Measuring → Done: a fresh
/// amplitude vector, a walk over the op list (dropping into measurement
/// collapse as needed), then histogram/snapshot accumulation and
/// discard. Shots are mutually independent: each gets its own vector and
/// its own rng seeded `base_seed ^ shot_index`, so the aggregate is the
/// same under any execution order.
pub struct Executor {
    max_qubits: u32,
    seed: u64,
    backend_name: String,
    noise: Option<NoiseModel>,
    cancel: CancelToken,
}

impl Executor {
    /// Create an executor with default limits, seed 0, and no noise.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: 0,
            backend_name: "qasm_simulator".to_string(),
            noise: None,
            cancel: CancelToken::new(),
        }
    }

    /// Set the qubit ceiling.
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set the base seed. Per-circuit seeds in the program override it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the backend name reported in results.
    pub fn with_backend_name(mut self, name: impl Into<String>) -> Self {
        self.backend_name = name.into();
        self
    }

    /// Attach a noise model.
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Use an externally held cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get a clone of the executor's cancellation token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run a whole qobj batch.
    ///
    /// Every submitted circuit gets a result slot, in submission order.
    /// A circuit that fails validation or aborts mid-run yields
    /// `success = false` with its message; sibling circuits are
    /// unaffected.
    #[instrument(skip(self, qobj), fields(backend = %self.backend_name))]
    pub fn run(&self, qobj: &Qobj) -> BatchResult {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(qobj.circuits.len());

        for (index, raw) in qobj.circuits.iter().enumerate() {
            let start = Instant::now();
            let slot = match Circuit::compile(raw, &qobj.config, index) {
                Ok(circuit) => self.run_circuit(&circuit).unwrap_or_else(|err| {
                    warn!(circuit = %circuit.name, %err, "circuit aborted");
                    CircuitResult::failed(
                        circuit.name.as_str(),
                        &err,
                        start.elapsed().as_secs_f64(),
                    )
                }),
                Err(err) => {
                    let name = raw
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("circuit{index}"));
                    warn!(circuit = %name, %err, "circuit rejected");
                    CircuitResult::failed(
                        name,
                        &SimError::from(err),
                        start.elapsed().as_secs_f64(),
                    )
                }
            };
            results.push(slot);
        }

        BatchResult {
            id: qobj.id.clone(),
            success: results.iter().all(|r| r.success),
            backend: self.backend_name.clone(),
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    /// Run one compiled circuit for its configured shot count.
    #[instrument(skip(self, circuit), fields(circuit = %circuit.name))]
    pub fn run_circuit(&self, circuit: &Circuit) -> SimResult<CircuitResult> {
        let start = Instant::now();

        // Surface the memory bound before the shot loop allocates.
        if circuit.num_qubits > self.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: circuit.num_qubits,
                max: self.max_qubits,
            });
        }

        debug!(
            qubits = circuit.num_qubits,
            shots = circuit.shots,
            ops = circuit.ops.len(),
            "starting circuit"
        );

        let base_seed = circuit.seed.unwrap_or(self.seed);
        let mut counts = Counts::new();
        let mut snapshots = SnapshotStore::new();

        for shot in 0..circuit.shots {
            if self.cancel.is_cancelled() {
                return Err(SimError::Cancelled);
            }
            let mut rng = StdRng::seed_from_u64(base_seed ^ u64::from(shot));
            let creg = self.run_shot(circuit, shot, &mut rng, &mut snapshots)?;
            if circuit.num_clbits > 0 {
                counts.add(bitstring(&creg));
            }
            if shot > 0 && shot % 1000 == 0 {
                debug!("completed {shot} shots");
            }
        }

        let time_taken = start.elapsed().as_secs_f64();
        debug!(time_taken, "circuit completed");

        Ok(CircuitResult {
            name: circuit.name.clone(),
            success: true,
            shots: circuit.shots,
            counts,
            snapshots,
            statevector: None,
            time_taken,
            error: None,
        })
    }

    /// One shot: fresh |0…0⟩, walk the ops, return the classical
    /// register. Snapshots land in `snapshots` tagged with `shot`.
    fn run_shot(
        &self,
        circuit: &Circuit,
        shot: u32,
        rng: &mut StdRng,
        snapshots: &mut SnapshotStore,
    ) -> SimResult<Vec<bool>> {
        let mut state = Statevector::new(circuit.num_qubits, self.max_qubits)?;
        let mut creg = vec![false; circuit.num_clbits as usize];

        for op in &circuit.ops {
            match op {
                Operation::Gate(gate) => {
                    gates::apply_gate(&mut state, gate)?;
                    if let Some(noise) = &self.noise {
                        if let Some(error) = noise.error_for(gate.kind.name()) {
                            noise::apply_error(&mut state, error, &gate.qubits, rng)?;
                        }
                    }
                }
                Operation::Measure { qubits, clbits } => {
                    let qs: Vec<usize> = qubits.iter().map(|&q| q as usize).collect();
                    let outcome = measure::measure(&mut state, &qs, rng)?;
                    for (j, &c) in clbits.iter().enumerate() {
                        creg[c as usize] = (outcome >> j) & 1 == 1;
                    }
                }
                Operation::Reset { qubits } => {
                    let qs: Vec<usize> = qubits.iter().map(|&q| q as usize).collect();
                    measure::reset(&mut state, &qs, rng)?;
                }
                Operation::Snapshot { key, kind } => {
                    snapshots.entry(key.clone()).or_default().push(SnapshotEntry {
                        shot,
                        data: measure::capture(&state, *kind),
                    });
                }
                Operation::Barrier => {}
            }
        }

        let norm = state.norm_sqr();
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(SimError::NormalizationDrift { norm });
        }
        Ok(creg)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a classical register as a bitstring, clbit 0 rightmost.
fn bitstring(creg: &[bool]) -> String {
    creg.iter()
        .rev()
        .map(|&bit| if bit { '1' } else { '0' })
        .collect()
}
