//! `alsvid-core` — statevector quantum-circuit simulation.
//!
//! Executes compiled circuits ([`alsvid_qobj::Circuit`]) numerically:
//! a 2^n complex amplitude vector per shot, gate application by
//! bit-masked block transforms, projective measurement with collapse,
//! optional per-gate noise, and named snapshot capture.
//!
//! The moving parts, leaves first:
//!
//! - [`state::Statevector`] — owns the amplitude vector; indexed reads
//!   and in-place bulk transforms.
//! - [`gates`] — basis-gate matrices and dispatch onto the store.
//! - [`noise`] — optional Pauli/Kraus error sampling after each gate.
//! - [`measure`] — measurement, reset, and snapshot capture.
//! - [`executor::Executor`] — walks the op list once per shot and
//!   aggregates histograms and snapshots.
//!
//! # Quick start
//!
//! ```rust
//! use alsvid_core::Executor;
//! use alsvid_qobj::Circuit;
//!
//! let circuit = Circuit::bell().with_shots(1000);
//! let result = Executor::new().with_seed(42).run_circuit(&circuit).unwrap();
//!
//! // A Bell pair only ever measures 00 or 11.
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! ```
//!
//! Randomness is explicit throughout: the executor derives one rng per
//! shot from `seed ^ shot_index`, and every stochastic component takes
//! the rng as an argument. There is no global generator, so identical
//! seeds give identical results — histograms included — on every run.

pub mod error;
pub mod executor;
pub mod gates;
pub mod measure;
pub mod noise;
pub mod result;
pub mod state;

pub use error::{ErrorKind, SimError, SimResult};
pub use executor::{CancelToken, DEFAULT_MAX_QUBITS, Executor};
pub use noise::{KrausBranch, NoiseModel, QuantumError};
pub use result::{BatchResult, CircuitResult, Counts, SnapshotData, SnapshotEntry, SnapshotStore};
pub use state::Statevector;
