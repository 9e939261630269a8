//! `alsvid-qobj` — the compiled-circuit program description.
//!
//! A frontend hands the simulator a qobj JSON document: a batch of
//! circuits, each an ordered operation list over declared qubit/clbit
//! registers, plus shot and seed configuration. This crate owns both
//! shapes of that data:
//!
//! - the **raw document** types ([`Qobj`], [`QobjCircuit`], ...) that
//!   tolerate the loosely-shaped JSON frontends produce, and
//! - the **strict model** ([`Circuit`], [`Operation`], [`GateKind`]) the
//!   executor runs, produced by [`Circuit::compile`] which validates
//!   gate names, parameter counts, and register bounds exactly once.
//!
//! Validation failures are circuit-scoped: a bad circuit is rejected
//! wholesale with a [`QobjError`], and the caller decides what that means
//! for its batch.

pub mod circuit;
pub mod document;
pub mod error;
pub mod gate;
pub mod operation;

pub use circuit::{Circuit, DEFAULT_SHOTS};
pub use document::{CircuitHeader, CompiledCircuit, Qobj, QobjCircuit, QobjInstruction, RunConfig};
pub use error::{QobjError, QobjResult};
pub use gate::{Gate, GateKind};
pub use operation::{Operation, SnapshotKind};
