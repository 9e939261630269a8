//! Error types for program parsing and validation.

use thiserror::Error;

/// Errors raised while compiling a qobj document into a strict [`Circuit`].
///
/// All of these are detected at the boundary, before any simulation work
/// has been done: a circuit that fails validation is rejected wholesale.
///
/// [`Circuit`]: crate::Circuit
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QobjError {
    /// An operation names a gate the simulator does not know.
    #[error("unknown gate '{gate}' in circuit '{circuit}'")]
    UnknownGate {
        /// The offending gate name.
        gate: String,
        /// Name of the circuit containing it.
        circuit: String,
    },

    /// A gate was given the wrong number of parameters.
    #[error("gate '{gate}' expects {expected} parameter(s), got {got}")]
    ParameterCount {
        /// The gate name.
        gate: String,
        /// Number of parameters the gate requires.
        expected: usize,
        /// Number of parameters supplied.
        got: usize,
    },

    /// A gate was given the wrong number of qubit operands.
    #[error("gate '{gate}' acts on {expected} qubit(s), got {got}")]
    QubitCount {
        /// The gate name.
        gate: String,
        /// Number of qubits the gate requires.
        expected: usize,
        /// Number of qubit operands supplied.
        got: usize,
    },

    /// An operation references a qubit outside the declared register.
    #[error("operation references qubit {qubit} but circuit '{circuit}' has {num_qubits} qubit(s)")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Declared register width.
        num_qubits: u32,
        /// Name of the circuit containing it.
        circuit: String,
    },

    /// An operation references a classical bit outside the declared register.
    #[error(
        "operation references clbit {clbit} but circuit '{circuit}' has {num_clbits} clbit(s)"
    )]
    ClbitOutOfRange {
        /// The offending classical bit index.
        clbit: u32,
        /// Declared classical register width.
        num_clbits: u32,
        /// Name of the circuit containing it.
        circuit: String,
    },

    /// A measure operation lists a different number of qubits and clbits.
    #[error("measure lists {qubits} qubit(s) but {clbits} clbit(s) in circuit '{circuit}'")]
    MeasureWidthMismatch {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of destination clbits.
        clbits: usize,
        /// Name of the circuit containing it.
        circuit: String,
    },

    /// A snapshot operation is missing its key, or names an unknown kind.
    #[error("bad snapshot in circuit '{circuit}': {reason}")]
    BadSnapshot {
        /// What was wrong with it.
        reason: String,
        /// Name of the circuit containing it.
        circuit: String,
    },

    /// The document itself could not be deserialized.
    #[error("malformed qobj document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Result type for qobj parsing operations.
pub type QobjResult<T> = Result<T, QobjError>;
