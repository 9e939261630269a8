//! Error types for the simulator core.

use thiserror::Error;

/// Coarse classification of a [`SimError`], reported alongside the
/// message in failed result slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed program; rejected before any simulation work.
    Validation,
    /// The circuit would exceed addressable memory; rejected before
    /// allocation.
    Resource,
    /// An internal numerical invariant was violated mid-simulation.
    Numerical,
    /// Unexpected internal failure or cancellation.
    Runtime,
}

/// Errors produced while executing a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The program description failed boundary validation.
    #[error(transparent)]
    Validation(#[from] alsvid_qobj::QobjError),

    /// Qubit count exceeds the configured maximum.
    ///
    /// The amplitude vector takes 2^n × 16 bytes; this is checked before
    /// allocating, so the failure surfaces as an error rather than an
    /// out-of-memory fault.
    #[error("circuit needs {requested} qubits but the simulator is limited to {max}")]
    TooManyQubits {
        /// Qubits the circuit declares.
        requested: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A measurement sampled a branch with probability below the
    /// numerical floor. Legitimate collapse never lands here; this
    /// signals a normalization bug upstream.
    #[error("sampled measurement outcome {outcome} with probability {prob:.3e}")]
    ZeroProbabilityCollapse {
        /// The sampled outcome bits.
        outcome: u64,
        /// Its computed probability.
        prob: f64,
    },

    /// The state norm drifted beyond tolerance after a shot's op walk.
    #[error("state norm drifted to {norm} after unitary evolution")]
    NormalizationDrift {
        /// The measured squared norm.
        norm: f64,
    },

    /// The run was cancelled at a shot boundary.
    #[error("execution cancelled")]
    Cancelled,

    /// Unexpected internal failure during gate application.
    #[error("internal simulator error: {0}")]
    Internal(String),
}

impl SimError {
    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::Validation(_) => ErrorKind::Validation,
            SimError::TooManyQubits { .. } => ErrorKind::Resource,
            SimError::ZeroProbabilityCollapse { .. } | SimError::NormalizationDrift { .. } => {
                ErrorKind::Numerical
            }
            SimError::Cancelled | SimError::Internal(_) => ErrorKind::Runtime,
        }
    }
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            SimError::TooManyQubits {
                requested: 40,
                max: 24
            }
            .kind(),
            ErrorKind::Resource
        );
        assert_eq!(
            SimError::NormalizationDrift { norm: 0.5 }.kind(),
            ErrorKind::Numerical
        );
        assert_eq!(SimError::Cancelled.kind(), ErrorKind::Runtime);
    }
}
