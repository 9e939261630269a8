//! Per-gate noise: Pauli-error insertion and Kraus-branch sampling.
//!
//! Noise is applied after the ideal gate. Each noisy gate application
//! consumes exactly one draw from the caller-supplied random source, so
//! a seeded run replays the identical error sequence regardless of where
//! the seed came from.

use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SimResult;
use crate::gates;
use crate::state::Statevector;

/// One branch of a Kraus channel with an assigned sampling probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrausBranch {
    /// Probability of sampling this branch.
    pub prob: f64,
    /// The 2×2 operator applied to each affected qubit when sampled.
    pub matrix: [[Complex64; 2]; 2],
}

/// The error process attached to one gate name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantumError {
    /// Insert X, Y, or Z after the gate with the given probabilities;
    /// identity with the remainder.
    Pauli {
        /// Probability of an X error.
        p_x: f64,
        /// Probability of a Y error.
        p_y: f64,
        /// Probability of a Z error.
        p_z: f64,
    },
    /// Sample one branch from a list of Kraus operators. The state is
    /// renormalized after the (generally non-unitary) operator.
    Kraus(Vec<KrausBranch>),
}

impl QuantumError {
    /// Depolarizing channel: total error probability `p`, split evenly
    /// across the three Paulis.
    pub fn depolarizing(p: f64) -> Self {
        QuantumError::Pauli {
            p_x: p / 3.0,
            p_y: p / 3.0,
            p_z: p / 3.0,
        }
    }

    /// Bit-flip channel: X with probability `p`.
    pub fn bit_flip(p: f64) -> Self {
        QuantumError::Pauli {
            p_x: p,
            p_y: 0.0,
            p_z: 0.0,
        }
    }

    /// Phase-flip channel: Z with probability `p`.
    pub fn phase_flip(p: f64) -> Self {
        QuantumError::Pauli {
            p_x: 0.0,
            p_y: 0.0,
            p_z: p,
        }
    }

    /// Amplitude damping with parameter `gamma`: the decay branch drops
    /// |1⟩ to |0⟩, the no-decay branch attenuates |1⟩.
    pub fn amplitude_damping(gamma: f64) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        QuantumError::Kraus(vec![
            KrausBranch {
                prob: 1.0 - gamma,
                matrix: [
                    [one, zero],
                    [zero, Complex64::new((1.0 - gamma).sqrt(), 0.0)],
                ],
            },
            KrausBranch {
                prob: gamma,
                matrix: [[zero, one], [zero, zero]],
            },
        ])
    }
}

/// Per-gate error specification for a whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Error process per gate name (e.g. "cx" → depolarizing).
    #[serde(default)]
    pub gate_errors: BTreeMap<String, QuantumError>,
}

impl NoiseModel {
    /// Create an empty noise model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an error process to a gate name.
    pub fn with_gate_error(mut self, gate: impl Into<String>, error: QuantumError) -> Self {
        self.gate_errors.insert(gate.into(), error);
        self
    }

    /// Look up the error process for a gate name.
    pub fn error_for(&self, gate: &str) -> Option<&QuantumError> {
        self.gate_errors.get(gate)
    }

    /// Whether the model perturbs anything at all.
    pub fn is_empty(&self) -> bool {
        self.gate_errors.is_empty()
    }
}

/// Apply a sampled error branch to the affected qubits.
///
/// Consumes exactly one uniform draw from `rng`. For Pauli errors the
/// sampled Pauli is applied to every qubit the gate touched; for Kraus
/// channels the sampled operator is applied likewise and the state is
/// renormalized.
pub fn apply_error<R: Rng>(
    state: &mut Statevector,
    error: &QuantumError,
    qubits: &[u32],
    rng: &mut R,
) -> SimResult<()> {
    let r: f64 = rng.r#gen();
    match error {
        QuantumError::Pauli { p_x, p_y, p_z } => {
            let m = if r < *p_x {
                gates::pauli_x()
            } else if r < p_x + p_y {
                gates::pauli_y()
            } else if r < p_x + p_y + p_z {
                gates::pauli_z()
            } else {
                return Ok(()); // identity branch
            };
            for &q in qubits {
                state.apply_one(&m, q as usize);
            }
            Ok(())
        }
        QuantumError::Kraus(branches) => {
            let total: f64 = branches.iter().map(|b| b.prob).sum();
            let mut cumulative = 0.0;
            for branch in branches {
                cumulative += branch.prob / total;
                if r < cumulative {
                    for &q in qubits {
                        state.apply_one(&branch.matrix, q as usize);
                    }
                    state.renormalize()?;
                    return Ok(());
                }
            }
            // r landed in the top rounding sliver; last branch wins.
            if let Some(branch) = branches.last() {
                for &q in qubits {
                    state.apply_one(&branch.matrix, q as usize);
                }
                state.renormalize()?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_model() {
        let model = NoiseModel::new();
        assert!(model.is_empty());
        assert!(model.error_for("cx").is_none());
    }

    #[test]
    fn test_certain_bit_flip() {
        let mut sv = Statevector::new(1, 24).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        apply_error(&mut sv, &QuantumError::bit_flip(1.0), &[0], &mut rng).unwrap();
        assert!((sv.amplitudes()[1].norm() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let mut sv = Statevector::new(1, 24).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            apply_error(&mut sv, &QuantumError::depolarizing(0.0), &[0], &mut rng).unwrap();
        }
        assert!((sv.amplitudes()[0].norm() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_one_draw_per_application() {
        // Two rngs from the same seed stay in lockstep when one drives
        // noisy applications and the other draws manually.
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let mut sv = Statevector::new(1, 24).unwrap();
        let error = QuantumError::depolarizing(0.3);
        for _ in 0..10 {
            apply_error(&mut sv, &error, &[0], &mut a).unwrap();
            let _: f64 = b.r#gen();
        }
        assert_eq!(a.r#gen::<u64>(), b.r#gen::<u64>());
    }

    #[test]
    fn test_amplitude_damping_decay_branch() {
        // From |1⟩, the decay branch lands exactly on |0⟩.
        let mut sv = Statevector::new(1, 24).unwrap();
        sv.apply_one(&gates::pauli_x(), 0);
        let QuantumError::Kraus(branches) = QuantumError::amplitude_damping(0.2) else {
            panic!("expected Kraus");
        };
        sv.apply_one(&branches[1].matrix, 0);
        sv.renormalize().unwrap();
        assert!((sv.amplitudes()[0].norm() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_model_round_trips_through_json() {
        let model = NoiseModel::new()
            .with_gate_error("cx", QuantumError::depolarizing(0.01))
            .with_gate_error("u3", QuantumError::amplitude_damping(0.05));
        let json = serde_json::to_string(&model).unwrap();
        let back: NoiseModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.error_for("cx"), model.error_for("cx"));
        assert_eq!(back.error_for("u3"), model.error_for("u3"));
    }
}
