//! Projective measurement, reset, and snapshot capture.

use rand::Rng;

use alsvid_qobj::SnapshotKind;

use crate::error::{SimError, SimResult};
use crate::gates;
use crate::result::SnapshotData;
use crate::state::{PROB_FLOOR, Statevector};

/// Measure `qubits` jointly: compute their marginal distribution, sample
/// an outcome, project the state onto it, and renormalize.
///
/// Returns the outcome bits, bit `j` carrying the value of `qubits[j]`.
pub fn measure<R: Rng>(
    state: &mut Statevector,
    qubits: &[usize],
    rng: &mut R,
) -> SimResult<u64> {
    let probs = state.marginal_probs(qubits);
    let outcome = sample_outcome(&probs, rng)?;
    state.collapse(qubits, outcome, probs[outcome as usize])?;
    Ok(outcome)
}

/// Reset `qubits` to |0⟩: measure, then flip back every qubit that
/// collapsed to 1.
pub fn reset<R: Rng>(state: &mut Statevector, qubits: &[usize], rng: &mut R) -> SimResult<()> {
    let outcome = measure(state, qubits, rng)?;
    let x = gates::pauli_x();
    for (j, &q) in qubits.iter().enumerate() {
        if (outcome >> j) & 1 == 1 {
            state.apply_one(&x, q);
        }
    }
    Ok(())
}

/// Capture a snapshot of the current state. Never mutates the state.
pub fn capture(state: &Statevector, kind: SnapshotKind) -> SnapshotData {
    match kind {
        SnapshotKind::Statevector => SnapshotData::Statevector(state.amplitudes().to_vec()),
        SnapshotKind::Probabilities => SnapshotData::Probabilities(state.probabilities()),
        SnapshotKind::ExpectationZ => {
            // ⟨Z_q⟩ = P(q=0) − P(q=1) for each qubit.
            let mut values = vec![0.0; state.num_qubits()];
            for (i, amp) in state.amplitudes().iter().enumerate() {
                let p = amp.norm_sqr();
                for (q, value) in values.iter_mut().enumerate() {
                    if (i >> q) & 1 == 0 {
                        *value += p;
                    } else {
                        *value -= p;
                    }
                }
            }
            SnapshotData::ExpectationZ(values)
        }
    }
}

/// Sample an index from a probability vector with one uniform draw.
///
/// A sampled branch below [`PROB_FLOOR`] is an internal invariant
/// violation (a prior normalization bug), not a legitimate collapse.
fn sample_outcome<R: Rng>(probs: &[f64], rng: &mut R) -> SimResult<u64> {
    let r: f64 = rng.r#gen();
    let mut cumulative = 0.0;
    let mut sampled = probs.len() - 1;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            sampled = i;
            break;
        }
    }
    if probs[sampled] < PROB_FLOOR {
        return Err(SimError::ZeroProbabilityCollapse {
            outcome: sampled as u64,
            prob: probs[sampled],
        });
    }
    Ok(sampled as u64)
}
