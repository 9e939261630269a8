//! The amplitude store: one 2^n complex vector, mutated in place.

use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Probabilities below this floor are treated as numerically zero.
/// Sampling a branch this improbable signals a normalization bug, not a
/// legitimate collapse.
pub const PROB_FLOOR: f64 = 1e-12;

/// A statevector over `num_qubits` qubits.
///
/// Index = computational-basis bit pattern, qubit 0 as the least
/// significant bit. All transforms are in-place; nothing allocates in
/// steady state beyond the vector itself.
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a statevector initialized to |0...0⟩.
    ///
    /// Rejects `num_qubits > max_qubits` with
    /// [`SimError::TooManyQubits`] *before* allocating — the vector is
    /// 2^n × 16 bytes and must be bounded up front, not discovered via
    /// an out-of-memory fault.
    pub fn new(num_qubits: u32, max_qubits: u32) -> SimResult<Self> {
        if num_qubits > max_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: max_qubits,
            });
        }
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits: num_qubits as usize,
        })
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Borrow the amplitude vector.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Sum of squared magnitudes. 1.0 (within floating error) for any
    /// state reached through unitary evolution.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Full probability distribution over basis outcomes.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Apply a 2×2 operator to `qubit`.
    ///
    /// Walks every basis-index pair differing only in `qubit`'s bit and
    /// replaces the pair with `m · pair`. O(2^n), in place.
    pub fn apply_one(&mut self, m: &[[Complex64; 2]; 2], qubit: usize) {
        let mask = 1usize << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    /// Apply a 4×4 operator to the qubit pair (`q_hi`, `q_lo`).
    ///
    /// `q_hi` is the high local bit: the operator's basis order is
    /// |q_hi q_lo⟩ ∈ {00, 01, 10, 11}. For controlled gates the control
    /// is passed as `q_hi`.
    pub fn apply_two(&mut self, m: &[[Complex64; 4]; 4], q_hi: usize, q_lo: usize) {
        let hi = 1usize << q_hi;
        let lo = 1usize << q_lo;
        for i in 0..self.amplitudes.len() {
            if i & hi == 0 && i & lo == 0 {
                let idx = [i, i | lo, i | hi, i | hi | lo];
                let block = [
                    self.amplitudes[idx[0]],
                    self.amplitudes[idx[1]],
                    self.amplitudes[idx[2]],
                    self.amplitudes[idx[3]],
                ];
                for (row, &target) in idx.iter().enumerate() {
                    self.amplitudes[target] = m[row][0] * block[0]
                        + m[row][1] * block[1]
                        + m[row][2] * block[2]
                        + m[row][3] * block[3];
                }
            }
        }
    }

    /// Marginal probabilities over `qubits`.
    ///
    /// Returns 2^k entries; outcome bit `j` carries the value of
    /// `qubits[j]`.
    pub fn marginal_probs(&self, qubits: &[usize]) -> Vec<f64> {
        let mut probs = vec![0.0; 1 << qubits.len()];
        for (i, amp) in self.amplitudes.iter().enumerate() {
            probs[Self::extract_outcome(i, qubits) as usize] += amp.norm_sqr();
        }
        probs
    }

    /// Project onto `outcome` over `qubits` and renormalize the
    /// surviving amplitudes by 1/√prob.
    pub fn collapse(&mut self, qubits: &[usize], outcome: u64, prob: f64) -> SimResult<()> {
        if prob < PROB_FLOOR {
            return Err(SimError::ZeroProbabilityCollapse { outcome, prob });
        }
        let scale = 1.0 / prob.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if Self::extract_outcome(i, qubits) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        Ok(())
    }

    /// Rescale to unit norm after a non-unitary (Kraus) application.
    /// Returns the squared norm that was divided out.
    pub fn renormalize(&mut self) -> SimResult<f64> {
        let norm_sqr = self.norm_sqr();
        if norm_sqr < PROB_FLOOR {
            return Err(SimError::ZeroProbabilityCollapse {
                outcome: 0,
                prob: norm_sqr,
            });
        }
        let scale = 1.0 / norm_sqr.sqrt();
        for amp in &mut self.amplitudes {
            *amp *= scale;
        }
        Ok(norm_sqr)
    }

    #[inline]
    fn extract_outcome(index: usize, qubits: &[usize]) -> u64 {
        let mut outcome = 0u64;
        for (j, &q) in qubits.iter().enumerate() {
            outcome |= (((index >> q) & 1) as u64) << j;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn hadamard() -> [[Complex64; 2]; 2] {
        let s = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
        [[s, s], [s, -s]]
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2, 24).unwrap();
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(1.0, 0.0)));
        for &amp in &sv.amplitudes()[1..] {
            assert!(approx_eq(amp, Complex64::new(0.0, 0.0)));
        }
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_many_qubits_rejected_before_allocation() {
        assert!(matches!(
            Statevector::new(30, 24),
            Err(SimError::TooManyQubits {
                requested: 30,
                max: 24
            })
        ));
    }

    #[test]
    fn test_apply_one_hadamard() {
        let mut sv = Statevector::new(1, 24).unwrap();
        sv.apply_one(&hadamard(), 0);
        let s = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(s, 0.0)));
        assert!(approx_eq(sv.amplitudes()[1], Complex64::new(s, 0.0)));
    }

    #[test]
    fn test_apply_two_cnot_block_order() {
        // |10⟩ (control q1 set) — CX with control as high bit flips q0.
        let mut sv = Statevector::new(2, 24).unwrap();
        let x = [
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        ];
        sv.apply_one(&x, 1);

        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let cx = [
            [one, zero, zero, zero],
            [zero, one, zero, zero],
            [zero, zero, zero, one],
            [zero, zero, one, zero],
        ];
        sv.apply_two(&cx, 1, 0);
        // Now |11⟩ = index 3.
        assert!(approx_eq(sv.amplitudes()[3], one));
    }

    #[test]
    fn test_marginal_probs_plus_state() {
        let mut sv = Statevector::new(2, 24).unwrap();
        sv.apply_one(&hadamard(), 0);
        let probs = sv.marginal_probs(&[0]);
        assert!((probs[0] - 0.5).abs() < 1e-10);
        assert!((probs[1] - 0.5).abs() < 1e-10);
        // Qubit 1 untouched.
        let probs = sv.marginal_probs(&[1]);
        assert!((probs[0] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_collapse_renormalizes() {
        let mut sv = Statevector::new(1, 24).unwrap();
        sv.apply_one(&hadamard(), 0);
        sv.collapse(&[0], 1, 0.5).unwrap();
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(0.0, 0.0)));
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_collapse_zero_probability_branch() {
        let mut sv = Statevector::new(1, 24).unwrap();
        let err = sv.collapse(&[0], 1, 1e-30).unwrap_err();
        assert!(matches!(err, SimError::ZeroProbabilityCollapse { .. }));
    }
}
