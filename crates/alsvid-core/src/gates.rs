//! The gate engine: resolves basis gates to unitary matrices and applies
//! them through the amplitude store.

use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_4, PI};

use alsvid_qobj::{Gate, GateKind};

use crate::error::{SimError, SimResult};
use crate::state::Statevector;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Pauli-X matrix, shared with reset and the noise model.
pub(crate) fn pauli_x() -> [[Complex64; 2]; 2] {
    [[ZERO, ONE], [ONE, ZERO]]
}

/// Pauli-Y matrix.
pub(crate) fn pauli_y() -> [[Complex64; 2]; 2] {
    [[ZERO, -I], [I, ZERO]]
}

/// Pauli-Z matrix.
pub(crate) fn pauli_z() -> [[Complex64; 2]; 2] {
    [[ONE, ZERO], [ZERO, -ONE]]
}

/// Resolve a single-qubit basis gate to its 2×2 unitary.
///
/// Returns `None` for two-qubit gates.
pub fn single_qubit_matrix(kind: &GateKind) -> Option<[[Complex64; 2]; 2]> {
    let m = match kind {
        GateKind::Id => [[ONE, ZERO], [ZERO, ONE]],
        GateKind::X => pauli_x(),
        GateKind::Y => pauli_y(),
        GateKind::Z => pauli_z(),
        GateKind::H => {
            let s = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
            [[s, s], [s, -s]]
        }
        GateKind::S => [[ONE, ZERO], [ZERO, I]],
        GateKind::Sdg => [[ONE, ZERO], [ZERO, -I]],
        GateKind::T => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, FRAC_PI_4)]],
        GateKind::Tdg => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, -FRAC_PI_4)]],
        GateKind::U1(lambda) => u3_matrix(0.0, 0.0, *lambda),
        GateKind::U2(phi, lambda) => u3_matrix(PI / 2.0, *phi, *lambda),
        GateKind::U3(theta, phi, lambda) => u3_matrix(*theta, *phi, *lambda),
        GateKind::Cx | GateKind::Cz | GateKind::Rzz(_) => return None,
    };
    Some(m)
}

/// Resolve a two-qubit basis gate to its 4×4 unitary.
///
/// Basis order is |hi lo⟩ with the first operand (the control for cx/cz)
/// as the high bit. Returns `None` for single-qubit gates.
pub fn two_qubit_matrix(kind: &GateKind) -> Option<[[Complex64; 4]; 4]> {
    let m = match kind {
        GateKind::Cx => [
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ZERO, ONE],
            [ZERO, ZERO, ONE, ZERO],
        ],
        GateKind::Cz => [
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ONE, ZERO],
            [ZERO, ZERO, ZERO, -ONE],
        ],
        GateKind::Rzz(theta) => {
            // exp(-iθ/2 · Z⊗Z): ±1 eigenvalues pick the phase sign.
            let even = Complex64::from_polar(1.0, -theta / 2.0);
            let odd = Complex64::from_polar(1.0, theta / 2.0);
            [
                [even, ZERO, ZERO, ZERO],
                [ZERO, odd, ZERO, ZERO],
                [ZERO, ZERO, odd, ZERO],
                [ZERO, ZERO, ZERO, even],
            ]
        }
        _ => return None,
    };
    Some(m)
}

fn u3_matrix(theta: f64, phi: f64, lambda: f64) -> [[Complex64; 2]; 2] {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    [
        [c, -Complex64::from_polar(1.0, lambda) * s],
        [
            Complex64::from_polar(1.0, phi) * s,
            Complex64::from_polar(1.0, phi + lambda) * c,
        ],
    ]
}

/// Apply one gate to the statevector.
///
/// Operand counts were validated at the qobj boundary; a mismatch here
/// means the invariant broke somewhere, so it is reported as an internal
/// error rather than a panic.
pub fn apply_gate(state: &mut Statevector, gate: &Gate) -> SimResult<()> {
    match gate.kind.num_qubits() {
        1 => {
            let m = single_qubit_matrix(&gate.kind)
                .ok_or_else(|| SimError::Internal(format!("no 2x2 matrix for {:?}", gate.kind)))?;
            let &[q] = gate.qubits.as_slice() else {
                return Err(SimError::Internal(format!(
                    "gate '{}' with {} operand(s)",
                    gate.kind.name(),
                    gate.qubits.len()
                )));
            };
            state.apply_one(&m, q as usize);
        }
        _ => {
            let m = two_qubit_matrix(&gate.kind)
                .ok_or_else(|| SimError::Internal(format!("no 4x4 matrix for {:?}", gate.kind)))?;
            let &[hi, lo] = gate.qubits.as_slice() else {
                return Err(SimError::Internal(format!(
                    "gate '{}' with {} operand(s)",
                    gate.kind.name(),
                    gate.qubits.len()
                )));
            };
            state.apply_two(&m, hi as usize, lo as usize);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn apply(sv: &mut Statevector, kind: GateKind, qubits: &[u32]) {
        let gate = Gate::new(kind, qubits.to_vec()).unwrap();
        apply_gate(sv, &gate).unwrap();
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2, 24).unwrap();
        apply(&mut sv, GateKind::H, &[0]);
        apply(&mut sv, GateKind::Cx, &[0, 1]);

        let s = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(s, 0.0)));
        assert!(approx_eq(sv.amplitudes()[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes()[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes()[3], Complex64::new(s, 0.0)));
    }

    #[test]
    fn test_u3_reproduces_x_up_to_phase() {
        // U3(π, 0, π) = X exactly in this parametrization.
        let mut sv = Statevector::new(1, 24).unwrap();
        apply(&mut sv, GateKind::U3(PI, 0.0, PI), &[0]);
        assert!(approx_eq(sv.amplitudes()[1], ONE));
    }

    #[test]
    fn test_u1_phases_only_the_one_branch() {
        let mut sv = Statevector::new(1, 24).unwrap();
        apply(&mut sv, GateKind::H, &[0]);
        apply(&mut sv, GateKind::U1(PI / 2.0), &[0]);
        let s = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes()[0], Complex64::new(s, 0.0)));
        assert!(approx_eq(sv.amplitudes()[1], Complex64::new(0.0, s)));
    }

    #[test]
    fn test_s_equals_u1_half_pi() {
        let mut a = Statevector::new(1, 24).unwrap();
        apply(&mut a, GateKind::H, &[0]);
        apply(&mut a, GateKind::S, &[0]);

        let mut b = Statevector::new(1, 24).unwrap();
        apply(&mut b, GateKind::H, &[0]);
        apply(&mut b, GateKind::U1(PI / 2.0), &[0]);

        for (&x, &y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert!(approx_eq(x, y));
        }
    }

    #[test]
    fn test_cz_is_symmetric() {
        let mut a = Statevector::new(2, 24).unwrap();
        apply(&mut a, GateKind::H, &[0]);
        apply(&mut a, GateKind::H, &[1]);
        apply(&mut a, GateKind::Cz, &[0, 1]);

        let mut b = Statevector::new(2, 24).unwrap();
        apply(&mut b, GateKind::H, &[0]);
        apply(&mut b, GateKind::H, &[1]);
        apply(&mut b, GateKind::Cz, &[1, 0]);

        for (&x, &y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert!(approx_eq(x, y));
        }
    }

    #[test]
    fn test_rzz_diagonal_phases() {
        let theta = 0.7;
        let mut sv = Statevector::new(2, 24).unwrap();
        apply(&mut sv, GateKind::X, &[0]);
        // |01⟩: odd parity → phase e^{+iθ/2}.
        apply(&mut sv, GateKind::Rzz(theta), &[1, 0]);
        assert!(approx_eq(
            sv.amplitudes()[1],
            Complex64::from_polar(1.0, theta / 2.0)
        ));
    }

    #[test]
    fn test_gate_inverse_round_trip() {
        // Each gate followed by its inverse restores |ψ⟩ = H|0⟩ exactly
        // (within floating tolerance).
        let cases = [
            GateKind::X,
            GateKind::Y,
            GateKind::Z,
            GateKind::H,
            GateKind::S,
            GateKind::T,
            GateKind::U1(0.3),
            GateKind::U2(0.4, 1.1),
            GateKind::U3(0.5, 1.2, 2.1),
        ];
        for kind in cases {
            let mut sv = Statevector::new(1, 24).unwrap();
            apply(&mut sv, GateKind::H, &[0]);
            let before: Vec<_> = sv.amplitudes().to_vec();

            apply(&mut sv, kind.clone(), &[0]);
            apply(&mut sv, kind.inverse(), &[0]);

            for (&x, &y) in sv.amplitudes().iter().zip(&before) {
                assert!(approx_eq(x, y), "round trip failed for {kind:?}");
            }
        }
    }
}
