//! The simulator's basis-gate vocabulary.
//!
//! A compiled circuit arrives with all parameters bound, so gates carry
//! plain `f64` angles rather than symbolic parameter expressions.

use serde::{Deserialize, Serialize};

use crate::error::{QobjError, QobjResult};

/// Basis gates with known matrix semantics.
///
/// This is the gate set the simulator executes natively:
/// `u1,u2,u3,cx,cz,id,x,y,z,h,s,sdg,t,tdg,rzz`. Anything else must be
/// decomposed upstream — gate synthesis is not this crate's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// Identity gate.
    Id,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Phase rotation U1(λ) = diag(1, e^{iλ}).
    U1(f64),
    /// U2(φ, λ): single-qubit gate built from one X90 pulse.
    U2(f64, f64),
    /// Generic single-qubit unitary U3(θ, φ, λ).
    U3(f64, f64, f64),
    /// Controlled-X (CNOT) gate.
    Cx,
    /// Controlled-Z gate.
    Cz,
    /// ZZ rotation gate: exp(-iθ/2 · Z⊗Z).
    Rzz(f64),
}

impl GateKind {
    /// Resolve a gate from its qobj name and parameter list.
    ///
    /// Parameter-count mismatches are rejected here, before any state
    /// mutation can happen — gate application is not transactional, so
    /// validation has to be up front.
    pub fn resolve(name: &str, params: &[f64], circuit: &str) -> QobjResult<Self> {
        let expect = |n: usize| -> QobjResult<()> {
            if params.len() == n {
                Ok(())
            } else {
                Err(QobjError::ParameterCount {
                    gate: name.to_string(),
                    expected: n,
                    got: params.len(),
                })
            }
        };

        let gate = match name {
            "id" => {
                expect(0)?;
                GateKind::Id
            }
            "x" => {
                expect(0)?;
                GateKind::X
            }
            "y" => {
                expect(0)?;
                GateKind::Y
            }
            "z" => {
                expect(0)?;
                GateKind::Z
            }
            "h" => {
                expect(0)?;
                GateKind::H
            }
            "s" => {
                expect(0)?;
                GateKind::S
            }
            "sdg" => {
                expect(0)?;
                GateKind::Sdg
            }
            "t" => {
                expect(0)?;
                GateKind::T
            }
            "tdg" => {
                expect(0)?;
                GateKind::Tdg
            }
            "u1" => {
                expect(1)?;
                GateKind::U1(params[0])
            }
            "u2" => {
                expect(2)?;
                GateKind::U2(params[0], params[1])
            }
            "u3" => {
                expect(3)?;
                GateKind::U3(params[0], params[1], params[2])
            }
            "cx" => {
                expect(0)?;
                GateKind::Cx
            }
            "cz" => {
                expect(0)?;
                GateKind::Cz
            }
            "rzz" => {
                expect(1)?;
                GateKind::Rzz(params[0])
            }
            _ => {
                return Err(QobjError::UnknownGate {
                    gate: name.to_string(),
                    circuit: circuit.to_string(),
                });
            }
        };
        Ok(gate)
    }

    /// Get the qobj name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Id => "id",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::H => "h",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::U1(_) => "u1",
            GateKind::U2(_, _) => "u2",
            GateKind::U3(_, _, _) => "u3",
            GateKind::Cx => "cx",
            GateKind::Cz => "cz",
            GateKind::Rzz(_) => "rzz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::Cx | GateKind::Cz | GateKind::Rzz(_) => 2,
            _ => 1,
        }
    }

    /// Get the inverse of this gate.
    pub fn inverse(&self) -> GateKind {
        match self {
            GateKind::S => GateKind::Sdg,
            GateKind::Sdg => GateKind::S,
            GateKind::T => GateKind::Tdg,
            GateKind::Tdg => GateKind::T,
            GateKind::U1(l) => GateKind::U1(-l),
            // U2(φ, λ)⁻¹ = U2(-λ - π, -φ + π)
            GateKind::U2(p, l) => {
                GateKind::U2(-l - std::f64::consts::PI, -p + std::f64::consts::PI)
            }
            GateKind::U3(t, p, l) => GateKind::U3(-t, -l, -p),
            GateKind::Rzz(t) => GateKind::Rzz(-t),
            // Self-inverse gates.
            other => other.clone(),
        }
    }
}

/// A gate bound to its qubit operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The gate kind, parameters included.
    pub kind: GateKind,
    /// Target qubit indices, in operand order (control first for cx/cz).
    pub qubits: Vec<u32>,
}

impl Gate {
    /// Create a gate, checking the operand count against the gate arity.
    pub fn new(kind: GateKind, qubits: Vec<u32>) -> QobjResult<Self> {
        if qubits.len() != kind.num_qubits() {
            return Err(QobjError::QubitCount {
                gate: kind.name().to_string(),
                expected: kind.num_qubits(),
                got: qubits.len(),
            });
        }
        Ok(Self { kind, qubits })
    }
}
