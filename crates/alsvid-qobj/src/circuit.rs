//! The strict compiled-circuit type and its boundary validation.

use serde::{Deserialize, Serialize};

use crate::document::{QobjCircuit, QobjInstruction, RunConfig};
use crate::error::{QobjError, QobjResult};
use crate::gate::{Gate, GateKind};
use crate::operation::{Operation, SnapshotKind};

/// Default shot count when neither batch nor circuit config sets one.
pub const DEFAULT_SHOTS: u32 = 1024;

/// A validated, immutable circuit ready for execution.
///
/// Invariant: every qubit and clbit index in `ops` is within the declared
/// register bounds, every gate is a known basis gate with the right
/// parameter count. Compilation enforces this once, at the boundary;
/// the executor never re-checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Circuit name, used in error messages and the result slot.
    pub name: String,
    /// Quantum register width.
    pub num_qubits: u32,
    /// Classical register width.
    pub num_clbits: u32,
    /// Shots to run this circuit for.
    pub shots: u32,
    /// Seed override for this circuit, if any.
    pub seed: Option<u64>,
    /// The validated operation stream.
    pub ops: Vec<Operation>,
}

impl Circuit {
    /// Create an empty circuit for programmatic construction.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            shots: DEFAULT_SHOTS,
            seed: None,
            ops: Vec::new(),
        }
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Append a gate, validating arity and qubit bounds.
    pub fn gate(&mut self, kind: GateKind, qubits: &[u32]) -> QobjResult<&mut Self> {
        for &q in qubits {
            self.check_qubit(q)?;
        }
        self.ops
            .push(Operation::Gate(Gate::new(kind, qubits.to_vec())?));
        Ok(self)
    }

    /// Append a measurement of one qubit into one clbit.
    pub fn measure(&mut self, qubit: u32, clbit: u32) -> QobjResult<&mut Self> {
        self.check_qubit(qubit)?;
        self.check_clbit(clbit)?;
        self.ops.push(Operation::Measure {
            qubits: vec![qubit],
            clbits: vec![clbit],
        });
        Ok(self)
    }

    /// Append a measurement of every qubit into the matching clbit.
    pub fn measure_all(&mut self) -> QobjResult<&mut Self> {
        let qubits: Vec<u32> = (0..self.num_qubits).collect();
        for &q in &qubits {
            self.check_clbit(q)?;
        }
        self.ops.push(Operation::Measure {
            clbits: qubits.clone(),
            qubits,
        });
        Ok(self)
    }

    /// Append a reset.
    pub fn reset(&mut self, qubit: u32) -> QobjResult<&mut Self> {
        self.check_qubit(qubit)?;
        self.ops.push(Operation::Reset {
            qubits: vec![qubit],
        });
        Ok(self)
    }

    /// Append a snapshot request.
    pub fn snapshot(&mut self, key: impl Into<String>, kind: SnapshotKind) -> &mut Self {
        self.ops.push(Operation::Snapshot {
            key: key.into(),
            kind,
        });
        self
    }

    /// Append a barrier.
    pub fn barrier(&mut self) -> &mut Self {
        self.ops.push(Operation::Barrier);
        self
    }

    /// Whether any operation collapses the state stochastically.
    pub fn has_stochastic_ops(&self) -> bool {
        self.ops.iter().any(Operation::is_stochastic)
    }

    /// A two-qubit Bell-state circuit with full measurement.
    pub fn bell() -> Self {
        let mut c = Circuit::new("bell", 2, 2);
        c.gate(GateKind::H, &[0]).unwrap();
        c.gate(GateKind::Cx, &[0, 1]).unwrap();
        c.measure_all().unwrap();
        c
    }

    /// An n-qubit GHZ-state circuit with full measurement.
    pub fn ghz(n: u32) -> Self {
        let mut c = Circuit::new("ghz", n, n);
        c.gate(GateKind::H, &[0]).unwrap();
        for q in 1..n {
            c.gate(GateKind::Cx, &[q - 1, q]).unwrap();
        }
        c.measure_all().unwrap();
        c
    }

    fn check_qubit(&self, qubit: u32) -> QobjResult<()> {
        if qubit < self.num_qubits {
            Ok(())
        } else {
            Err(QobjError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
                circuit: self.name.clone(),
            })
        }
    }

    fn check_clbit(&self, clbit: u32) -> QobjResult<()> {
        if clbit < self.num_clbits {
            Ok(())
        } else {
            Err(QobjError::ClbitOutOfRange {
                clbit,
                num_clbits: self.num_clbits,
                circuit: self.name.clone(),
            })
        }
    }

    /// Compile one raw qobj circuit entry into a validated [`Circuit`].
    ///
    /// `batch_config` is the batch-level [`RunConfig`]; the circuit's own
    /// config overrides it field by field. `index` names anonymous
    /// circuits.
    pub fn compile(raw: &QobjCircuit, batch_config: &RunConfig, index: usize) -> QobjResult<Self> {
        let name = raw
            .name
            .clone()
            .unwrap_or_else(|| format!("circuit{index}"));
        let config = batch_config.merged_with(&raw.config);

        let mut circuit = Circuit {
            name,
            num_qubits: raw.compiled_circuit.header.number_of_qubits,
            num_clbits: raw.compiled_circuit.header.number_of_clbits,
            shots: config.shots.unwrap_or(DEFAULT_SHOTS),
            seed: config.seed,
            ops: Vec::with_capacity(raw.compiled_circuit.operations.len()),
        };

        for inst in &raw.compiled_circuit.operations {
            let op = circuit.compile_instruction(inst)?;
            circuit.ops.push(op);
        }
        Ok(circuit)
    }

    fn compile_instruction(&self, inst: &QobjInstruction) -> QobjResult<Operation> {
        match inst.name.as_str() {
            "measure" => {
                if inst.qubits.len() != inst.clbits.len() {
                    return Err(QobjError::MeasureWidthMismatch {
                        qubits: inst.qubits.len(),
                        clbits: inst.clbits.len(),
                        circuit: self.name.clone(),
                    });
                }
                for &q in &inst.qubits {
                    self.check_qubit(q)?;
                }
                for &c in &inst.clbits {
                    self.check_clbit(c)?;
                }
                Ok(Operation::Measure {
                    qubits: inst.qubits.clone(),
                    clbits: inst.clbits.clone(),
                })
            }
            "reset" => {
                for &q in &inst.qubits {
                    self.check_qubit(q)?;
                }
                Ok(Operation::Reset {
                    qubits: inst.qubits.clone(),
                })
            }
            "snapshot" => {
                // The key comes from `label`, or from a numeric first
                // param (the convention the C-era frontends used).
                let key = match (&inst.label, inst.params.first()) {
                    (Some(label), _) => label.clone(),
                    (None, Some(p)) => format!("{}", *p as i64),
                    (None, None) => {
                        return Err(QobjError::BadSnapshot {
                            reason: "missing label".into(),
                            circuit: self.name.clone(),
                        });
                    }
                };
                let kind = match &inst.snapshot_type {
                    Some(name) => {
                        SnapshotKind::from_name(name).ok_or_else(|| QobjError::BadSnapshot {
                            reason: format!("unknown snapshot type '{name}'"),
                            circuit: self.name.clone(),
                        })?
                    }
                    None => SnapshotKind::Statevector,
                };
                Ok(Operation::Snapshot { key, kind })
            }
            "barrier" => Ok(Operation::Barrier),
            gate_name => {
                let kind = GateKind::resolve(gate_name, &inst.params, &self.name)?;
                for &q in &inst.qubits {
                    self.check_qubit(q)?;
                }
                Ok(Operation::Gate(Gate::new(kind, inst.qubits.clone())?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Qobj;

    fn compile_first(json: &str) -> QobjResult<Circuit> {
        let qobj = Qobj::from_json(json).unwrap();
        Circuit::compile(&qobj.circuits[0], &qobj.config, 0)
    }

    #[test]
    fn test_compile_bell() {
        let circuit = compile_first(
            r#"{
                "config": {"shots": 512},
                "circuits": [{
                    "name": "bell",
                    "compiled_circuit": {
                        "header": {"number_of_qubits": 2, "number_of_clbits": 2},
                        "operations": [
                            {"name": "h", "qubits": [0]},
                            {"name": "cx", "qubits": [0, 1]},
                            {"name": "measure", "qubits": [0, 1], "clbits": [0, 1]}
                        ]
                    }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(circuit.name, "bell");
        assert_eq!(circuit.shots, 512);
        assert_eq!(circuit.ops.len(), 3);
        assert!(circuit.has_stochastic_ops());
    }

    #[test]
    fn test_out_of_range_qubit_rejected() {
        let err = compile_first(
            r#"{
                "circuits": [{
                    "compiled_circuit": {
                        "header": {"number_of_qubits": 1},
                        "operations": [{"name": "x", "qubits": [3]}]
                    }
                }]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QobjError::QubitOutOfRange {
                qubit: 3,
                num_qubits: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_gate_rejected_before_simulation() {
        let err = compile_first(
            r#"{
                "circuits": [{
                    "name": "bad",
                    "compiled_circuit": {
                        "header": {"number_of_qubits": 1},
                        "operations": [{"name": "frobnicate", "qubits": [0]}]
                    }
                }]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, QobjError::UnknownGate { gate, .. } if gate == "frobnicate"));
    }

    #[test]
    fn test_measure_width_mismatch() {
        let err = compile_first(
            r#"{
                "circuits": [{
                    "compiled_circuit": {
                        "header": {"number_of_qubits": 2, "number_of_clbits": 2},
                        "operations": [
                            {"name": "measure", "qubits": [0, 1], "clbits": [0]}
                        ]
                    }
                }]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, QobjError::MeasureWidthMismatch { .. }));
    }

    #[test]
    fn test_snapshot_numeric_param_key() {
        let circuit = compile_first(
            r#"{
                "circuits": [{
                    "compiled_circuit": {
                        "header": {"number_of_qubits": 1},
                        "operations": [{"name": "snapshot", "params": [32767]}]
                    }
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(
            circuit.ops[0],
            Operation::Snapshot {
                key: "32767".into(),
                kind: SnapshotKind::Statevector
            }
        );
    }

    #[test]
    fn test_per_circuit_shots_override() {
        let qobj = Qobj::from_json(
            r#"{
                "config": {"shots": 1000},
                "circuits": [{
                    "config": {"shots": 1},
                    "compiled_circuit": {
                        "header": {"number_of_qubits": 1},
                        "operations": []
                    }
                }]
            }"#,
        )
        .unwrap();
        let circuit = Circuit::compile(&qobj.circuits[0], &qobj.config, 0).unwrap();
        assert_eq!(circuit.shots, 1);
    }

    #[test]
    fn test_ghz_builder() {
        let c = Circuit::ghz(3);
        assert_eq!(c.num_qubits, 3);
        // h + 2 cx + measure
        assert_eq!(c.ops.len(), 4);
    }
}
