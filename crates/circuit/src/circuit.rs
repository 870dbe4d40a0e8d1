//! Sparse circuit representation, construction and evaluation

use crate::{
    linear_combination::DisplayScalar, CircuitAssignment, CircuitError, CircuitResult,
    Constraint, LinearCombination, Wire, WireRole,
};
use bulletproofs_core::params::MAX_CIRCUIT_SIZE;
use curve25519_dalek::scalar::Scalar;
use sha2::{Digest, Sha256};
use std::{fmt, mem::size_of};
use tracing::debug;

/// Weight of one wire in one constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEntry {
    /// Index of the constraint the wire is added to
    pub constraint: usize,
    /// Factor the wire value is multiplied with
    pub weight: Scalar,
}

/// An arithmetic circuit
///
/// For every wire role and gate, the circuit keeps the list of constraints
/// the wire appears in. Gates `0..n_bits` are bit gates and gates
/// `0..n_commits` have their left wire committed to; both sets of rows are
/// implicit and not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    n_commits: usize,
    n_gates: usize,
    n_bits: usize,
    n_constraints: usize,
    /// `rows[role][gate]`
    rows: [Vec<Vec<WireEntry>>; 3],
    constants: Vec<Scalar>,
}

/// Bytes a circuit with these dimensions occupies in memory
pub(crate) fn memory_footprint(n_gates: usize, n_constraints: usize, n_entries: usize) -> Option<usize> {
    let rows = n_gates.checked_mul(3 * size_of::<Vec<WireEntry>>())?;
    let entries = n_entries.checked_mul(size_of::<WireEntry>())?;
    let constants = n_constraints.checked_mul(size_of::<Scalar>())?;
    size_of::<Circuit>()
        .checked_add(rows)?
        .checked_add(entries)?
        .checked_add(constants)
}

/// Fail with `TooLarge` if the footprint exceeds [`MAX_CIRCUIT_SIZE`]
pub(crate) fn check_footprint(n_gates: usize, n_constraints: usize, n_entries: usize) -> CircuitResult<()> {
    match memory_footprint(n_gates, n_constraints, n_entries) {
        Some(needed) if needed <= MAX_CIRCUIT_SIZE => Ok(()),
        needed => Err(CircuitError::TooLarge {
            needed: needed.unwrap_or(usize::MAX),
            limit: MAX_CIRCUIT_SIZE,
        }),
    }
}

impl Circuit {
    /// Assemble a circuit from its sparse rows, checking every invariant
    pub(crate) fn from_parts(
        n_commits: usize,
        n_bits: usize,
        n_constraints: usize,
        rows: [Vec<Vec<WireEntry>>; 3],
        constants: Vec<Scalar>,
    ) -> CircuitResult<Self> {
        let n_gates = rows[0].len();
        if rows.iter().any(|role_rows| role_rows.len() != n_gates) {
            return Err(CircuitError::InvalidParameters(
                "every wire role needs one row per gate".to_string(),
            ));
        }
        if constants.len() != n_constraints {
            return Err(CircuitError::InvalidParameters(format!(
                "{} constants for {} constraints",
                constants.len(),
                n_constraints
            )));
        }
        if n_bits > n_gates {
            return Err(CircuitError::InvalidParameters(format!(
                "{} bit gates but only {} gates",
                n_bits, n_gates
            )));
        }
        if n_commits > n_gates {
            return Err(CircuitError::InvalidParameters(format!(
                "{} commitments but only {} gates",
                n_commits, n_gates
            )));
        }
        for entry in rows.iter().flatten().flatten() {
            if entry.constraint >= n_constraints {
                return Err(CircuitError::IndexOutOfRange {
                    index: entry.constraint,
                    bound: n_constraints,
                });
            }
        }

        Ok(Self {
            n_commits,
            n_gates,
            n_bits,
            n_constraints,
            rows,
            constants,
        })
    }

    /// Number of committed values
    pub fn n_commits(&self) -> usize {
        self.n_commits
    }

    /// Number of multiplication gates
    pub fn n_gates(&self) -> usize {
        self.n_gates
    }

    /// Number of leading gates constrained to carry a bit
    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    /// Number of explicit linear constraints
    pub fn n_constraints(&self) -> usize {
        self.n_constraints
    }

    /// Explicit constraints plus the implicit bit and commitment rows
    pub fn total_rows(&self) -> usize {
        self.n_constraints + 2 * self.n_bits + self.n_commits
    }

    /// Constraints the wires of `role` appear in, one list per gate
    pub fn rows(&self, role: WireRole) -> &[Vec<WireEntry>] {
        &self.rows[role as usize]
    }

    /// Right-hand side of every explicit constraint
    pub fn constants(&self) -> &[Scalar] {
        &self.constants
    }

    /// Total number of stored wire entries
    pub fn num_entries(&self) -> usize {
        self.rows.iter().flatten().map(Vec::len).sum()
    }

    /// Reassemble the explicit constraints from the sparse rows
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut lhs = vec![LinearCombination::new(); self.n_constraints];
        for role in WireRole::ALL {
            for (gate, row) in self.rows(role).iter().enumerate() {
                for entry in row {
                    lhs[entry.constraint].add_term(entry.weight, Wire::new(role, gate));
                }
            }
        }
        lhs.into_iter()
            .zip(&self.constants)
            .map(|(lhs, constant)| Constraint::new(lhs, *constant))
            .collect()
    }

    /// SHA-256 of the canonical binary encoding
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.encode()).into()
    }

    /// Check that `assignment` satisfies every gate and constraint.
    ///
    /// An assignment may stop short of the padded gate count; the missing
    /// gates carry zero on every wire.
    pub fn evaluate(&self, assignment: &CircuitAssignment) -> CircuitResult<()> {
        if assignment.n_gates() > self.n_gates {
            return Err(CircuitError::InvalidParameters(format!(
                "assignment has {} gates, circuit has {}",
                assignment.n_gates(),
                self.n_gates
            )));
        }

        let wire = |role, gate| assignment.value(Wire::new(role, gate)).copied().unwrap_or(Scalar::ZERO);
        for i in 0..self.n_gates {
            let (l, r, o) = (wire(WireRole::Left, i), wire(WireRole::Right, i), wire(WireRole::Output, i));
            if l * r != o {
                return Err(CircuitError::GateViolated(i));
            }
            if i < self.n_bits && (r != l - Scalar::ONE || o != Scalar::ZERO) {
                return Err(CircuitError::GateViolated(i));
            }
        }

        for (q, constraint) in self.constraints().iter().enumerate() {
            if constraint.lhs.evaluate(assignment) != constraint.constant {
                debug!(constraint = q, "assignment violates constraint");
                return Err(CircuitError::ConstraintViolated(q));
            }
        }
        Ok(())
    }

    /// Collapse every row, implicit ones included, with weights `z^{q+1}`.
    ///
    /// `zp` receives the powers of `z` and must have [`Circuit::total_rows`]
    /// entries, `w` receives `w_L | w_R | w_O` and must have `3 * n_gates`,
    /// `w_v` must have `n_commits`. Returns the compressed constant `w_c`.
    pub(crate) fn compress_weights(
        &self,
        z: &Scalar,
        zp: &mut [Scalar],
        w: &mut [Scalar],
        w_v: &mut [Scalar],
    ) -> Scalar {
        debug_assert_eq!(zp.len(), self.total_rows());
        debug_assert_eq!(w.len(), 3 * self.n_gates);
        debug_assert_eq!(w_v.len(), self.n_commits);

        let mut power = *z;
        for p in zp.iter_mut() {
            *p = power;
            power *= z;
        }
        w.fill(Scalar::ZERO);

        let (w_l, rest) = w.split_at_mut(self.n_gates);
        let (w_r, w_o) = rest.split_at_mut(self.n_gates);
        for (role_rows, out) in self.rows.iter().zip([&mut *w_l, &mut *w_r, &mut *w_o]) {
            for (row, acc) in role_rows.iter().zip(out.iter_mut()) {
                for entry in row {
                    *acc += entry.weight * zp[entry.constraint];
                }
            }
        }

        let nc = self.n_constraints;
        let mut w_c: Scalar = zp[..nc]
            .iter()
            .zip(&self.constants)
            .map(|(p, c)| p * c)
            .sum();

        // r_i - l_i = -1 and o_i = 0 for every bit gate
        for i in 0..self.n_bits {
            let p = zp[nc + 2 * i];
            w_r[i] += p;
            w_l[i] -= p;
            w_c -= p;
            w_o[i] += zp[nc + 2 * i + 1];
        }

        // l_j - v_j = 0 for every committed value
        let base = nc + 2 * self.n_bits;
        for (j, w_vj) in w_v.iter_mut().enumerate() {
            w_l[j] += zp[base + j];
            *w_vj = zp[base + j];
        }

        w_c
    }
}

impl fmt::Display for Circuit {
    /// The text form accepted by [`Circuit::parse`] when every weight is a small integer
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{};",
            self.n_gates, self.n_commits, self.n_bits, self.n_constraints
        )?;
        for constraint in self.constraints() {
            if constraint.lhs.is_empty() {
                write!(f, " 0*L0 = {};", DisplayScalar(&constraint.constant))?;
            } else {
                write!(f, " {};", constraint)?;
            }
        }
        Ok(())
    }
}

/// Incremental construction of a [`Circuit`]
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    n_gates: usize,
    n_commits: usize,
    n_bits: usize,
    constraints: Vec<Constraint>,
}

impl CircuitBuilder {
    /// Start a circuit with `n_gates` gates, padded to a power of two on build
    pub fn new(n_gates: usize, n_commits: usize, n_bits: usize) -> CircuitResult<Self> {
        if n_bits > n_gates || n_commits > n_gates {
            return Err(CircuitError::InvalidParameters(format!(
                "{} gates cannot hold {} bits and {} commitments",
                n_gates, n_bits, n_commits
            )));
        }
        check_footprint(n_gates, 0, 0)?;
        Ok(Self {
            n_gates,
            n_commits,
            n_bits,
            constraints: Vec::new(),
        })
    }

    /// Add `constraint`, returning its index
    pub fn add_constraint(&mut self, constraint: Constraint) -> CircuitResult<usize> {
        for term in &constraint.lhs.terms {
            if term.wire.gate >= self.n_gates {
                return Err(CircuitError::IndexOutOfRange {
                    index: term.wire.gate,
                    bound: self.n_gates,
                });
            }
        }
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    /// Merge repeated wires, drop zero weights and pad the gate count
    pub fn build(self) -> CircuitResult<Circuit> {
        let n_gates = self
            .n_gates
            .max(1)
            .checked_next_power_of_two()
            .ok_or_else(|| CircuitError::InvalidParameters("too many gates".to_string()))?;
        let n_constraints = self.constraints.len();
        let n_entries = self.constraints.iter().map(|c| c.lhs.len()).sum();
        check_footprint(n_gates, n_constraints, n_entries)?;

        let mut rows: [Vec<Vec<WireEntry>>; 3] = Default::default();
        for role_rows in rows.iter_mut() {
            role_rows.resize(n_gates, Vec::new());
        }
        let mut constants = Vec::with_capacity(n_constraints);
        for (q, mut constraint) in self.constraints.into_iter().enumerate() {
            constraint.lhs.simplify();
            for term in constraint.lhs.terms {
                rows[term.wire.role as usize][term.wire.gate].push(WireEntry {
                    constraint: q,
                    weight: term.coefficient,
                });
            }
            constants.push(constraint.constant);
        }

        Circuit::from_parts(self.n_commits, self.n_bits, n_constraints, rows, constants)
    }
}
