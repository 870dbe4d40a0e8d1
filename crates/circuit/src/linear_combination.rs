//! Weighted sums of wires

use crate::{CircuitAssignment, Wire};
use bulletproofs_core::utils::scalar_to_u64;
use curve25519_dalek::scalar::Scalar;
use std::{fmt, ops};

/// A term in a linear combination: coefficient * wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub coefficient: Scalar,
    pub wire: Wire,
}

impl Term {
    pub fn new(coefficient: Scalar, wire: Wire) -> Self {
        Self { coefficient, wire }
    }
}

/// A linear combination of wires: c1*w1 + c2*w2 + ... + cn*wn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearCombination {
    pub terms: Vec<Term>,
}

impl LinearCombination {
    /// Create an empty linear combination
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Create a linear combination from a single wire
    pub fn from_wire(wire: Wire) -> Self {
        Self {
            terms: vec![Term::new(Scalar::ONE, wire)],
        }
    }

    /// Add a term to the linear combination
    pub fn add_term(&mut self, coefficient: Scalar, wire: Wire) {
        self.terms.push(Term::new(coefficient, wire));
    }

    /// Merge repeated wires and drop zero coefficients, ordering terms by wire
    pub fn simplify(&mut self) {
        self.terms.sort_by_key(|term| term.wire);
        let mut merged: Vec<Term> = Vec::with_capacity(self.terms.len());
        for term in self.terms.drain(..) {
            match merged.last_mut() {
                Some(last) if last.wire == term.wire => last.coefficient += term.coefficient,
                _ => merged.push(term),
            }
        }
        merged.retain(|term| term.coefficient != Scalar::ZERO);
        self.terms = merged;
    }

    /// Evaluate the linear combination on an assignment; missing wires count as zero
    pub fn evaluate(&self, assignment: &CircuitAssignment) -> Scalar {
        self.terms
            .iter()
            .filter_map(|term| assignment.value(term.wire).map(|v| term.coefficient * v))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Writes small scalars (and negations of small scalars) as decimal integers
pub(crate) struct DisplayScalar<'a>(pub &'a Scalar);

impl fmt::Display for DisplayScalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = scalar_to_u64(self.0) {
            write!(f, "{}", value)
        } else if let Some(value) = scalar_to_u64(&-self.0) {
            write!(f, "-{}", value)
        } else {
            write!(f, "0x{}", hex::encode(self.0.as_bytes()))
        }
    }
}

impl fmt::Display for LinearCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }

        for (i, term) in self.terms.iter().enumerate() {
            let negated = -term.coefficient;
            let (sign, magnitude) = match scalar_to_u64(&negated) {
                Some(v) if v != 0 && scalar_to_u64(&term.coefficient).is_none() => ("-", negated),
                _ => ("+", term.coefficient),
            };
            match (i, sign) {
                (0, "-") => write!(f, "-")?,
                (0, _) => {}
                _ => write!(f, " {} ", sign)?,
            }
            if magnitude != Scalar::ONE {
                write!(f, "{}*", DisplayScalar(&magnitude))?;
            }
            write!(f, "{}", term.wire)?;
        }
        Ok(())
    }
}

impl ops::Add for LinearCombination {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.terms.extend_from_slice(&other.terms);
        self
    }
}

impl ops::Sub for LinearCombination {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other * -Scalar::ONE
    }
}

impl ops::Mul<Scalar> for LinearCombination {
    type Output = Self;

    fn mul(mut self, scalar: Scalar) -> Self {
        for term in &mut self.terms {
            term.coefficient *= scalar;
        }
        self
    }
}

impl From<Wire> for LinearCombination {
    fn from(wire: Wire) -> Self {
        Self::from_wire(wire)
    }
}
