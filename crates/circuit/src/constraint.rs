//! Linear constraints over gate wires

use crate::{linear_combination::DisplayScalar, LinearCombination};
use curve25519_dalek::scalar::Scalar;
use std::fmt;

/// A linear constraint: `lhs = constant`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub lhs: LinearCombination,
    pub constant: Scalar,
}

impl Constraint {
    pub fn new(lhs: LinearCombination, constant: Scalar) -> Self {
        Self { lhs, constant }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, DisplayScalar(&self.constant))
    }
}
