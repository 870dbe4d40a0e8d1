//! Wire assignments and their binary format
//!
//! ```text
//! version: u32 | n_gates: u64 | l[0..n] | r[0..n] | o[0..n]
//! ```
//!
//! with every value written as `0x20` followed by its 32-byte encoding.

use crate::{
    codec::{ByteReader, SCALAR_TAG},
    CircuitError, CircuitResult, Wire, WireRole,
};
use bulletproofs_core::{
    params::{CIRCUIT_VERSION, MAX_CIRCUIT_SIZE, SCALAR_SIZE},
    GeneratorSet, PedersenCommitment, RistrettoPoint,
};
use curve25519_dalek::scalar::Scalar;
use std::{fmt, fs, path::Path};
use tracing::instrument;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Values of the left, right and output wire of every gate
///
/// Wire values are secret and wiped when the assignment is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CircuitAssignment {
    l: Vec<Scalar>,
    r: Vec<Scalar>,
    o: Vec<Scalar>,
}

impl CircuitAssignment {
    /// Create an assignment; all three vectors need one value per gate
    pub fn new(l: Vec<Scalar>, r: Vec<Scalar>, o: Vec<Scalar>) -> CircuitResult<Self> {
        if l.len() != r.len() || l.len() != o.len() {
            return Err(CircuitError::InvalidParameters(format!(
                "wire vectors of lengths {}, {}, {}",
                l.len(),
                r.len(),
                o.len()
            )));
        }
        Ok(Self { l, r, o })
    }

    /// Extend with zero-valued dummy gates up to `n_gates`
    pub fn padded(mut self, n_gates: usize) -> Self {
        if n_gates > self.n_gates() {
            for wires in [&mut self.l, &mut self.r, &mut self.o] {
                wires.resize(n_gates, Scalar::ZERO);
            }
        }
        self
    }

    pub fn n_gates(&self) -> usize {
        self.l.len()
    }

    pub fn left(&self) -> &[Scalar] {
        &self.l
    }

    pub fn right(&self) -> &[Scalar] {
        &self.r
    }

    pub fn output(&self) -> &[Scalar] {
        &self.o
    }

    /// Value on `wire`, if its gate exists
    pub fn value(&self, wire: Wire) -> Option<&Scalar> {
        let wires = match wire.role {
            WireRole::Left => &self.l,
            WireRole::Right => &self.r,
            WireRole::Output => &self.o,
        };
        wires.get(wire.gate)
    }

    /// Pedersen commitment to the `j`-th committed value, the left wire of gate `j`
    pub fn commit(
        &self,
        j: usize,
        blinding: &Scalar,
        value_gen: &RistrettoPoint,
        gens: &GeneratorSet,
    ) -> CircuitResult<PedersenCommitment> {
        let value = self.l.get(j).ok_or(CircuitError::IndexOutOfRange {
            index: j,
            bound: self.l.len(),
        })?;
        Ok(PedersenCommitment::from_point(&gens.commit(value, blinding, value_gen)))
    }

    /// Serialize to the binary assignment format
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + 3 * self.n_gates() * (1 + SCALAR_SIZE));
        out.extend_from_slice(&CIRCUIT_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.n_gates() as u64).to_le_bytes());
        for value in self.l.iter().chain(&self.r).chain(&self.o) {
            out.push(SCALAR_TAG);
            out.extend_from_slice(value.as_bytes());
        }
        out
    }

    /// Parse the binary assignment format
    #[instrument(skip_all, level = "debug", fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> CircuitResult<Self> {
        let mut reader = ByteReader::new(bytes);
        let version = reader.u32()?;
        if version != CIRCUIT_VERSION {
            return Err(CircuitError::UnsupportedVersion(version));
        }
        let n_gates = reader.length()?;

        let needed = n_gates
            .checked_mul(3 * std::mem::size_of::<Scalar>())
            .unwrap_or(usize::MAX);
        if needed > MAX_CIRCUIT_SIZE {
            return Err(CircuitError::TooLarge {
                needed,
                limit: MAX_CIRCUIT_SIZE,
            });
        }
        reader.require(3 * n_gates * (1 + SCALAR_SIZE))?;

        let mut read_wires = || (0..n_gates).map(|_| reader.scalar()).collect::<CircuitResult<Vec<_>>>();
        let l = read_wires()?;
        let r = read_wires()?;
        let o = read_wires()?;
        reader.finish()?;

        Ok(Self { l, r, o })
    }

    /// Read and parse an assignment file
    pub fn decode_file(path: impl AsRef<Path>) -> CircuitResult<Self> {
        Self::decode(&fs::read(path)?)
    }
}

impl fmt::Debug for CircuitAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitAssignment")
            .field("n_gates", &self.n_gates())
            .finish_non_exhaustive()
    }
}
