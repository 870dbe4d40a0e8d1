//! # Arithmetic circuits for Bulletproofs
//!
//! A circuit is a list of multiplication gates `l_i * r_i = o_i` tied
//! together by linear constraints
//!
//! ```text
//! sum_i (W_L[q][i] * l_i + W_R[q][i] * r_i + W_O[q][i] * o_i) = c_q
//! ```
//!
//! stored as sparse per-gate rows of `(constraint, weight)` pairs. The first
//! `n_bits` gates are additionally forced to carry a bit (`r = l - 1`,
//! `o = 0`) and the left wire of gate `j < n_commits` is the value behind the
//! `j`-th Pedersen commitment.
//!
//! Circuits come from a small text language ([`Circuit::parse`]), a canonical
//! binary format ([`Circuit::decode`]) or a [`CircuitBuilder`]. A satisfying
//! [`CircuitAssignment`] can be proven in zero knowledge with [`prove`] and
//! checked with [`verify`] or, batched, [`verify_multi`].
//!
//! ```no_run
//! use bulletproofs_core::{GeneratorSet, ScratchSpace};
//! use circuit::{prove, verify, Circuit, CircuitAssignment};
//! use curve25519_dalek::scalar::Scalar;
//!
//! let circuit = Circuit::parse("1,0,0,1; L0 + R0 = 10;")?;
//! let assignment = CircuitAssignment::new(
//!     vec![Scalar::from(3u64)],
//!     vec![Scalar::from(7u64)],
//!     vec![Scalar::from(21u64)],
//! )?;
//!
//! let gens = GeneratorSet::new(GeneratorSet::standard_blinding_generator(), 2, 1)?;
//! let value_gen = GeneratorSet::standard_value_generator();
//! let proof = prove(&gens, &circuit, &assignment, &[], &[7u8; 32], &value_gen, b"")?;
//!
//! let mut scratch = ScratchSpace::new(1 << 16);
//! verify(&gens, &mut scratch, &circuit, &proof.to_bytes(), &[], &value_gen, b"")?;
//! # Ok::<(), circuit::CircuitError>(())
//! ```

#![forbid(unsafe_code)]

pub mod assignment;
pub mod circuit;
pub mod codec;
pub mod constraint;
pub mod linear_combination;
pub mod parse;
pub mod proof;
pub mod prover;
pub mod verifier;
pub mod wire;

pub use assignment::*;
pub use circuit::*;
pub use constraint::*;
pub use linear_combination::*;
pub use proof::CircuitProof;
pub use prover::prove;
pub use verifier::{verify, verify_multi, CircuitProofInstance};
pub use wire::*;

use bulletproofs_core::BulletproofsError;
use thiserror::Error;

/// Errors from building, decoding, evaluating or proving circuits
#[derive(Error, Debug)]
pub enum CircuitError {
    /// Text description could not be parsed
    #[error("Parse error in statement {statement}: {message}")]
    Parse { statement: usize, message: String },

    /// Binary input ended early
    #[error("Unexpected end of input")]
    Truncated,

    /// Binary input continued past its end
    #[error("Trailing bytes after encoded data")]
    TrailingBytes,

    #[error("Unsupported format version {0}")]
    UnsupportedVersion(u32),

    /// Constraint or gate index beyond its bound
    #[error("Index {index} out of range (bound {bound})")]
    IndexOutOfRange { index: usize, bound: usize },

    /// Missing scalar tag or non-canonical scalar encoding
    #[error("Invalid scalar encoding")]
    InvalidScalar,

    /// Decoded data would exceed the memory limit
    #[error("Circuit needs {needed} bytes, limit is {limit}")]
    TooLarge { needed: usize, limit: usize },

    /// Multiplication or bit gate not satisfied
    #[error("Gate {0} is not satisfied")]
    GateViolated(usize),

    /// Linear constraint not satisfied
    #[error("Constraint {0} is not satisfied")]
    ConstraintViolated(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Proof(#[from] BulletproofsError),
}

/// Result type for circuit operations
pub type CircuitResult<T> = Result<T, CircuitError>;

#[cfg(test)]
mod property_tests;
