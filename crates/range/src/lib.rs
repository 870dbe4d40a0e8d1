//! # Bulletproofs Range Proofs
//!
//! This crate implements aggregate range proofs using the inner product argument.
//! A range proof shows that each committed value lies in `[min, min + 2^n)`
//! without revealing it, and `m` commitments share one proof of size
//! `O(log(n * m))`.
//!
//! ## Mathematical Background
//!
//! A range proof for value `v` in range `[min, min + 2^n)` works by:
//!
//! 1. **Bit Decomposition**: Express `v - min = Σ(b_i * 2^i)` where `b_i ∈ {0,1}`
//! 2. **Vector Commitment**: Commit to the bit vector `a_L` and `a_R = a_L - 1`
//! 3. **Constraint System**: Reduce the constraints
//!    - Each `b_i` is binary: `a_L ∘ a_R = 0`
//!    - Bits sum to value: `<a_L, 2^n> = v - min`
//!
//!    to one polynomial identity `t(x) = <l(x), r(x)>` checked at a random point
//! 4. **Inner Product Argument**: Prove `<l(x), r(x)> = t(x)` in `2 log(n)` points
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bulletproofs_core::{GeneratorSet, PedersenCommitment, Scalar, ScratchSpace};
//!
//! let gens = GeneratorSet::new(GeneratorSet::standard_blinding_generator(), 128, 1).unwrap();
//! let value_gen = GeneratorSet::standard_value_generator();
//! let blinding = Scalar::from(12345u64);
//! let nonce = [7u8; 32];
//!
//! // Prove that value 42 is in range [0, 2^8)
//! let proof = range::prove(&gens, &[42], None, &[blinding], 8, &value_gen, &nonce, b"").unwrap();
//! let commitment = PedersenCommitment::new(&gens, 42, &blinding, &value_gen);
//!
//! let mut scratch = ScratchSpace::new(1 << 16);
//! assert!(range::verify(&gens, &mut scratch, &proof.to_bytes(), None, &[commitment], 8, &value_gen, b"").is_ok());
//! ```

pub mod proof;
pub mod prover;
pub mod rewind;
pub mod verifier;

#[cfg(test)]
mod property_tests;

pub use proof::RangeProof;
pub use prover::prove;
pub use rewind::rewind;
pub use verifier::{verify, verify_multi, RangeProofInstance};
