//! # Inner Product Argument (IPA)
//!
//! This crate implements the inner product argument, which is the core component
//! of Bulletproofs. The IPA proves knowledge of vectors `a` and `b` such that:
//!
//! ```text
//! P = <a, G> + <b, H'> + <a, b> * Q        with H'_i = h_factors[i] * H_i
//! ```
//!
//! ## Mathematical Background
//!
//! The inner product argument uses a recursive folding approach:
//!
//! 1. **Base Case**: For vectors of length 1, the proof is just the values `a` and `b`.
//!
//! 2. **Recursive Case**: For vectors of length `n > 1`:
//!    - Split vectors: `a = (a_L, a_R)`, `b = (b_L, b_R)`
//!    - Compute cross terms:
//!      - `L = <a_L, G_R> + <b_R, H_L> + <a_L, b_R> * Q`
//!      - `R = <a_R, G_L> + <b_L, H_R> + <a_R, b_L> * Q`
//!    - Get challenge `u` from Fiat-Shamir
//!    - Fold vectors:
//!      - `a' = a_L * u + a_R * u^{-1}`
//!      - `b' = b_L * u^{-1} + b_R * u`
//!    - Fold generators:
//!      - `G' = G_L * u^{-1} + G_R * u`
//!      - `H' = H_L * u + H_R * u^{-1}`
//!    - Recurse with folded values
//!
//! The proof consists of all the L and R values from each folding round
//! followed by the final `a` and `b`. Range and circuit verifiers use
//! [`replay_challenges`] and [`compute_s_scalars`] to merge the final check
//! into their own multiscalar multiplication.

pub mod proof;
pub mod prover;
pub mod verifier;

pub use proof::*;
pub use prover::*;
pub use verifier::*;
