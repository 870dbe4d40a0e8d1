//! # Bulletproofs Core
//!
//! This crate provides the foundational types and utilities shared by the
//! inner-product argument, range proofs and circuit proofs:
//!
//! - NUMS generator sets and Pedersen commitments
//! - Transcript management for Fiat-Shamir transforms
//! - Deterministic, nonce-derived prover randomness
//! - Scratch space for batched verification
//! - Error types, protocol limits and scalar utilities
//!
//! ## Mathematical Background
//!
//! Bulletproofs operate over a prime-order group with generators:
//! - `B`: value generator for Pedersen commitments (caller supplied)
//! - `B~`: blinding generator for Pedersen commitments
//! - `{G_i}`, `{H_i}`: vector generators for the left and right vectors
//! - `u`: generator the inner product is bound to
//!
//! The core relation is knowledge of vectors `a, b` such that:
//! ```text
//! P = <a, G> + <b, H> + <a, b> * Q
//! ```

pub mod commitment;
pub mod errors;
pub mod generators;
pub mod nonce;
pub mod params;
pub mod scratch;
pub mod transcript;
pub mod utils;

pub use commitment::*;
pub use errors::*;
pub use generators::*;
pub use nonce::*;
pub use scratch::*;
pub use transcript::*;

/// Re-export commonly used types from curve25519-dalek
pub use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::{Identity, IsIdentity, MultiscalarMul, VartimeMultiscalarMul},
};

/// Re-export merlin transcript
pub use merlin::Transcript;
