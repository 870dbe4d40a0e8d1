//! Utility functions for Bulletproofs operations

use crate::{BulletproofsError, BulletproofsResult};
use curve25519_dalek::scalar::Scalar;

/// Compute powers of a scalar: [1, x, x^2, x^3, ..., x^(n-1)]
pub fn scalar_powers(x: &Scalar, n: usize) -> Vec<Scalar> {
    let mut powers = Vec::with_capacity(n);
    let mut current = Scalar::ONE;

    for _ in 0..n {
        powers.push(current);
        current *= x;
    }

    powers
}

/// Compute the inner product of two scalar vectors
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> BulletproofsResult<Scalar> {
    if a.len() != b.len() {
        return Err(BulletproofsError::VectorLengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(ai, bi)| ai * bi).sum())
}

/// Construct the little-endian bit decomposition of a value.
///
/// Branch-free in `value`: every bit becomes a scalar through the same
/// arithmetic regardless of its value.
pub fn bit_decomposition(value: u64, bits: usize) -> Vec<Scalar> {
    (0..bits)
        .map(|i| Scalar::from((value >> i) & 1))
        .collect()
}

/// Smallest power of two `>= n` (and at least 1)
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Reduce a scalar to a `u64` if it fits, for values recovered from proofs
pub fn scalar_to_u64(scalar: &Scalar) -> Option<u64> {
    let bytes = scalar.as_bytes();
    if bytes[8..].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[..8]);
    Some(u64::from_le_bytes(low))
}
