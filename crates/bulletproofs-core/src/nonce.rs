//! Deterministic derivation of prover blinding scalars from a secret nonce
//!
//! Every scalar the prover would otherwise draw at random is derived from
//! `(nonce, context, label, index)`. Proofs are therefore reproducible, and
//! the holder of the nonce can recompute the blindings later (range proof
//! rewinding).

use curve25519_dalek::scalar::Scalar;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

/// Secret 32-byte seed supplied by the prover
pub type Nonce = [u8; 32];

/// Keyed scalar derivation bound to a public context
pub struct NonceGenerator {
    seed: [u8; 64],
}

impl NonceGenerator {
    /// Bind `nonce` to the public `context` items (commitments, extra data, ...)
    pub fn new(nonce: &Nonce, context: &[&[u8]]) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(b"bulletproofs_nonce");
        hasher.update(nonce);
        for item in context {
            hasher.update((item.len() as u64).to_le_bytes());
            hasher.update(item);
        }

        let mut seed = [0u8; 64];
        seed.copy_from_slice(&hasher.finalize());
        Self { seed }
    }

    /// Derive the scalar for `label` at position `index`
    pub fn scalar(&self, label: &[u8], index: u64) -> Scalar {
        let mut hasher = Sha512::new();
        hasher.update(&self.seed);
        hasher.update((label.len() as u64).to_le_bytes());
        hasher.update(label);
        hasher.update(index.to_le_bytes());

        let mut wide = [0u8; 64];
        wide.copy_from_slice(&hasher.finalize());
        let scalar = Scalar::from_bytes_mod_order_wide(&wide);
        wide.zeroize();
        scalar
    }

    /// Derive `len` scalars for `label` at positions `0..len`
    pub fn scalars(&self, label: &[u8], len: usize) -> Vec<Scalar> {
        (0..len as u64).map(|i| self.scalar(label, i)).collect()
    }
}

impl Drop for NonceGenerator {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}
