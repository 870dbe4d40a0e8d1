//! Recovering the opening of a single-value range proof from its nonce

use crate::proof::{nonce_context, replay_challenges, statement_transcript, RangeProof, RangeShape};
use bulletproofs_core::{
    utils::scalar_to_u64, BulletproofsError, BulletproofsResult, GeneratorSet, Nonce,
    NonceGenerator, PedersenCommitment, RistrettoPoint, Scalar,
};
use std::slice;
use subtle::ConstantTimeEq;
use tracing::instrument;

/// Extract `(value, blinding)` from a single-commitment range proof.
///
/// Only the holder of the prover's `nonce` can do this: it re-derives the
/// prover's blinding scalars, reads the value out of `mu` and the blinding
/// factor out of `tau_x`, and accepts the result only if it reopens
/// `commitment`. The proof itself is not verified.
#[instrument(skip_all, level = "debug", fields(nbits = nbits))]
#[allow(clippy::too_many_arguments)]
pub fn rewind(
    gens: &GeneratorSet,
    proof: &[u8],
    nbits: usize,
    min_value: u64,
    commitment: &PedersenCommitment,
    value_gen: &RistrettoPoint,
    nonce: &Nonce,
    extra_commit: &[u8],
) -> BulletproofsResult<(u64, Scalar)> {
    let shape = RangeShape::new(nbits, 1)?;
    let proof = RangeProof::from_bytes(proof).map_err(|_| BulletproofsError::RewindFailed)?;
    if proof.ipa_proof.num_rounds() != shape.rounds {
        return Err(BulletproofsError::RewindFailed);
    }

    let commitments = slice::from_ref(commitment);
    let min_values = Some(slice::from_ref(&min_value));
    let mut transcript = statement_transcript(nbits, commitments, min_values, extra_commit);
    let ch = replay_challenges(&mut transcript, &proof).map_err(|_| BulletproofsError::RewindFailed)?;

    let context = nonce_context(nbits, commitments, min_values);
    let derivation = NonceGenerator::new(nonce, &[context.as_slice(), extra_commit]);
    let alpha = derivation.scalar(b"alpha", 0);
    let rho = derivation.scalar(b"rho", 0);
    let tau1 = derivation.scalar(b"tau", 1);
    let tau2 = derivation.scalar(b"tau", 2);

    // mu = alpha - (v - min) + rho * x
    let diff = alpha + rho * ch.x - proof.mu;
    let value = scalar_to_u64(&diff)
        .and_then(|diff| diff.checked_add(min_value))
        .ok_or(BulletproofsError::RewindFailed)?;

    // tau_x = tau1 * x + tau2 * x^2 + z^2 * blinding
    let blinding = (proof.tau_x - tau1 * ch.x - tau2 * ch.x * ch.x) * (ch.z * ch.z).invert();

    let expected = commitment
        .decompress()
        .map_err(|_| BulletproofsError::RewindFailed)?;
    let reopened = gens.commit(&Scalar::from(value), &blinding, value_gen);
    if bool::from(reopened.ct_eq(&expected)) {
        Ok((value, blinding))
    } else {
        Err(BulletproofsError::RewindFailed)
    }
}
