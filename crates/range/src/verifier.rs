//! Range proof verification, single and batched
//!
//! Each proof contributes two checks: the polynomial identity
//!
//! ```text
//! t_hat * B + tau_x * B~ = sum_j z^{2+j} (V_j - min_j * B) + delta(y, z) * B + x * T1 + x^2 * T2
//! ```
//!
//! and the inner product argument for `l(x)`, `r(x)`. The first is scaled by
//! a pseudorandom `c`, the pair by a pseudorandom `r`, and every proof in a
//! batch lands in one multiscalar multiplication over shared generators.

use crate::proof::{min_value_at, replay_challenges, statement_transcript, RangeProof, RangeShape};
use bulletproofs_core::{
    bulletproofs_transcript, decompress_point, params::MAX_DEPTH, BulletproofsError,
    BulletproofsResult, GeneratorSet, IsIdentity, PedersenCommitment, RistrettoPoint, Scalar,
    ScratchSpace, TranscriptProtocol,
};
use tracing::{debug, instrument};

/// One proof and its public inputs, for [`verify_multi`]
#[derive(Debug, Clone, Copy)]
pub struct RangeProofInstance<'a> {
    /// Serialized proof
    pub proof: &'a [u8],
    /// Commitments the proof is over
    pub commitments: &'a [PedersenCommitment],
    /// Lower bound of each range, all zero when `None`
    pub min_values: Option<&'a [u64]>,
    /// Context bytes the prover committed to
    pub extra_commit: &'a [u8],
}

/// Verify a single (possibly aggregate) range proof
#[allow(clippy::too_many_arguments)]
pub fn verify(
    gens: &GeneratorSet,
    scratch: &mut ScratchSpace,
    proof: &[u8],
    min_values: Option<&[u64]>,
    commitments: &[PedersenCommitment],
    nbits: usize,
    value_gen: &RistrettoPoint,
    extra_commit: &[u8],
) -> BulletproofsResult<()> {
    let instance = RangeProofInstance {
        proof,
        commitments,
        min_values,
        extra_commit,
    };
    verify_multi(gens, scratch, &[instance], nbits, value_gen)
}

/// Verify a batch of range proofs sharing `nbits` and commitment count.
///
/// Succeeds only if every proof is valid. Temporaries come from `scratch`
/// and are released before returning.
#[instrument(skip_all, level = "debug", fields(n_proofs = instances.len(), nbits = nbits))]
pub fn verify_multi(
    gens: &GeneratorSet,
    scratch: &mut ScratchSpace,
    instances: &[RangeProofInstance<'_>],
    nbits: usize,
    value_gen: &RistrettoPoint,
) -> BulletproofsResult<()> {
    let first = instances.first().ok_or_else(|| {
        BulletproofsError::InvalidParameters("no proofs to verify".to_string())
    })?;
    let shape = RangeShape::new(nbits, first.commitments.len())?;
    for instance in instances {
        if instance.commitments.len() != shape.n_commits {
            return Err(BulletproofsError::VectorLengthMismatch {
                expected: shape.n_commits,
                actual: instance.commitments.len(),
            });
        }
        shape.check_min_values(instance.min_values)?;
    }

    let n = shape.padded_len;
    let g = gens.g_vec(n)?;
    let h = gens.h_vec(n)?;

    // Batch weights depend on every proof, so no single proof can anticipate them
    let mut batch = bulletproofs_transcript(b"rangeproof batch");
    batch.append_u64(b"n_proofs", instances.len() as u64);
    for instance in instances {
        batch.append_message(b"proof", instance.proof);
        for (j, commitment) in instance.commitments.iter().enumerate() {
            batch.append_point(b"V", commitment.as_compressed());
            batch.append_u64(b"min", min_value_at(instance.min_values, j));
        }
        batch.append_extra_commit(instance.extra_commit);
    }

    let mut frame = scratch.frame();
    let buf = frame.alloc_scalars(3 * n)?;
    let mut value_coeff = Scalar::ZERO;
    let mut blinding_coeff = Scalar::ZERO;
    let mut u_coeff = Scalar::ZERO;

    let range_mask = Scalar::from(shape.range_mask());
    let real_len = shape.real_len();

    for instance in instances {
        let c = batch.challenge_scalar(b"c");
        let weight = batch.challenge_scalar(b"r");

        let proof = RangeProof::from_bytes(instance.proof)?;
        if proof.ipa_proof.num_rounds() != shape.rounds {
            return Err(BulletproofsError::VerificationFailed);
        }

        let mut transcript = statement_transcript(
            nbits,
            instance.commitments,
            instance.min_values,
            instance.extra_commit,
        );
        let ch = replay_challenges(&mut transcript, &proof)?;
        let mut challenges = [Scalar::ZERO; MAX_DEPTH];
        let challenges = &mut challenges[..shape.rounds];
        ipa::replay_challenges(&proof.ipa_proof, n, &mut transcript, challenges)?;

        let (y, z, x) = (ch.y, ch.z, ch.x);
        let (a, b) = (proof.ipa_proof.a, proof.ipa_proof.b);

        // Generator coefficients; also accumulates sum_{k<n} y^k for delta
        let mut sum_y = Scalar::ZERO;
        {
            let (gh, s) = frame.scalars_mut(buf).split_at_mut(2 * n);
            ipa::compute_s_scalars(challenges, s);

            let y_inv = y.invert();
            let mut y_k = Scalar::ONE;
            let mut y_inv_k = Scalar::ONE;
            let mut z_j = z * z;
            let mut two_i = Scalar::ONE;
            for k in 0..n {
                let w_k = if k < real_len {
                    let w_k = z_j * two_i;
                    two_i += two_i;
                    if (k + 1) % nbits == 0 {
                        two_i = Scalar::ONE;
                        z_j *= z;
                    }
                    w_k
                } else {
                    Scalar::ZERO
                };

                gh[k] += weight * (-z - a * s[k]);
                gh[n + k] += weight * (z + (w_k - b * s[n - 1 - k]) * y_inv_k);

                sum_y += y_k;
                y_k *= y;
                y_inv_k *= y_inv;
            }
        }

        let mut delta = (z - z * z) * sum_y;
        let mut min_term = Scalar::ZERO;
        let mut z_j = z * z;
        for (j, commitment) in instance.commitments.iter().enumerate() {
            delta -= z_j * z * range_mask;
            min_term += z_j * Scalar::from(min_value_at(instance.min_values, j));
            frame.push_term(weight * c * z_j, commitment.decompress()?)?;
            z_j *= z;
        }

        value_coeff += weight * c * (delta - proof.t_hat - min_term);
        blinding_coeff += weight * (-proof.mu - c * proof.tau_x);
        u_coeff += weight * ch.w * (proof.t_hat - a * b);

        frame.push_term(weight, decompress_point(&proof.a)?)?;
        frame.push_term(weight * x, decompress_point(&proof.s)?)?;
        frame.push_term(weight * c * x, decompress_point(&proof.t1)?)?;
        frame.push_term(weight * c * x * x, decompress_point(&proof.t2)?)?;
        for ((l, r), u) in proof
            .ipa_proof
            .l_vec
            .iter()
            .zip(proof.ipa_proof.r_vec.iter())
            .zip(challenges.iter())
        {
            let u_sq = u * u;
            frame.push_term(weight * u_sq, decompress_point(l)?)?;
            frame.push_term(weight * u_sq.invert(), decompress_point(r)?)?;
        }
    }

    debug!(scratch_used = frame.used(), "evaluating batch equation");

    let gh = &frame.scalars(buf)[..2 * n];
    let check = frame.multiscalar_mul(
        gh.iter().chain([&value_coeff, &blinding_coeff, &u_coeff]),
        g.iter().chain(h.iter()).chain([
            value_gen,
            gens.blinding_generator(),
            gens.u_generator(),
        ]),
    );

    if check.is_identity() {
        Ok(())
    } else {
        debug!("range proof batch equation does not hold");
        Err(BulletproofsError::VerificationFailed)
    }
}
