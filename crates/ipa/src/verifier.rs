//! Inner Product Argument verifier implementation
//!
//! Verification collapses all folding rounds into one multiscalar
//! multiplication. After replaying the challenges `u_1..u_k`, generator `G_i`
//! of the folded vector carries the weight `s_i = prod_j u_j^{b(i, j)}` where
//! `b(i, j)` is `+1` if bit `k - j` of `i` is set and `-1` otherwise; `H_i`
//! carries `1 / s_i = s_{n - 1 - i}`.

use crate::InnerProductProof;
use bulletproofs_core::{
    decompress_point,
    params::{folding_rounds, MAX_DEPTH},
    BulletproofsError, BulletproofsResult, IsIdentity, RistrettoPoint, Scalar, ScratchSpace,
    Transcript, TranscriptProtocol,
};
use tracing::{debug, instrument};

/// Replay the folding challenges of `proof` for vectors of length `n`.
///
/// `challenges` must hold exactly `log2(n)` entries. Identity `L`/`R` points
/// and round counts that do not match `n` fail verification.
pub fn replay_challenges(
    proof: &InnerProductProof,
    n: usize,
    transcript: &mut Transcript,
    challenges: &mut [Scalar],
) -> BulletproofsResult<()> {
    proof.validate_structure()?;
    if !n.is_power_of_two() || folding_rounds(n) != proof.num_rounds() {
        return Err(BulletproofsError::VerificationFailed);
    }
    if challenges.len() != proof.num_rounds() {
        return Err(BulletproofsError::VectorLengthMismatch {
            expected: proof.num_rounds(),
            actual: challenges.len(),
        });
    }

    transcript.innerproduct_domain_sep(n as u64);
    for ((l, r), u) in proof
        .l_vec
        .iter()
        .zip(proof.r_vec.iter())
        .zip(challenges.iter_mut())
    {
        transcript.validate_and_append_point(b"L", l)?;
        transcript.validate_and_append_point(b"R", r)?;
        *u = transcript.challenge_scalar(b"u");
    }

    Ok(())
}

/// Fill `s` with the per-generator folding weights for `challenges`.
///
/// `s` must have length `2^challenges.len()`.
pub fn compute_s_scalars(challenges: &[Scalar], s: &mut [Scalar]) {
    let rounds = challenges.len();
    debug_assert_eq!(s.len(), 1 << rounds);

    let all_inv: Scalar = challenges.iter().map(|u| u.invert()).product();
    s[0] = all_inv;
    for i in 1..s.len() {
        let lg_i = (usize::BITS - 1 - i.leading_zeros()) as usize;
        let k = 1 << lg_i;
        // The highest set bit of i flips u^{-1} to u for round (rounds - 1 - lg_i)
        let u = challenges[rounds - 1 - lg_i];
        s[i] = s[i - k] * u * u;
    }
}

/// Verify an inner product proof against `P = <a, G> + <b, H'> + <a, b> * Q`
///
/// `H'_i = h_factors[i] * H_i`, mirroring [`crate::prove`]. Every temporary is
/// taken from `scratch` and released before returning.
#[instrument(skip_all, level = "debug", fields(n = g_vec.len()))]
#[allow(clippy::too_many_arguments)]
pub fn verify(
    proof: &InnerProductProof,
    transcript: &mut Transcript,
    scratch: &mut ScratchSpace,
    p: &RistrettoPoint,
    q: &RistrettoPoint,
    h_factors: &[Scalar],
    g_vec: &[RistrettoPoint],
    h_vec: &[RistrettoPoint],
) -> BulletproofsResult<()> {
    let n = g_vec.len();
    if h_vec.len() != n || h_factors.len() != n {
        return Err(BulletproofsError::VectorLengthMismatch {
            expected: n,
            actual: h_vec.len().min(h_factors.len()),
        });
    }

    proof.validate_structure()?;
    let rounds = proof.num_rounds();
    let mut challenges = [Scalar::ZERO; MAX_DEPTH];
    replay_challenges(proof, n, transcript, &mut challenges[..rounds])?;
    let challenges = &challenges[..rounds];

    let mut frame = scratch.frame();
    let buf = frame.alloc_scalars(3 * n)?;
    {
        let (s, gh) = frame.scalars_mut(buf).split_at_mut(n);
        compute_s_scalars(challenges, s);
        for i in 0..n {
            gh[i] = proof.a * s[i];
            gh[n + i] = proof.b * s[n - 1 - i] * h_factors[i];
        }
    }

    for ((l, r), u) in proof.l_vec.iter().zip(proof.r_vec.iter()).zip(challenges) {
        let u_sq = u * u;
        frame.push_term(-u_sq, decompress_point(l)?)?;
        frame.push_term(-u_sq.invert(), decompress_point(r)?)?;
    }
    frame.push_term(-Scalar::ONE, *p)?;

    let ab = proof.a * proof.b;
    let gh = &frame.scalars(buf)[n..];
    let check = frame.multiscalar_mul(
        gh.iter().chain(std::iter::once(&ab)),
        g_vec.iter().chain(h_vec.iter()).chain(std::iter::once(q)),
    );

    if check.is_identity() {
        Ok(())
    } else {
        debug!("inner product equation does not hold");
        Err(BulletproofsError::VerificationFailed)
    }
}
