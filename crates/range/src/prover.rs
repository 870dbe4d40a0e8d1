//! Range proof prover implementation

use crate::proof::{min_value_at, nonce_context, statement_transcript, RangeProof, RangeShape};
use bulletproofs_core::{
    utils::{bit_decomposition, inner_product, scalar_powers},
    BulletproofsError, BulletproofsResult, GeneratorSet, MultiscalarMul, Nonce, NonceGenerator,
    PedersenCommitment, RistrettoPoint, Scalar, TranscriptProtocol,
};
use std::iter;
use subtle::{Choice, ConstantTimeEq};
use tracing::{debug, instrument};
use zeroize::Zeroize;

/// Weights `z^{2+j} * 2^i` of bit `i` of commitment `j`; padding positions are zero
pub(crate) fn bit_weights(z: &Scalar, shape: &RangeShape) -> Vec<Scalar> {
    let mut weights = Vec::with_capacity(shape.padded_len);
    let mut z_j = z * z;
    for _ in 0..shape.n_commits {
        let mut two_i = Scalar::ONE;
        for _ in 0..shape.nbits {
            weights.push(z_j * two_i);
            two_i += two_i;
        }
        z_j *= z;
    }
    weights.resize(shape.padded_len, Scalar::ZERO);
    weights
}

/// Prove that every `values[j]` lies in `[min_j, min_j + 2^nbits)`
///
/// The commitments proven over are `values[j] * value_gen + blindings[j] * B`
/// where `B` is the blinding generator of `gens`. All prover randomness is
/// derived from `nonce`, so identical inputs give byte-identical proofs and
/// the nonce holder can later [`rewind`](crate::rewind()) a single-value proof.
#[instrument(skip_all, level = "debug", fields(n_commits = values.len(), nbits = nbits))]
#[allow(clippy::too_many_arguments)]
pub fn prove(
    gens: &GeneratorSet,
    values: &[u64],
    min_values: Option<&[u64]>,
    blindings: &[Scalar],
    nbits: usize,
    value_gen: &RistrettoPoint,
    nonce: &Nonce,
    extra_commit: &[u8],
) -> BulletproofsResult<RangeProof> {
    let shape = RangeShape::new(nbits, values.len())?;
    if blindings.len() != values.len() {
        return Err(BulletproofsError::VectorLengthMismatch {
            expected: values.len(),
            actual: blindings.len(),
        });
    }
    shape.check_min_values(min_values)?;
    gens.ensure_capacity(shape.padded_len)?;

    let mut diffs = Vec::with_capacity(values.len());
    for (j, value) in values.iter().enumerate() {
        let diff = value
            .checked_sub(min_value_at(min_values, j))
            .filter(|diff| diff & !shape.range_mask() == 0)
            .ok_or(BulletproofsError::ValueOutOfRange { bits: nbits })?;
        diffs.push(diff);
    }
    let degenerate = blindings
        .iter()
        .fold(Choice::from(0), |acc, blinding| acc | blinding.ct_eq(&Scalar::ZERO));
    if bool::from(degenerate) {
        return Err(BulletproofsError::DegenerateBlinding);
    }

    let commitments: Vec<PedersenCommitment> = values
        .iter()
        .zip(blindings)
        .map(|(value, blinding)| PedersenCommitment::new(gens, *value, blinding, value_gen))
        .collect();

    let mut transcript = statement_transcript(nbits, &commitments, min_values, extra_commit);
    let context = nonce_context(nbits, &commitments, min_values);
    let derivation = NonceGenerator::new(nonce, &[context.as_slice(), extra_commit]);

    let n = shape.padded_len;
    let g = gens.g_vec(n)?;
    let h = gens.h_vec(n)?;
    let blinding_gen = gens.blinding_generator();

    let mut a_l = Vec::with_capacity(n);
    for diff in &diffs {
        a_l.extend(bit_decomposition(*diff, nbits));
    }
    a_l.resize(n, Scalar::ZERO);
    let mut a_r: Vec<Scalar> = a_l.iter().map(|bit| bit - Scalar::ONE).collect();

    let mut alpha = derivation.scalar(b"alpha", 0);
    if let [diff] = diffs.as_slice() {
        // Lets the nonce holder read the value back out of mu
        alpha -= Scalar::from(*diff);
    }
    let mut rho = derivation.scalar(b"rho", 0);
    let (mut s_l, mut s_r) = rayon::join(
        || derivation.scalars(b"sL", n),
        || derivation.scalars(b"sR", n),
    );

    let a = RistrettoPoint::multiscalar_mul(
        iter::once(&alpha).chain(a_l.iter()).chain(a_r.iter()),
        iter::once(blinding_gen).chain(g.iter()).chain(h.iter()),
    )
    .compress();
    let s = RistrettoPoint::multiscalar_mul(
        iter::once(&rho).chain(s_l.iter()).chain(s_r.iter()),
        iter::once(blinding_gen).chain(g.iter()).chain(h.iter()),
    )
    .compress();

    transcript.append_point(b"A", &a);
    transcript.append_point(b"S", &s);
    let y = transcript.challenge_scalar(b"y");
    let z = transcript.challenge_scalar(b"z");

    // l(X) = l0 + s_L * X,  r(X) = r0 + r1 * X
    let y_pow = scalar_powers(&y, n);
    let weights = bit_weights(&z, &shape);
    let mut l0: Vec<Scalar> = a_l.iter().map(|bit| bit - z).collect();
    let mut r0: Vec<Scalar> = (0..n)
        .map(|k| y_pow[k] * (a_r[k] + z) + weights[k])
        .collect();
    let mut r1: Vec<Scalar> = y_pow.iter().zip(&s_r).map(|(y_k, s)| y_k * s).collect();

    let t1 = inner_product(&l0, &r1)? + inner_product(&s_l, &r0)?;
    let t2 = inner_product(&s_l, &r1)?;

    let mut tau1 = derivation.scalar(b"tau", 1);
    let mut tau2 = derivation.scalar(b"tau", 2);
    let t1_commit = gens.commit(&t1, &tau1, value_gen).compress();
    let t2_commit = gens.commit(&t2, &tau2, value_gen).compress();

    transcript.append_point(b"T1", &t1_commit);
    transcript.append_point(b"T2", &t2_commit);
    let x = transcript.challenge_scalar(b"x");

    let l: Vec<Scalar> = l0.iter().zip(&s_l).map(|(l, s)| l + s * x).collect();
    let r: Vec<Scalar> = r0.iter().zip(&r1).map(|(r, r1)| r + r1 * x).collect();
    let t_hat = inner_product(&l, &r)?;

    let mut tau_x = tau1 * x + tau2 * x * x;
    let mut z_j = z * z;
    for blinding in blindings {
        tau_x += z_j * blinding;
        z_j *= z;
    }
    let mu = alpha + rho * x;

    transcript.append_scalar(b"t_hat", &t_hat);
    transcript.append_scalar(b"tau_x", &tau_x);
    transcript.append_scalar(b"mu", &mu);
    let w = transcript.challenge_scalar(b"w");
    let q = gens.u_generator() * w;

    let y_inv_pow = scalar_powers(&y.invert(), n);
    let ipa_proof = ipa::prove(&mut transcript, &q, &y_inv_pow, g.to_vec(), h.to_vec(), l, r)?;

    for secret in [&mut a_l, &mut a_r, &mut s_l, &mut s_r, &mut l0, &mut r0, &mut r1] {
        secret.zeroize();
    }
    for secret in [&mut alpha, &mut rho, &mut tau1, &mut tau2] {
        secret.zeroize();
    }

    debug!(rounds = shape.rounds, "created range proof");

    Ok(RangeProof {
        a,
        s,
        t1: t1_commit,
        t2: t2_commit,
        t_hat,
        tau_x,
        mu,
        ipa_proof,
    })
}
