//! Inner Product Argument prover implementation

use crate::InnerProductProof;
use bulletproofs_core::{
    params::{folding_rounds, MAX_DEPTH},
    utils::inner_product,
    BulletproofsError, BulletproofsResult, MultiscalarMul, RistrettoPoint, Scalar, Transcript,
    TranscriptProtocol, VartimeMultiscalarMul,
};
use std::iter;
use tracing::instrument;

/// Create an inner product proof
///
/// Proves knowledge of vectors `a` and `b` such that
/// `P = <a, G> + <b, H'> + <a, b> * Q`, where `H'_i = h_factors[i] * H_i`.
/// The factors let callers prove against rescaled `H` generators without
/// computing them first; pass all-ones to use `H` directly.
///
/// All vectors must share one power-of-two length. `L` and `R` involve the
/// secret vectors and are computed in constant time.
#[instrument(skip_all, level = "debug", fields(n = a_vec.len()))]
pub fn prove(
    transcript: &mut Transcript,
    q: &RistrettoPoint,
    h_factors: &[Scalar],
    mut g_vec: Vec<RistrettoPoint>,
    mut h_vec: Vec<RistrettoPoint>,
    mut a_vec: Vec<Scalar>,
    mut b_vec: Vec<Scalar>,
) -> BulletproofsResult<InnerProductProof> {
    let mut n = a_vec.len();
    for len in [b_vec.len(), g_vec.len(), h_vec.len(), h_factors.len()] {
        if len != n {
            return Err(BulletproofsError::VectorLengthMismatch {
                expected: n,
                actual: len,
            });
        }
    }
    if !n.is_power_of_two() {
        return Err(BulletproofsError::InvalidParameters(format!(
            "inner product length {} is not a power of two",
            n
        )));
    }
    let rounds = folding_rounds(n);
    if rounds > MAX_DEPTH {
        return Err(BulletproofsError::InvalidParameters(format!(
            "{} folding rounds exceed the maximum depth {}",
            rounds, MAX_DEPTH
        )));
    }

    transcript.innerproduct_domain_sep(n as u64);

    let mut l_vec = Vec::with_capacity(rounds);
    let mut r_vec = Vec::with_capacity(rounds);

    let mut a = &mut a_vec[..];
    let mut b = &mut b_vec[..];
    let mut g = &mut g_vec[..];
    let mut h = &mut h_vec[..];

    // The first round folds the H factors into the generators
    if n != 1 {
        n /= 2;
        let (a_l, a_r) = a.split_at_mut(n);
        let (b_l, b_r) = b.split_at_mut(n);
        let (g_l, g_r) = g.split_at_mut(n);
        let (h_l, h_r) = h.split_at_mut(n);

        let c_l = inner_product(a_l, b_r)?;
        let c_r = inner_product(a_r, b_l)?;

        // L = <a_L, G_R> + <b_R, H'_L> + c_L * Q
        let l = RistrettoPoint::multiscalar_mul(
            a_l.iter()
                .copied()
                .chain(b_r.iter().zip(&h_factors[..n]).map(|(b_i, y_i)| b_i * y_i))
                .chain(iter::once(c_l)),
            g_r.iter().chain(h_l.iter()).chain(iter::once(q)),
        )
        .compress();

        // R = <a_R, G_L> + <b_L, H'_R> + c_R * Q
        let r = RistrettoPoint::multiscalar_mul(
            a_r.iter()
                .copied()
                .chain(b_l.iter().zip(&h_factors[n..]).map(|(b_i, y_i)| b_i * y_i))
                .chain(iter::once(c_r)),
            g_l.iter().chain(h_r.iter()).chain(iter::once(q)),
        )
        .compress();

        transcript.append_point(b"L", &l);
        transcript.append_point(b"R", &r);
        l_vec.push(l);
        r_vec.push(r);

        let u = transcript.challenge_scalar(b"u");
        let u_inv = u.invert();

        for i in 0..n {
            a_l[i] = a_l[i] * u + u_inv * a_r[i];
            b_l[i] = b_l[i] * u_inv + u * b_r[i];
            g_l[i] = RistrettoPoint::vartime_multiscalar_mul([u_inv, u], [g_l[i], g_r[i]]);
            h_l[i] = RistrettoPoint::vartime_multiscalar_mul(
                [u * h_factors[i], u_inv * h_factors[n + i]],
                [h_l[i], h_r[i]],
            );
        }

        a = a_l;
        b = b_l;
        g = g_l;
        h = h_l;
    }

    while n != 1 {
        n /= 2;
        let (a_l, a_r) = a.split_at_mut(n);
        let (b_l, b_r) = b.split_at_mut(n);
        let (g_l, g_r) = g.split_at_mut(n);
        let (h_l, h_r) = h.split_at_mut(n);

        let c_l = inner_product(a_l, b_r)?;
        let c_r = inner_product(a_r, b_l)?;

        let l = RistrettoPoint::multiscalar_mul(
            a_l.iter().chain(b_r.iter()).chain(iter::once(&c_l)),
            g_r.iter().chain(h_l.iter()).chain(iter::once(q)),
        )
        .compress();

        let r = RistrettoPoint::multiscalar_mul(
            a_r.iter().chain(b_l.iter()).chain(iter::once(&c_r)),
            g_l.iter().chain(h_r.iter()).chain(iter::once(q)),
        )
        .compress();

        transcript.append_point(b"L", &l);
        transcript.append_point(b"R", &r);
        l_vec.push(l);
        r_vec.push(r);

        let u = transcript.challenge_scalar(b"u");
        let u_inv = u.invert();

        for i in 0..n {
            a_l[i] = a_l[i] * u + u_inv * a_r[i];
            b_l[i] = b_l[i] * u_inv + u * b_r[i];
            g_l[i] = RistrettoPoint::vartime_multiscalar_mul([u_inv, u], [g_l[i], g_r[i]]);
            h_l[i] = RistrettoPoint::vartime_multiscalar_mul([u, u_inv], [h_l[i], h_r[i]]);
        }

        a = a_l;
        b = b_l;
        g = g_l;
        h = h_l;
    }

    Ok(InnerProductProof {
        l_vec,
        r_vec,
        a: a[0],
        b: b[0],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletproofs_core::{bulletproofs_transcript, GeneratorSet};

    fn setup(n: usize) -> (GeneratorSet, Vec<Scalar>, Vec<Scalar>) {
        let gens = GeneratorSet::new(GeneratorSet::standard_blinding_generator(), 2 * n, 1).unwrap();
        let a = (0..n).map(|i| Scalar::from(i as u64 + 1)).collect();
        let b = (0..n).map(|i| Scalar::from(i as u64 + 5)).collect();
        (gens, a, b)
    }

    fn run(n: usize) -> BulletproofsResult<InnerProductProof> {
        let (gens, a, b) = setup(n);
        let mut transcript = bulletproofs_transcript(b"ipa_test");
        prove(
            &mut transcript,
            gens.u_generator(),
            &vec![Scalar::ONE; n],
            gens.g_vec(n)?.to_vec(),
            gens.h_vec(n)?.to_vec(),
            a,
            b,
        )
    }

    #[test]
    fn test_ipa_prove_rounds() {
        assert_eq!(run(1).unwrap().num_rounds(), 0);
        assert_eq!(run(4).unwrap().num_rounds(), 2);
        assert_eq!(run(8).unwrap().num_rounds(), 3);
    }

    #[test]
    fn test_ipa_prove_deterministic() {
        assert_eq!(run(8).unwrap(), run(8).unwrap());
    }

    #[test]
    fn test_ipa_prove_non_power_of_two() {
        assert!(matches!(run(3), Err(BulletproofsError::InvalidParameters(_))));
    }

    #[test]
    fn test_ipa_prove_empty_vectors() {
        assert!(run(0).is_err());
    }

    #[test]
    fn test_ipa_prove_mismatched_lengths() {
        let (gens, a, b) = setup(4);
        let mut transcript = bulletproofs_transcript(b"ipa_test");
        let result = prove(
            &mut transcript,
            gens.u_generator(),
            &[Scalar::ONE; 4],
            gens.g_vec(4).unwrap().to_vec(),
            gens.h_vec(4).unwrap().to_vec(),
            a,
            b[..2].to_vec(),
        );
        assert_eq!(
            result,
            Err(BulletproofsError::VectorLengthMismatch { expected: 4, actual: 2 })
        );
    }
}
