//! Circuit proof verification, single and batched
//!
//! With compressed weights `w_L, w_R, w_O, w_V, w_c` and
//! `delta = <y^{-n} o w_R, w_L>`, each proof contributes the polynomial check
//!
//! ```text
//! t_hat * B + tau_x * B~ = x^2 (<w_V, V> + (w_c + delta) * B) + sum_{i in 1,3..6} x^i * T_i
//! ```
//!
//! and the inner product argument for `l(x)`, `r(x)`. As for range proofs,
//! the first is scaled by a pseudorandom `c`, the pair by a pseudorandom
//! `r`, and a whole batch is checked with one multiscalar multiplication.

use crate::{
    proof::{replay_challenges, statement_transcript, CircuitProof},
    Circuit,
};
use bulletproofs_core::{
    bulletproofs_transcript, decompress_point,
    params::{folding_rounds, MAX_DEPTH},
    BulletproofsError, BulletproofsResult, GeneratorSet, IsIdentity, PedersenCommitment,
    RistrettoPoint, Scalar, ScratchSpace, TranscriptProtocol,
};
use tracing::{debug, instrument};

/// One proof and its public inputs, for [`verify_multi`]
#[derive(Debug, Clone, Copy)]
pub struct CircuitProofInstance<'a> {
    /// Circuit the proof is over
    pub circuit: &'a Circuit,
    /// Serialized proof
    pub proof: &'a [u8],
    /// Commitments to the circuit's committed values
    pub commitments: &'a [PedersenCommitment],
    /// Context bytes the prover committed to
    pub extra_commit: &'a [u8],
}

/// Verify a single circuit proof
pub fn verify(
    gens: &GeneratorSet,
    scratch: &mut ScratchSpace,
    circuit: &Circuit,
    proof: &[u8],
    commitments: &[PedersenCommitment],
    value_gen: &RistrettoPoint,
    extra_commit: &[u8],
) -> BulletproofsResult<()> {
    let instance = CircuitProofInstance {
        circuit,
        proof,
        commitments,
        extra_commit,
    };
    verify_multi(gens, scratch, &[instance], value_gen)
}

/// Verify a batch of circuit proofs whose circuits share a gate count.
///
/// Succeeds only if every proof is valid. Temporaries come from `scratch`
/// and are released before returning.
#[instrument(skip_all, level = "debug", fields(n_proofs = instances.len()))]
pub fn verify_multi(
    gens: &GeneratorSet,
    scratch: &mut ScratchSpace,
    instances: &[CircuitProofInstance<'_>],
    value_gen: &RistrettoPoint,
) -> BulletproofsResult<()> {
    let first = instances.first().ok_or_else(|| {
        BulletproofsError::InvalidParameters("no proofs to verify".to_string())
    })?;
    let n = first.circuit.n_gates();
    if !n.is_power_of_two() || folding_rounds(n) > MAX_DEPTH {
        return Err(BulletproofsError::InvalidParameters(format!(
            "unsupported gate count {}",
            n
        )));
    }
    let rounds = folding_rounds(n);
    let mut max_rows = 0;
    let mut max_commits = 0;
    for instance in instances {
        if instance.circuit.n_gates() != n {
            return Err(BulletproofsError::InvalidParameters(
                "circuits in a batch must have the same gate count".to_string(),
            ));
        }
        if instance.commitments.len() != instance.circuit.n_commits() {
            return Err(BulletproofsError::VectorLengthMismatch {
                expected: instance.circuit.n_commits(),
                actual: instance.commitments.len(),
            });
        }
        max_rows = max_rows.max(instance.circuit.total_rows());
        max_commits = max_commits.max(instance.circuit.n_commits());
    }

    let g = gens.g_vec(n)?;
    let h = gens.h_vec(n)?;

    let digests: Vec<[u8; 32]> = instances.iter().map(|i| i.circuit.digest()).collect();
    let mut batch = bulletproofs_transcript(b"circuit batch");
    batch.append_u64(b"n_proofs", instances.len() as u64);
    for (instance, digest) in instances.iter().zip(&digests) {
        batch.append_message(b"proof", instance.proof);
        batch.append_message(b"circuit", digest);
        for commitment in instance.commitments {
            batch.append_point(b"V", commitment.as_compressed());
        }
        batch.append_extra_commit(instance.extra_commit);
    }

    // gh: 2n | s: n | w: 3n | z powers: max_rows | w_V: max_commits
    let wv_offset = 6 * n + max_rows;
    let mut frame = scratch.frame();
    let buf = frame.alloc_scalars(wv_offset + max_commits)?;
    let mut value_coeff = Scalar::ZERO;
    let mut blinding_coeff = Scalar::ZERO;
    let mut u_coeff = Scalar::ZERO;

    for (instance, digest) in instances.iter().zip(&digests) {
        let c = batch.challenge_scalar(b"c");
        let weight = batch.challenge_scalar(b"r");
        let circuit = instance.circuit;

        let proof = CircuitProof::from_bytes(instance.proof)?;
        if proof.ipa_proof.num_rounds() != rounds {
            return Err(BulletproofsError::VerificationFailed);
        }

        let mut transcript =
            statement_transcript(circuit, digest, instance.commitments, instance.extra_commit);
        let ch = replay_challenges(&mut transcript, &proof)?;
        let mut challenges = [Scalar::ZERO; MAX_DEPTH];
        let challenges = &mut challenges[..rounds];
        ipa::replay_challenges(&proof.ipa_proof, n, &mut transcript, challenges)?;

        let (x, y, z) = (ch.x, ch.y, ch.z);
        let (a, b) = (proof.ipa_proof.a, proof.ipa_proof.b);

        let (w_c, delta) = {
            let (gh, rest) = frame.scalars_mut(buf).split_at_mut(2 * n);
            let (s, rest) = rest.split_at_mut(n);
            let (w, rest) = rest.split_at_mut(3 * n);
            let (zp, w_v) = rest.split_at_mut(max_rows);
            let w_c = circuit.compress_weights(
                &z,
                &mut zp[..circuit.total_rows()],
                w,
                &mut w_v[..circuit.n_commits()],
            );
            ipa::compute_s_scalars(challenges, s);

            let (w_l, rest) = w.split_at(n);
            let (w_r, w_o) = rest.split_at(n);
            let y_inv = y.invert();
            let mut y_inv_i = Scalar::ONE;
            let mut delta = Scalar::ZERO;
            for i in 0..n {
                delta += y_inv_i * w_r[i] * w_l[i];
                gh[i] += weight * (x * y_inv_i * w_r[i] - a * s[i]);
                gh[n + i] +=
                    weight * (y_inv_i * (x * w_l[i] + w_o[i] - b * s[n - 1 - i]) - Scalar::ONE);
                y_inv_i *= y_inv;
            }
            (w_c, delta)
        };

        let x2 = x * x;
        let x3 = x2 * x;
        value_coeff += weight * c * (x2 * (w_c + delta) - proof.t_hat);
        blinding_coeff += weight * (-proof.mu - c * proof.tau_x);
        u_coeff += weight * ch.w * (proof.t_hat - a * b);

        for (j, commitment) in instance.commitments.iter().enumerate() {
            let w_vj = frame.scalars(buf)[wv_offset + j];
            frame.push_term(weight * c * x2 * w_vj, commitment.decompress()?)?;
        }

        frame.push_term(weight * x, decompress_point(&proof.a_i)?)?;
        frame.push_term(weight * x2, decompress_point(&proof.a_o)?)?;
        frame.push_term(weight * x3, decompress_point(&proof.s)?)?;

        let x4 = x2 * x2;
        let t_powers = [x, x3, x4, x4 * x, x4 * x2];
        for (x_i, t_commit) in t_powers
            .iter()
            .zip([&proof.t1, &proof.t3, &proof.t4, &proof.t5, &proof.t6])
        {
            frame.push_term(weight * c * x_i, decompress_point(t_commit)?)?;
        }

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
        debug!("circuit proof batch equation does not hold");
        Err(BulletproofsError::VerificationFailed)
    }
}
