//! Circuit proof structure, serialization and the shared statement transcript

use crate::Circuit;
use bulletproofs_core::{
    bulletproofs_transcript,
    params::{ipa_proof_size, CIRCUIT_HEADER_SIZE, POINT_SIZE, SCALAR_SIZE},
    read_point, read_scalar, BulletproofsError, BulletproofsResult, CompressedRistretto,
    PedersenCommitment, Scalar, Transcript, TranscriptProtocol,
};
use ipa::InnerProductProof;
use serde::{Deserialize, Serialize};

/// A zero-knowledge proof that committed values satisfy a circuit
///
/// Serialized as `A_I, A_O, S, T1, T3, T4, T5, T6, t_hat, tau_x, mu`
/// followed by the inner product proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitProof {
    /// Commitment to the input wires `a_L`, `a_R`
    pub a_i: CompressedRistretto,
    /// Commitment to the output wires `a_O`
    pub a_o: CompressedRistretto,
    /// Commitment to the blinding vectors `s_L`, `s_R`
    pub s: CompressedRistretto,
    /// Commitments to the coefficients of `t(X)` other than `t2`
    pub t1: CompressedRistretto,
    pub t3: CompressedRistretto,
    pub t4: CompressedRistretto,
    pub t5: CompressedRistretto,
    pub t6: CompressedRistretto,
    /// Evaluation `t(x) = <l(x), r(x)>`
    pub t_hat: Scalar,
    /// Blinding factor of `t_hat`
    pub tau_x: Scalar,
    /// Blinding factor of the wire commitments at `x`
    pub mu: Scalar,
    pub ipa_proof: InnerProductProof,
}

impl CircuitProof {
    /// Size in bytes of a proof with `rounds` inner-product rounds
    pub fn serialized_size_for(rounds: usize) -> usize {
        CIRCUIT_HEADER_SIZE + ipa_proof_size(rounds)
    }

    pub fn serialized_size(&self) -> usize {
        Self::serialized_size_for(self.ipa_proof.num_rounds())
    }

    fn points(&self) -> [&CompressedRistretto; 8] {
        [
            &self.a_i, &self.a_o, &self.s, &self.t1, &self.t3, &self.t4, &self.t5, &self.t6,
        ]
    }

    /// Serialize the proof to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.serialized_size());
        for point in self.points() {
            bytes.extend_from_slice(point.as_bytes());
        }
        for scalar in [&self.t_hat, &self.tau_x, &self.mu] {
            bytes.extend_from_slice(scalar.as_bytes());
        }
        self.ipa_proof.write_to(&mut bytes);
        bytes
    }

    /// Write the proof into `out`, returning the number of bytes written
    pub fn write_to(&self, out: &mut [u8]) -> BulletproofsResult<usize> {
        let needed = self.serialized_size();
        if out.len() < needed {
            return Err(BulletproofsError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        out[..needed].copy_from_slice(&self.to_bytes());
        Ok(needed)
    }

    /// Deserialize a proof; every malformation is a verification failure
    pub fn from_bytes(bytes: &[u8]) -> BulletproofsResult<Self> {
        if bytes.len() < CIRCUIT_HEADER_SIZE {
            return Err(BulletproofsError::VerificationFailed);
        }
        let point_at = |i: usize| read_point(&bytes[i * POINT_SIZE..(i + 1) * POINT_SIZE]);
        let scalar_at = |i: usize| {
            let start = 8 * POINT_SIZE + i * SCALAR_SIZE;
            read_scalar(&bytes[start..start + SCALAR_SIZE])
        };

        Ok(Self {
            a_i: point_at(0)?,
            a_o: point_at(1)?,
            s: point_at(2)?,
            t1: point_at(3)?,
            t3: point_at(4)?,
            t4: point_at(5)?,
            t5: point_at(6)?,
            t6: point_at(7)?,
            t_hat: scalar_at(0)?,
            tau_x: scalar_at(1)?,
            mu: scalar_at(2)?,
            ipa_proof: InnerProductProof::from_bytes(&bytes[CIRCUIT_HEADER_SIZE..])?,
        })
    }
}

/// Transcript with the statement of a circuit proof absorbed
pub(crate) fn statement_transcript(
    circuit: &Circuit,
    digest: &[u8; 32],
    commitments: &[PedersenCommitment],
    extra_commit: &[u8],
) -> Transcript {
    let mut transcript = bulletproofs_transcript(b"circuit");
    transcript.circuit_domain_sep(
        circuit.n_gates() as u64,
        circuit.n_commits() as u64,
        circuit.n_bits() as u64,
        circuit.n_constraints() as u64,
    );
    transcript.append_message(b"circuit", digest);
    transcript.append_extra_commit(extra_commit);
    for commitment in commitments {
        transcript.append_point(b"V", commitment.as_compressed());
    }
    transcript
}

/// Public context the prover's nonce derivation is bound to
pub(crate) fn nonce_context(digest: &[u8; 32], commitments: &[PedersenCommitment]) -> Vec<u8> {
    let mut context = Vec::with_capacity(32 + commitments.len() * POINT_SIZE);
    context.extend_from_slice(digest);
    for commitment in commitments {
        context.extend_from_slice(commitment.as_compressed().as_bytes());
    }
    context
}

/// Challenges of one circuit proof, replayed from its public data
#[derive(Debug, Clone, Copy)]
pub(crate) struct CircuitChallenges {
    pub y: Scalar,
    pub z: Scalar,
    pub x: Scalar,
    pub w: Scalar,
}

/// Replay `y, z, x, w` on a statement transcript, rejecting identity points
pub(crate) fn replay_challenges(
    transcript: &mut Transcript,
    proof: &CircuitProof,
) -> BulletproofsResult<CircuitChallenges> {
    transcript.validate_and_append_point(b"A_I", &proof.a_i)?;
    transcript.validate_and_append_point(b"A_O", &proof.a_o)?;
    transcript.validate_and_append_point(b"S", &proof.s)?;
    let y = transcript.challenge_scalar(b"y");
    let z = transcript.challenge_scalar(b"z");

    transcript.validate_and_append_point(b"T1", &proof.t1)?;
    transcript.validate_and_append_point(b"T3", &proof.t3)?;
    transcript.validate_and_append_point(b"T4", &proof.t4)?;
    transcript.validate_and_append_point(b"T5", &proof.t5)?;
    transcript.validate_and_append_point(b"T6", &proof.t6)?;
    let x = transcript.challenge_scalar(b"x");

    transcript.append_scalar(b"t_hat", &proof.t_hat);
    transcript.append_scalar(b"tau_x", &proof.tau_x);
    transcript.append_scalar(b"mu", &proof.mu);
    let w = transcript.challenge_scalar(b"w");

    Ok(CircuitChallenges { y, z, x, w })
}
