//! Range proof structure, serialization and the shared statement transcript

use bulletproofs_core::{
    params::{
        folding_rounds, ipa_proof_size, MAX_DEPTH, MAX_NBITS, POINT_SIZE, RANGEPROOF_HEADER_SIZE,
        SCALAR_SIZE,
    },
    bulletproofs_transcript, read_point, read_scalar, BulletproofsError, BulletproofsResult,
    CompressedRistretto, PedersenCommitment, Scalar, Transcript, TranscriptProtocol,
};
use ipa::InnerProductProof;
use serde::{Deserialize, Serialize};

/// An aggregate range proof over one or more Pedersen commitments
///
/// Serialized as `A, S, T1, T2, t_hat, tau_x, mu` followed by the inner
/// product proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    /// Commitment to the bit vectors `a_L`, `a_R`
    pub a: CompressedRistretto,
    /// Commitment to the blinding vectors `s_L`, `s_R`
    pub s: CompressedRistretto,
    /// Commitment to the linear coefficient of `t(X)`
    pub t1: CompressedRistretto,
    /// Commitment to the quadratic coefficient of `t(X)`
    pub t2: CompressedRistretto,
    /// Evaluation `t(x) = <l(x), r(x)>`
    pub t_hat: Scalar,
    /// Blinding factor of `t_hat`
    pub tau_x: Scalar,
    /// Blinding factor of `A + x * S`
    pub mu: Scalar,
    /// Inner product argument for `l(x)` and `r(x)`
    pub ipa_proof: InnerProductProof,
}

impl RangeProof {
    /// Size in bytes of a proof with `rounds` inner-product rounds
    pub fn serialized_size_for(rounds: usize) -> usize {
        RANGEPROOF_HEADER_SIZE + ipa_proof_size(rounds)
    }

    /// Size in bytes of this proof
    pub fn serialized_size(&self) -> usize {
        Self::serialized_size_for(self.ipa_proof.num_rounds())
    }

    /// Serialize the proof to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.serialized_size());
        for point in [&self.a, &self.s, &self.t1, &self.t2] {
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
        if bytes.len() < RANGEPROOF_HEADER_SIZE {
            return Err(BulletproofsError::VerificationFailed);
        }
        let point_at = |i: usize| read_point(&bytes[i * POINT_SIZE..(i + 1) * POINT_SIZE]);
        let scalar_at = |i: usize| {
            let start = 4 * POINT_SIZE + i * SCALAR_SIZE;
            read_scalar(&bytes[start..start + SCALAR_SIZE])
        };

        Ok(Self {
            a: point_at(0)?,
            s: point_at(1)?,
            t1: point_at(2)?,
            t2: point_at(3)?,
            t_hat: scalar_at(0)?,
            tau_x: scalar_at(1)?,
            mu: scalar_at(2)?,
            ipa_proof: InnerProductProof::from_bytes(&bytes[RANGEPROOF_HEADER_SIZE..])?,
        })
    }
}

/// Dimensions of an aggregate range proof
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RangeShape {
    pub nbits: usize,
    pub n_commits: usize,
    /// `next_pow2(nbits * n_commits)`, the inner-product vector length
    pub padded_len: usize,
    pub rounds: usize,
}

impl RangeShape {
    pub fn new(nbits: usize, n_commits: usize) -> BulletproofsResult<Self> {
        if n_commits == 0 {
            return Err(BulletproofsError::InvalidParameters(
                "at least one commitment is required".to_string(),
            ));
        }
        if nbits == 0 || nbits > MAX_NBITS {
            return Err(BulletproofsError::InvalidParameters(format!(
                "bit width {} outside 1..={}",
                nbits, MAX_NBITS
            )));
        }
        let padded_len = nbits
            .checked_mul(n_commits)
            .and_then(usize::checked_next_power_of_two)
            .ok_or_else(|| BulletproofsError::InvalidParameters("too many commitments".to_string()))?;
        let rounds = folding_rounds(padded_len);
        if rounds > MAX_DEPTH {
            return Err(BulletproofsError::InvalidParameters(format!(
                "{} inner-product rounds exceed the maximum depth {}",
                rounds, MAX_DEPTH
            )));
        }

        Ok(Self {
            nbits,
            n_commits,
            padded_len,
            rounds,
        })
    }

    /// Number of positions carrying real bits
    pub fn real_len(&self) -> usize {
        self.nbits * self.n_commits
    }

    /// `2^nbits - 1`
    pub fn range_mask(&self) -> u64 {
        u64::MAX >> (64 - self.nbits)
    }

    /// Reject a minimum-value list whose length does not match the commitments
    pub fn check_min_values(&self, min_values: Option<&[u64]>) -> BulletproofsResult<()> {
        match min_values {
            Some(mins) if mins.len() != self.n_commits => {
                Err(BulletproofsError::VectorLengthMismatch {
                    expected: self.n_commits,
                    actual: mins.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Minimum value of commitment `j`, zero when none were given
pub(crate) fn min_value_at(min_values: Option<&[u64]>, j: usize) -> u64 {
    min_values.and_then(|mins| mins.get(j)).copied().unwrap_or(0)
}

/// Transcript with the statement of a range proof absorbed
pub(crate) fn statement_transcript(
    nbits: usize,
    commitments: &[PedersenCommitment],
    min_values: Option<&[u64]>,
    extra_commit: &[u8],
) -> Transcript {
    let mut transcript = bulletproofs_transcript(b"rangeproof");
    transcript.rangeproof_domain_sep(nbits as u64, commitments.len() as u64);
    transcript.append_extra_commit(extra_commit);
    for (j, commitment) in commitments.iter().enumerate() {
        transcript.append_point(b"V", commitment.as_compressed());
        transcript.append_u64(b"min", min_value_at(min_values, j));
    }
    transcript
}

/// Public context the prover's nonce derivation is bound to
pub(crate) fn nonce_context(
    nbits: usize,
    commitments: &[PedersenCommitment],
    min_values: Option<&[u64]>,
) -> Vec<u8> {
    let mut context = Vec::with_capacity(8 + commitments.len() * (POINT_SIZE + 8));
    context.extend_from_slice(&(nbits as u64).to_le_bytes());
    for (j, commitment) in commitments.iter().enumerate() {
        context.extend_from_slice(commitment.as_compressed().as_bytes());
        context.extend_from_slice(&min_value_at(min_values, j).to_le_bytes());
    }
    context
}

/// Challenges of one range proof, replayed from its public data
#[derive(Debug, Clone, Copy)]
pub(crate) struct RangeChallenges {
    pub y: Scalar,
    pub z: Scalar,
    pub x: Scalar,
    pub w: Scalar,
}

/// Replay `y, z, x, w` on a statement transcript, rejecting identity points
pub(crate) fn replay_challenges(
    transcript: &mut Transcript,
    proof: &RangeProof,
) -> BulletproofsResult<RangeChallenges> {
    transcript.validate_and_append_point(b"A", &proof.a)?;
    transcript.validate_and_append_point(b"S", &proof.s)?;
    let y = transcript.challenge_scalar(b"y");
    let z = transcript.challenge_scalar(b"z");

    transcript.validate_and_append_point(b"T1", &proof.t1)?;
    transcript.validate_and_append_point(b"T2", &proof.t2)?;
    let x = transcript.challenge_scalar(b"x");

    transcript.append_scalar(b"t_hat", &proof.t_hat);
    transcript.append_scalar(b"tau_x", &proof.tau_x);
    transcript.append_scalar(b"mu", &proof.mu);
    let w = transcript.challenge_scalar(b"w");

    Ok(RangeChallenges { y, z, x, w })
}
