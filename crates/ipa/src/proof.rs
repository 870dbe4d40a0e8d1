//! Inner Product Argument proof structure

use bulletproofs_core::{
    params::{ipa_proof_size, IPA_ROUND_SIZE, MAX_DEPTH, POINT_SIZE, SCALAR_SIZE},
    read_point, read_scalar, BulletproofsError, BulletproofsResult, CompressedRistretto, Scalar,
};
use serde::{Deserialize, Serialize};

/// An inner product argument proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerProductProof {
    /// L values from each folding round (log_2(n) elements)
    pub l_vec: Vec<CompressedRistretto>,
    /// R values from each folding round (log_2(n) elements)
    pub r_vec: Vec<CompressedRistretto>,
    /// Final scalar value a
    pub a: Scalar,
    /// Final scalar value b
    pub b: Scalar,
}

impl InnerProductProof {
    /// Get the number of folding rounds
    pub fn num_rounds(&self) -> usize {
        self.l_vec.len()
    }

    /// Validate proof structure
    pub fn validate_structure(&self) -> BulletproofsResult<()> {
        if self.l_vec.len() != self.r_vec.len() || self.l_vec.len() > MAX_DEPTH {
            return Err(BulletproofsError::VerificationFailed);
        }
        Ok(())
    }

    /// Get proof size in bytes
    pub fn serialized_size(&self) -> usize {
        ipa_proof_size(self.num_rounds())
    }

    /// Append the proof to `out`: `(L_k, R_k)` pairs followed by `a, b`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for (l, r) in self.l_vec.iter().zip(self.r_vec.iter()) {
            out.extend_from_slice(l.as_bytes());
            out.extend_from_slice(r.as_bytes());
        }
        out.extend_from_slice(self.a.as_bytes());
        out.extend_from_slice(self.b.as_bytes());
    }

    /// Serialize proof to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.serialized_size());
        self.write_to(&mut result);
        result
    }

    /// Deserialize proof from bytes; the round count follows from the length
    pub fn from_bytes(bytes: &[u8]) -> BulletproofsResult<Self> {
        let body = bytes
            .len()
            .checked_sub(2 * SCALAR_SIZE)
            .ok_or(BulletproofsError::VerificationFailed)?;
        if body % IPA_ROUND_SIZE != 0 {
            return Err(BulletproofsError::VerificationFailed);
        }
        let rounds = body / IPA_ROUND_SIZE;
        if rounds > MAX_DEPTH {
            return Err(BulletproofsError::VerificationFailed);
        }

        let mut l_vec = Vec::with_capacity(rounds);
        let mut r_vec = Vec::with_capacity(rounds);
        for round in bytes[..body].chunks_exact(IPA_ROUND_SIZE) {
            l_vec.push(read_point(&round[..POINT_SIZE])?);
            r_vec.push(read_point(&round[POINT_SIZE..])?);
        }

        let a = read_scalar(&bytes[body..body + SCALAR_SIZE])?;
        let b = read_scalar(&bytes[body + SCALAR_SIZE..])?;

        Ok(Self { l_vec, r_vec, a, b })
    }
}
