//! Pedersen commitments and point decoding helpers

use crate::{BulletproofsError, BulletproofsResult, GeneratorSet};
use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use serde::{Deserialize, Serialize};

/// A Pedersen commitment `v * value_gen + r * B` in compressed form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedersenCommitment(pub CompressedRistretto);

impl PedersenCommitment {
    /// Commit to `value` under `blinding`
    pub fn new(
        generators: &GeneratorSet,
        value: u64,
        blinding: &Scalar,
        value_gen: &RistrettoPoint,
    ) -> Self {
        Self::from_point(&generators.commit(&Scalar::from(value), blinding, value_gen))
    }

    /// Wrap an already computed commitment point
    pub fn from_point(point: &RistrettoPoint) -> Self {
        Self(point.compress())
    }

    /// Parse a commitment from its 32-byte encoding
    pub fn from_bytes(bytes: &[u8]) -> BulletproofsResult<Self> {
        CompressedRistretto::from_slice(bytes)
            .map(Self)
            .map_err(|_| BulletproofsError::InvalidParameters("commitment must be 32 bytes".to_string()))
    }

    /// The compressed point
    pub fn as_compressed(&self) -> &CompressedRistretto {
        &self.0
    }

    /// The 32-byte encoding
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Decompress the commitment point
    pub fn decompress(&self) -> BulletproofsResult<RistrettoPoint> {
        decompress_point(&self.0)
    }
}

impl From<RistrettoPoint> for PedersenCommitment {
    fn from(point: RistrettoPoint) -> Self {
        Self::from_point(&point)
    }
}

/// Decompress a point taken from a proof or commitment.
///
/// Undecodable points are a verification failure, not a distinct error.
pub fn decompress_point(point: &CompressedRistretto) -> BulletproofsResult<RistrettoPoint> {
    point.decompress().ok_or(BulletproofsError::VerificationFailed)
}

/// Read a canonical scalar from a 32-byte slice
pub fn read_scalar(bytes: &[u8]) -> BulletproofsResult<Scalar> {
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| BulletproofsError::VerificationFailed)?;
    Option::from(Scalar::from_canonical_bytes(array)).ok_or(BulletproofsError::VerificationFailed)
}

/// Read a compressed point from a 32-byte slice
pub fn read_point(bytes: &[u8]) -> BulletproofsResult<CompressedRistretto> {
    CompressedRistretto::from_slice(bytes).map_err(|_| BulletproofsError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_roundtrip() {
        let gens = GeneratorSet::new(GeneratorSet::standard_blinding_generator(), 2, 1).unwrap();
        let value_gen = GeneratorSet::standard_value_generator();
        let commitment = PedersenCommitment::new(&gens, 42, &Scalar::from(9u64), &value_gen);

        let parsed = PedersenCommitment::from_bytes(&commitment.to_bytes()).unwrap();
        assert_eq!(parsed, commitment);
        assert_eq!(
            parsed.decompress().unwrap(),
            value_gen * Scalar::from(42u64) + gens.blinding_generator() * Scalar::from(9u64)
        );
    }

    #[test]
    fn test_read_scalar_rejects_non_canonical() {
        assert_eq!(read_scalar(&[0xff; 32]), Err(BulletproofsError::VerificationFailed));
        assert_eq!(read_scalar(&[0u8; 31]), Err(BulletproofsError::VerificationFailed));
        assert_eq!(read_scalar(&Scalar::from(5u64).to_bytes()).unwrap(), Scalar::from(5u64));
    }

    #[test]
    fn test_bad_point_rejected() {
        let bogus = CompressedRistretto([0xff; 32]);
        assert_eq!(decompress_point(&bogus), Err(BulletproofsError::VerificationFailed));
    }
}
