//! Transcript management for Fiat-Shamir heuristic

use crate::{BulletproofsError, BulletproofsResult};
use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use merlin::Transcript;

/// Extension trait for Transcript to add Bulletproofs-specific methods
pub trait TranscriptProtocol {
    /// Domain separator for an aggregated range proof
    fn rangeproof_domain_sep(&mut self, nbits: u64, n_commits: u64);

    /// Domain separator for an arithmetic-circuit proof
    fn circuit_domain_sep(&mut self, n_gates: u64, n_commits: u64, n_bits: u64, n_constraints: u64);

    /// Domain separator for the inner-product argument
    fn innerproduct_domain_sep(&mut self, n: u64);

    /// Commit to application-supplied context bytes
    fn append_extra_commit(&mut self, extra_commit: &[u8]);

    /// Append a group element to the transcript
    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto);

    /// Append a group element, rejecting the identity
    fn validate_and_append_point(
        &mut self,
        label: &'static [u8],
        point: &CompressedRistretto,
    ) -> BulletproofsResult<()>;

    /// Append a scalar to the transcript
    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar);

    /// Challenge scalar from transcript
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar;
}

impl TranscriptProtocol for Transcript {
    fn rangeproof_domain_sep(&mut self, nbits: u64, n_commits: u64) {
        self.append_message(b"dom-sep", b"rangeproof v1");
        self.append_u64(b"nbits", nbits);
        self.append_u64(b"n_commits", n_commits);
    }

    fn circuit_domain_sep(&mut self, n_gates: u64, n_commits: u64, n_bits: u64, n_constraints: u64) {
        self.append_message(b"dom-sep", b"circuit v1");
        self.append_u64(b"n_gates", n_gates);
        self.append_u64(b"n_commits", n_commits);
        self.append_u64(b"n_bits", n_bits);
        self.append_u64(b"n_constraints", n_constraints);
    }

    fn innerproduct_domain_sep(&mut self, n: u64) {
        self.append_message(b"dom-sep", b"ipp v1");
        self.append_u64(b"n", n);
    }

    fn append_extra_commit(&mut self, extra_commit: &[u8]) {
        self.append_message(b"extra_commit", extra_commit);
    }

    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto) {
        self.append_message(label, point.as_bytes());
    }

    fn validate_and_append_point(
        &mut self,
        label: &'static [u8],
        point: &CompressedRistretto,
    ) -> BulletproofsResult<()> {
        // The identity encodes as all zeroes
        if point.as_bytes() == &[0u8; 32] {
            return Err(BulletproofsError::VerificationFailed);
        }
        self.append_message(label, point.as_bytes());
        Ok(())
    }

    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar) {
        self.append_message(label, scalar.as_bytes());
    }

    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        let mut buf = [0u8; 64];
        self.challenge_bytes(label, &mut buf);
        Scalar::from_bytes_mod_order_wide(&buf)
    }
}

/// Create a new transcript for Bulletproofs with domain separation
pub fn bulletproofs_transcript(domain_label: &'static [u8]) -> Transcript {
    let mut transcript = Transcript::new(b"Bulletproofs");
    transcript.append_message(b"domain", domain_label);
    transcript
}
