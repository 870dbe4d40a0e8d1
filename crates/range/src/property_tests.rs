//! Property-based tests for range proof soundness and completeness

use crate::{prove, rewind, verify, verify_multi, RangeProof, RangeProofInstance};
use bulletproofs_core::{GeneratorSet, PedersenCommitment, Scalar, ScratchSpace};
use proptest::prelude::*;

fn generators() -> GeneratorSet {
    GeneratorSet::new(GeneratorSet::standard_blinding_generator(), 256, 1).unwrap()
}

fn max_for(bits: usize) -> u64 {
    u64::MAX >> (64 - bits)
}

// Test that valid range proofs always verify
proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_completeness(
        offset in any::<u64>(),
        min_value in 0u64..1_000_000,
        bit_length in 1usize..=32,
        blind in 1u64..u64::MAX,
        nonce in any::<[u8; 32]>(),
    ) {
        let value = min_value + offset % (max_for(bit_length) + 1);

        let gens = generators();
        let value_gen = GeneratorSet::standard_value_generator();
        let blinding = Scalar::from(blind);
        let proof = prove(&gens, &[value], Some(&[min_value]), &[blinding], bit_length, &value_gen, &nonce, b"prop")?;
        let commitment = PedersenCommitment::new(&gens, value, &blinding, &value_gen);

        let mut scratch = ScratchSpace::new(1 << 18);
        let bytes = proof.to_bytes();
        prop_assert!(verify(&gens, &mut scratch, &bytes, Some(&[min_value]), &[commitment], bit_length, &value_gen, b"prop").is_ok());
        prop_assert_eq!(scratch.used(), 0);

        // The nonce holder gets the exact opening back
        let opened = rewind(&gens, &bytes, bit_length, min_value, &commitment, &value_gen, &nonce, b"prop")?;
        prop_assert_eq!(opened, (value, blinding));
    }
}

// Test that out-of-range values cannot be proven
proptest! {
    #[test]
    fn test_soundness_out_of_range(
        bit_length in 1usize..16,
        excess in 1u64..1000,
    ) {
        let invalid_value = max_for(bit_length) + excess;
        let gens = generators();
        let result = prove(
            &gens,
            &[invalid_value],
            None,
            &[Scalar::ONE],
            bit_length,
            &GeneratorSet::standard_value_generator(),
            &[0u8; 32],
            b"",
        );
        prop_assert!(result.is_err());
    }
}

// Test that proofs for different bit lengths don't cross-verify
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_bit_length_specificity(
        value in 0u64..64,
        prove_bits in 6usize..10,
        verify_bits in 6usize..10,
    ) {
        prop_assume!(prove_bits != verify_bits);

        let gens = generators();
        let value_gen = GeneratorSet::standard_value_generator();
        let blinding = Scalar::from(3u64);
        let proof = prove(&gens, &[value], None, &[blinding], prove_bits, &value_gen, &[1u8; 32], b"")?;
        let commitment = PedersenCommitment::new(&gens, value, &blinding, &value_gen);

        let mut scratch = ScratchSpace::new(1 << 18);
        prop_assert!(verify(&gens, &mut scratch, &proof.to_bytes(), None, &[commitment], verify_bits, &value_gen, b"").is_err());
    }
}

// Identical inputs give identical proofs; a different nonce changes them
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_determinism(
        value in 0u64..128,
        bit_length in 7usize..12,
        nonce in any::<[u8; 32]>(),
    ) {
        let gens = generators();
        let value_gen = GeneratorSet::standard_value_generator();
        let blinding = Scalar::from(11u64);
        let run = |nonce: &[u8; 32]| prove(&gens, &[value], None, &[blinding], bit_length, &value_gen, nonce, b"");

        let proof1 = run(&nonce)?;
        let proof2 = run(&nonce)?;
        prop_assert_eq!(proof1.to_bytes(), proof2.to_bytes());

        let mut other_nonce = nonce;
        other_nonce[0] ^= 1;
        prop_assert_ne!(proof1.to_bytes(), run(&other_nonce)?.to_bytes());
    }
}

// Test proof serialization and aggregate batches
proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn test_aggregate_batch_roundtrip(
        values in prop::collection::vec(0u64..=255, 1..=4),
        n_proofs in 1usize..=3,
    ) {
        let gens = generators();
        let value_gen = GeneratorSet::standard_value_generator();
        let blindings: Vec<Scalar> = (0..values.len()).map(|i| Scalar::from(i as u64 + 1)).collect();
        let commitments: Vec<PedersenCommitment> = values
            .iter()
            .zip(&blindings)
            .map(|(v, b)| PedersenCommitment::new(&gens, *v, b, &value_gen))
            .collect();

        let mut proofs = Vec::new();
        for i in 0..n_proofs {
            let proof = prove(&gens, &values, None, &blindings, 8, &value_gen, &[i as u8; 32], b"")?;
            let bytes = proof.to_bytes();
            prop_assert_eq!(RangeProof::from_bytes(&bytes)?, proof);
            proofs.push(bytes);
        }

        let instances: Vec<RangeProofInstance<'_>> = proofs
            .iter()
            .map(|proof| RangeProofInstance {
                proof,
                commitments: &commitments,
                min_values: None,
                extra_commit: b"",
            })
            .collect();
        let mut scratch = ScratchSpace::new(1 << 20);
        prop_assert!(verify_multi(&gens, &mut scratch, &instances, 8, &value_gen).is_ok());
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_deterministic_failure() {
        // 256 is too large for 8 bits (max = 255)
        let gens = generators();
        let result = prove(
            &gens,
            &[256],
            None,
            &[Scalar::ONE],
            8,
            &GeneratorSet::standard_value_generator(),
            &[0u8; 32],
            b"",
        );
        assert!(result.is_err());
    }
}
