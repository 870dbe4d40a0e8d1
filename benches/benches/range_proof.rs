//! Benchmarks for range proof generation and verification

use bulletproofs_benches::BenchSetup;
use bulletproofs_core::{PedersenCommitment, Scalar};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use range::{RangeProof, RangeProofInstance};

const NONCE: [u8; 32] = [7u8; 32];

fn fixture(setup: &BenchSetup, n_values: usize, nbits: usize) -> (Vec<u64>, Vec<Scalar>, Vec<PedersenCommitment>) {
    let max = if nbits == 64 { u64::MAX } else { (1u64 << nbits) - 1 };
    let values: Vec<u64> = (0..n_values as u64).map(|i| max - i).collect();
    let blindings: Vec<Scalar> = (0..n_values as u64).map(|i| Scalar::from(i + 1)).collect();
    let commitments = values
        .iter()
        .zip(&blindings)
        .map(|(v, b)| PedersenCommitment::new(&setup.gens, *v, b, &setup.value_gen))
        .collect();
    (values, blindings, commitments)
}

fn bench_range_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_proof_generation");
    let setup = BenchSetup::new(1024);

    for bit_length in [8, 16, 32, 64] {
        group.throughput(Throughput::Elements(bit_length as u64));
        let (values, blindings, _) = fixture(&setup, 1, bit_length);

        group.bench_with_input(
            BenchmarkId::new("prove", bit_length),
            &bit_length,
            |b, &bit_length| {
                b.iter(|| {
                    let proof = range::prove(
                        &setup.gens,
                        black_box(&values),
                        None,
                        &blindings,
                        bit_length,
                        &setup.value_gen,
                        &NONCE,
                        b"",
                    )
                    .unwrap();
                    black_box(proof)
                });
            },
        );
    }

    group.finish();
}

fn bench_range_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_proof_verification");
    let mut setup = BenchSetup::new(1024);

    for bit_length in [8, 16, 32, 64] {
        group.throughput(Throughput::Elements(bit_length as u64));
        let (values, blindings, commitments) = fixture(&setup, 1, bit_length);
        let proof = range::prove(&setup.gens, &values, None, &blindings, bit_length, &setup.value_gen, &NONCE, b"")
            .unwrap()
            .to_bytes();

        group.bench_with_input(
            BenchmarkId::new("verify", bit_length),
            &bit_length,
            |b, &bit_length| {
                b.iter(|| {
                    range::verify(
                        &setup.gens,
                        &mut setup.scratch,
                        black_box(&proof),
                        None,
                        &commitments,
                        bit_length,
                        &setup.value_gen,
                        b"",
                    )
                    .unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_aggregation_and_batching(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_proof_aggregation");
    let mut setup = BenchSetup::new(1024);

    for n_values in [1, 2, 4, 8] {
        let (values, blindings, commitments) = fixture(&setup, n_values, 64);
        let proof = range::prove(&setup.gens, &values, None, &blindings, 64, &setup.value_gen, &NONCE, b"")
            .unwrap();
        println!(
            "Aggregate range proof size for {} values: {} bytes",
            n_values,
            proof.serialized_size()
        );
        let proof = proof.to_bytes();

        group.bench_with_input(BenchmarkId::new("verify", n_values), &n_values, |b, _| {
            b.iter(|| {
                range::verify(&setup.gens, &mut setup.scratch, black_box(&proof), None, &commitments, 64, &setup.value_gen, b"")
                    .unwrap();
            });
        });
    }

    let (values, blindings, commitments) = fixture(&setup, 1, 64);
    let proofs: Vec<Vec<u8>> = (0..16u8)
        .map(|i| {
            range::prove(&setup.gens, &values, None, &blindings, 64, &setup.value_gen, &[i; 32], b"")
                .map(|proof: RangeProof| proof.to_bytes())
                .unwrap()
        })
        .collect();
    for batch_size in [1, 4, 16] {
        let instances: Vec<RangeProofInstance<'_>> = proofs[..batch_size]
            .iter()
            .map(|proof| RangeProofInstance {
                proof,
                commitments: &commitments,
                min_values: None,
                extra_commit: b"",
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("batch_verify", batch_size), &batch_size, |b, _| {
            b.iter(|| {
                range::verify_multi(&setup.gens, &mut setup.scratch, black_box(&instances), 64, &setup.value_gen)
                    .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_range_proof_generation,
    bench_range_proof_verification,
    bench_aggregation_and_batching
);
criterion_main!(benches);
