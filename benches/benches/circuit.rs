//! Benchmarks for circuit parsing, encoding and proofs

use bulletproofs_benches::{squaring_chain, BenchSetup};
use bulletproofs_core::Scalar;
use circuit::Circuit;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const NONCE: [u8; 32] = [3u8; 32];
const BLINDING: u64 = 12345;

fn bench_circuit_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_codec");

    for n_gates in [16, 64, 256] {
        let (circuit, _) = squaring_chain(n_gates);
        let text = circuit.to_string();
        let bytes = circuit.encode();
        group.throughput(Throughput::Elements(circuit.n_constraints() as u64));

        group.bench_with_input(BenchmarkId::new("parse", n_gates), &text, |b, text| {
            b.iter(|| Circuit::parse(black_box(text)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", n_gates), &bytes, |b, bytes| {
            b.iter(|| Circuit::decode(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

fn bench_circuit_proofs(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_proof");
    group.sample_size(20);

    for n_gates in [4, 16, 64] {
        group.throughput(Throughput::Elements(n_gates as u64));
        let mut setup = BenchSetup::new(2 * n_gates);
        let (circuit, assignment) = squaring_chain(n_gates);
        let blindings = [Scalar::from(BLINDING)];
        let commitment = assignment
            .commit(0, &blindings[0], &setup.value_gen, &setup.gens)
            .unwrap();

        group.bench_with_input(BenchmarkId::new("prove", n_gates), &n_gates, |b, _| {
            b.iter(|| {
                circuit::prove(
                    &setup.gens,
                    &circuit,
                    black_box(&assignment),
                    &blindings,
                    &NONCE,
                    &setup.value_gen,
                    b"",
                )
                .unwrap()
            });
        });

        let proof = circuit::prove(&setup.gens, &circuit, &assignment, &blindings, &NONCE, &setup.value_gen, b"")
            .unwrap()
            .to_bytes();
        group.bench_with_input(BenchmarkId::new("verify", n_gates), &n_gates, |b, _| {
            b.iter(|| {
                circuit::verify(
                    &setup.gens,
                    &mut setup.scratch,
                    &circuit,
                    black_box(&proof),
                    &[commitment],
                    &setup.value_gen,
                    b"",
                )
                .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_circuit_codec, bench_circuit_proofs);
criterion_main!(benches);
