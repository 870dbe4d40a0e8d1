//! Benchmarks for the inner product argument

use bulletproofs_benches::{bench_rng, BenchSetup};
use bulletproofs_core::{
    bulletproofs_transcript, utils::inner_product, RistrettoPoint, Scalar, VartimeMultiscalarMul,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn random_vectors(n: usize) -> (Vec<Scalar>, Vec<Scalar>) {
    let mut rng = bench_rng();
    let a = (0..n).map(|_| Scalar::random(&mut rng)).collect();
    let b = (0..n).map(|_| Scalar::random(&mut rng)).collect();
    (a, b)
}

fn bench_ipa_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipa_generation");

    for vector_length in [8, 16, 32, 64, 128] {
        group.throughput(Throughput::Elements(vector_length as u64));
        let setup = BenchSetup::new(2 * vector_length);
        let (a, b) = random_vectors(vector_length);
        let factors = vec![Scalar::ONE; vector_length];
        let g = setup.gens.g_vec(vector_length).unwrap().to_vec();
        let h = setup.gens.h_vec(vector_length).unwrap().to_vec();

        group.bench_with_input(
            BenchmarkId::new("prove", vector_length),
            &vector_length,
            |bench, _| {
                bench.iter(|| {
                    let mut transcript = bulletproofs_transcript(b"ipa_benchmark");
                    let proof = ipa::prove(
                        &mut transcript,
                        setup.gens.u_generator(),
                        &factors,
                        g.clone(),
                        h.clone(),
                        black_box(a.clone()),
                        black_box(b.clone()),
                    )
                    .unwrap();
                    black_box(proof)
                });
            },
        );
    }

    group.finish();
}

fn bench_ipa_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipa_verification");

    for vector_length in [8, 16, 32, 64, 128] {
        group.throughput(Throughput::Elements(vector_length as u64));
        let mut setup = BenchSetup::new(2 * vector_length);
        let (a, b) = random_vectors(vector_length);
        let factors = vec![Scalar::ONE; vector_length];
        let g = setup.gens.g_vec(vector_length).unwrap().to_vec();
        let h = setup.gens.h_vec(vector_length).unwrap().to_vec();
        let q = *setup.gens.u_generator();

        let c_ab = inner_product(&a, &b).unwrap();
        let p = RistrettoPoint::vartime_multiscalar_mul(
            a.iter().chain(b.iter()).chain([&c_ab]),
            g.iter().chain(h.iter()).chain([&q]),
        );
        let mut transcript = bulletproofs_transcript(b"ipa_benchmark");
        let proof = ipa::prove(&mut transcript, &q, &factors, g.clone(), h.clone(), a, b).unwrap();

        group.bench_with_input(
            BenchmarkId::new("verify", vector_length),
            &vector_length,
            |bench, _| {
                bench.iter(|| {
                    let mut transcript = bulletproofs_transcript(b"ipa_benchmark");
                    ipa::verify(
                        black_box(&proof),
                        &mut transcript,
                        &mut setup.scratch,
                        &p,
                        &q,
                        &factors,
                        &g,
                        &h,
                    )
                    .unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ipa_generation, bench_ipa_verification);
criterion_main!(benches);
