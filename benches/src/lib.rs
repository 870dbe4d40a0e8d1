//! Shared fixtures for the benchmark targets
//!
//! ```bash
//! cargo bench -p bulletproofs-benches
//! cargo bench -p bulletproofs-benches --bench circuit
//! ```

use bulletproofs_core::{GeneratorSet, RistrettoPoint, Scalar, ScratchSpace};
use circuit::{Circuit, CircuitAssignment};
use rand::{rngs::StdRng, SeedableRng};

/// Generators, value generator and scratch arena sized for `n` generators
pub struct BenchSetup {
    pub gens: GeneratorSet,
    pub value_gen: RistrettoPoint,
    pub scratch: ScratchSpace,
}

impl BenchSetup {
    pub fn new(n: usize) -> Self {
        Self {
            gens: GeneratorSet::new(GeneratorSet::standard_blinding_generator(), n, 1)
                .expect("generator set"),
            value_gen: GeneratorSet::standard_value_generator(),
            scratch: ScratchSpace::new(1 << 24),
        }
    }
}

/// Deterministic rng so runs are comparable
pub fn bench_rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

/// Chain of `n_gates` squarings: `l_i = r_i`, `l_{i+1} = o_i`, with `l_0` committed
pub fn squaring_chain(n_gates: usize) -> (Circuit, CircuitAssignment) {
    let mut text = format!("{},1,0,{};", n_gates, 2 * n_gates - 1);
    for i in 0..n_gates {
        text.push_str(&format!("L{} - R{} = 0;", i, i));
    }
    for i in 1..n_gates {
        text.push_str(&format!("L{} - O{} = 0;", i, i - 1));
    }
    let circuit = Circuit::parse(&text).expect("squaring chain parses");

    let mut l = Vec::with_capacity(n_gates);
    let mut o = Vec::with_capacity(n_gates);
    let mut value = Scalar::from(3u64);
    for _ in 0..n_gates {
        l.push(value);
        value *= value;
        o.push(value);
    }
    let assignment = CircuitAssignment::new(l.clone(), l, o).expect("matching lengths");
    (circuit, assignment)
}
