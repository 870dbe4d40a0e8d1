//! Property-based tests for circuit parsing, evaluation and proofs

use crate::{prove, verify, Circuit, CircuitAssignment, CircuitError};
use bulletproofs_core::{GeneratorSet, Scalar, ScratchSpace};
use proptest::prelude::*;

fn generators() -> GeneratorSet {
    GeneratorSet::new(GeneratorSet::standard_blinding_generator(), 16, 1).unwrap()
}

fn product_assignment(x: u64, y: u64) -> CircuitAssignment {
    let (x, y) = (Scalar::from(x), Scalar::from(y));
    CircuitAssignment::new(vec![x], vec![y], vec![x * y]).unwrap()
}

// Satisfying assignments always prove and verify
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_completeness(
        x in 0u64..1 << 32,
        y in 0u64..1 << 32,
        blind in 1u64..u64::MAX,
        nonce in any::<[u8; 32]>(),
    ) {
        // the committed x times y, and x + y as a public constant
        let circuit = Circuit::parse(&format!("1,1,0,1; L0 + R0 = {};", x + y))?;
        let assignment = product_assignment(x, y);
        let gens = generators();
        let value_gen = GeneratorSet::standard_value_generator();
        let blinding = Scalar::from(blind);

        let proof = prove(&gens, &circuit, &assignment, &[blinding], &nonce, &value_gen, b"prop")?;
        let commitment = assignment.commit(0, &blinding, &value_gen, &gens)?;

        let mut scratch = ScratchSpace::new(1 << 16);
        prop_assert!(verify(&gens, &mut scratch, &circuit, &proof.to_bytes(), &[commitment], &value_gen, b"prop").is_ok());
        prop_assert_eq!(scratch.used(), 0);
    }
}

// An assignment with a wrong product is refused by the prover
proptest! {
    #[test]
    fn test_unsatisfied_gate_refused(x in 1u64..1000, y in 1u64..1000, error in 1u64..1000) {
        let circuit = Circuit::parse(&format!("1,0,0,1; L0 + R0 = {};", x + y))?;
        let (xs, ys) = (Scalar::from(x), Scalar::from(y));
        let assignment = CircuitAssignment::new(vec![xs], vec![ys], vec![xs * ys + Scalar::from(error)])?;
        let result = prove(
            &generators(),
            &circuit,
            &assignment,
            &[],
            &[0u8; 32],
            &GeneratorSet::standard_value_generator(),
            b"",
        );
        prop_assert!(matches!(result, Err(CircuitError::GateViolated(0))));
    }
}

// Evaluation agrees with the constraint it was built from
proptest! {
    #[test]
    fn test_evaluate_matches_constraint(
        x in 0u64..1 << 20,
        y in 0u64..1 << 20,
        constant in 0u64..1 << 21,
    ) {
        let circuit = Circuit::parse(&format!("1,0,0,1; L0 + R0 = {};", constant))?;
        let result = circuit.evaluate(&product_assignment(x, y));
        if x + y == constant {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(CircuitError::ConstraintViolated(0))));
        }
    }
}

// Text, display and binary forms describe the same circuit
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_formats_agree(
        n_gates in 1usize..20,
        constraints in prop::collection::vec(
            (prop::collection::vec((0usize..3, 0usize..20, 1u64..100, any::<bool>()), 1..4), -50i64..50),
            1..6,
        ),
    ) {
        let mut text = format!("{},0,0,{};", n_gates, constraints.len());
        for (terms, constant) in &constraints {
            for (k, (role, gate, weight, negative)) in terms.iter().enumerate() {
                let sign = match (k, negative) {
                    (0, true) => "-",
                    (0, false) => "",
                    (_, true) => " - ",
                    (_, false) => " + ",
                };
                text.push_str(&format!("{}{}*{}{}", sign, weight, ["L", "R", "O"][*role], gate % n_gates));
            }
            text.push_str(&format!(" = {};", constant));
        }

        let circuit = Circuit::parse(&text)?;
        prop_assert!(circuit.n_gates().is_power_of_two());
        prop_assert_eq!(circuit.n_constraints(), constraints.len());
        prop_assert_eq!(&Circuit::parse(&circuit.to_string())?, &circuit);
        prop_assert_eq!(&Circuit::decode(&circuit.encode())?, &circuit);
    }
}
