//! Circuit proof prover implementation

use crate::{
    proof::{nonce_context, statement_transcript, CircuitProof},
    Circuit, CircuitAssignment, CircuitError, CircuitResult,
};
use bulletproofs_core::{
    params::{folding_rounds, MAX_DEPTH},
    utils::{inner_product, scalar_powers},
    BulletproofsError, GeneratorSet, MultiscalarMul, Nonce, NonceGenerator, PedersenCommitment,
    RistrettoPoint, Scalar, TranscriptProtocol,
};
use std::iter;
use subtle::{Choice, ConstantTimeEq};
use tracing::{debug, instrument};
use zeroize::Zeroize;

/// Exponents of the committed coefficients of `t(X)`; `t2` is implied by the circuit
const T_POWERS: [u64; 5] = [1, 3, 4, 5, 6];

/// Prove in zero knowledge that `assignment` satisfies `circuit`
///
/// The `j`-th committed value is the left wire of gate `j`, committed as
/// `l_j * value_gen + blindings[j] * B`. The gate count must be a power of
/// two and the circuit needs at least one explicit constraint. An
/// assignment that does not satisfy the circuit is refused. All prover
/// randomness is derived from `nonce`.
#[instrument(skip_all, level = "debug", fields(n_gates = circuit.n_gates(), n_commits = circuit.n_commits()))]
pub fn prove(
    gens: &GeneratorSet,
    circuit: &Circuit,
    assignment: &CircuitAssignment,
    blindings: &[Scalar],
    nonce: &Nonce,
    value_gen: &RistrettoPoint,
    extra_commit: &[u8],
) -> CircuitResult<CircuitProof> {
    let n = circuit.n_gates();
    if !n.is_power_of_two() {
        return Err(CircuitError::InvalidParameters(format!(
            "gate count {} is not a power of two",
            n
        )));
    }
    if circuit.n_constraints() == 0 {
        return Err(CircuitError::InvalidParameters(
            "circuit has no constraints".to_string(),
        ));
    }
    if folding_rounds(n) > MAX_DEPTH {
        return Err(CircuitError::InvalidParameters(format!(
            "{} gates exceed the maximum depth {}",
            n, MAX_DEPTH
        )));
    }
    if blindings.len() != circuit.n_commits() {
        return Err(BulletproofsError::VectorLengthMismatch {
            expected: circuit.n_commits(),
            actual: blindings.len(),
        }
        .into());
    }
    gens.ensure_capacity(n)?;
    circuit.evaluate(assignment)?;
    let degenerate = blindings
        .iter()
        .fold(Choice::from(0), |acc, blinding| acc | blinding.ct_eq(&Scalar::ZERO));
    if bool::from(degenerate) {
        return Err(BulletproofsError::DegenerateBlinding.into());
    }
    let assignment = assignment.clone().padded(n);

    let commitments = blindings
        .iter()
        .enumerate()
        .map(|(j, blinding)| assignment.commit(j, blinding, value_gen, gens))
        .collect::<CircuitResult<Vec<PedersenCommitment>>>()?;

    let digest = circuit.digest();
    let mut transcript = statement_transcript(circuit, &digest, &commitments, extra_commit);
    let context = nonce_context(&digest, &commitments);
    let derivation = NonceGenerator::new(nonce, &[context.as_slice(), extra_commit]);

    let g = gens.g_vec(n)?;
    let h = gens.h_vec(n)?;
    let blinding_gen = gens.blinding_generator();
    let (a_l, a_r, a_o) = (assignment.left(), assignment.right(), assignment.output());

    let mut alpha = derivation.scalar(b"alpha", 0);
    let mut beta = derivation.scalar(b"beta", 0);
    let mut rho = derivation.scalar(b"rho", 0);
    let (mut s_l, mut s_r) = rayon::join(
        || derivation.scalars(b"sL", n),
        || derivation.scalars(b"sR", n),
    );

    let a_i = RistrettoPoint::multiscalar_mul(
        iter::once(&alpha).chain(a_l.iter()).chain(a_r.iter()),
        iter::once(blinding_gen).chain(g.iter()).chain(h.iter()),
    )
    .compress();
    let a_o_commit = RistrettoPoint::multiscalar_mul(
        iter::once(&beta).chain(a_o.iter()),
        iter::once(blinding_gen).chain(g.iter()),
    )
    .compress();
    let s = RistrettoPoint::multiscalar_mul(
        iter::once(&rho).chain(s_l.iter()).chain(s_r.iter()),
        iter::once(blinding_gen).chain(g.iter()).chain(h.iter()),
    )
    .compress();

    transcript.append_point(b"A_I", &a_i);
    transcript.append_point(b"A_O", &a_o_commit);
    transcript.append_point(b"S", &s);
    let y = transcript.challenge_scalar(b"y");
    let z = transcript.challenge_scalar(b"z");

    let mut zp = vec![Scalar::ZERO; circuit.total_rows()];
    let mut w = vec![Scalar::ZERO; 3 * n];
    let mut w_v = vec![Scalar::ZERO; circuit.n_commits()];
    circuit.compress_weights(&z, &mut zp, &mut w, &mut w_v);
    let (w_l, rest) = w.split_at(n);
    let (w_r, w_o) = rest.split_at(n);

    // l(X) = l1 X + l2 X^2 + l3 X^3,  r(X) = r0 + r1 X + r3 X^3
    let y_pow = scalar_powers(&y, n);
    let y_inv_pow = scalar_powers(&y.invert(), n);
    let mut l1: Vec<Scalar> = (0..n).map(|i| a_l[i] + y_inv_pow[i] * w_r[i]).collect();
    let l2 = a_o;
    let l3 = &s_l;
    let r0: Vec<Scalar> = (0..n).map(|i| w_o[i] - y_pow[i]).collect();
    let mut r1: Vec<Scalar> = (0..n).map(|i| y_pow[i] * a_r[i] + w_l[i]).collect();
    let mut r3: Vec<Scalar> = y_pow.iter().zip(&s_r).map(|(y_i, s)| y_i * s).collect();

    let mut t = [
        inner_product(&l1, &r0)?,
        inner_product(l2, &r1)? + inner_product(l3, &r0)?,
        inner_product(&l1, &r3)? + inner_product(l3, &r1)?,
        inner_product(l2, &r3)?,
        inner_product(l3, &r3)?,
    ];
    let mut tau = T_POWERS.map(|power| derivation.scalar(b"tau", power));
    let t_commits: Vec<_> = t
        .iter()
        .zip(&tau)
        .map(|(t_i, tau_i)| gens.commit(t_i, tau_i, value_gen).compress())
        .collect();

    let labels: [&'static [u8]; 5] = [b"T1", b"T3", b"T4", b"T5", b"T6"];
    for (label, commit) in labels.into_iter().zip(&t_commits) {
        transcript.append_point(label, commit);
    }
    let x = transcript.challenge_scalar(b"x");
    let x2 = x * x;
    let x3 = x2 * x;

    let l: Vec<Scalar> = (0..n)
        .map(|i| l1[i] * x + l2[i] * x2 + l3[i] * x3)
        .collect();
    let r: Vec<Scalar> = (0..n)
        .map(|i| r0[i] + r1[i] * x + r3[i] * x3)
        .collect();
    let t_hat = inner_product(&l, &r)?;

    let x_pow = scalar_powers(&x, 7);
    let mut tau_x: Scalar = T_POWERS
        .iter()
        .zip(&tau)
        .map(|(power, tau_i)| tau_i * x_pow[*power as usize])
        .sum();
    tau_x += x2 * w_v.iter().zip(blindings).map(|(w, gamma)| w * gamma).sum::<Scalar>();
    let mu = alpha * x + beta * x2 + rho * x3;

    transcript.append_scalar(b"t_hat", &t_hat);
    transcript.append_scalar(b"tau_x", &tau_x);
    transcript.append_scalar(b"mu", &mu);
    let w_challenge = transcript.challenge_scalar(b"w");
    let q = gens.u_generator() * w_challenge;

    let ipa_proof = ipa::prove(&mut transcript, &q, &y_inv_pow, g.to_vec(), h.to_vec(), l, r)?;

    for secret in [&mut s_l, &mut s_r, &mut l1, &mut r1, &mut r3] {
        secret.zeroize();
    }
    t.zeroize();
    tau.zeroize();
    for secret in [&mut alpha, &mut beta, &mut rho] {
        secret.zeroize();
    }

    debug!(rounds = ipa_proof.num_rounds(), "created circuit proof");

    Ok(CircuitProof {
        a_i,
        a_o: a_o_commit,
        s,
        t1: t_commits[0],
        t3: t_commits[1],
        t4: t_commits[2],
        t5: t_commits[3],
        t6: t_commits[4],
        t_hat,
        tau_x,
        mu,
        ipa_proof,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletproofs_core::params::CIRCUIT_HEADER_SIZE;

    fn s(v: u64) -> Scalar {
        Scalar::from(v)
    }

    fn generators(n: usize) -> GeneratorSet {
        GeneratorSet::new(GeneratorSet::standard_blinding_generator(), n, 1).unwrap()
    }

    fn product() -> (Circuit, CircuitAssignment) {
        let circuit = Circuit::parse("1,0,0,1; L0 + R0 = 10;").unwrap();
        let assignment = CircuitAssignment::new(vec![s(3)], vec![s(7)], vec![s(21)]).unwrap();
        (circuit, assignment)
    }

    fn prove_plain(gens: &GeneratorSet, circuit: &Circuit, assignment: &CircuitAssignment) -> CircuitResult<CircuitProof> {
        prove(gens, circuit, assignment, &[], &[1u8; 32], &GeneratorSet::standard_value_generator(), b"")
    }

    #[test]
    fn test_circuit_proof_generation() {
        let gens = generators(16);
        let (circuit, assignment) = product();
        let proof = prove_plain(&gens, &circuit, &assignment).unwrap();
        assert_eq!(proof.ipa_proof.num_rounds(), 0);
        assert_eq!(proof.to_bytes().len(), CIRCUIT_HEADER_SIZE + 64);

        let wide = Circuit::parse("8,0,0,1; L7 = 1;").unwrap();
        let ones = CircuitAssignment::new(vec![s(1); 8], vec![s(1); 8], vec![s(1); 8]).unwrap();
        assert_eq!(prove_plain(&gens, &wide, &ones).unwrap().ipa_proof.num_rounds(), 3);
    }

    #[test]
    fn test_unsatisfying_assignment_refused() {
        let gens = generators(16);
        let (circuit, _) = product();
        let wrong = CircuitAssignment::new(vec![s(3)], vec![s(7)], vec![s(20)]).unwrap();
        assert!(matches!(
            prove_plain(&gens, &circuit, &wrong),
            Err(CircuitError::GateViolated(0))
        ));
    }

    #[test]
    fn test_structural_requirements() {
        let gens = generators(16);
        let (_, assignment) = product();

        let empty = Circuit::parse("1,0,0,0;").unwrap();
        assert!(matches!(
            prove_plain(&gens, &empty, &assignment),
            Err(CircuitError::InvalidParameters(_))
        ));

        let (circuit, assignment) = product();
        let small = generators(0);
        assert!(matches!(
            prove_plain(&small, &circuit, &assignment),
            Err(CircuitError::Proof(BulletproofsError::InsufficientGenerators { needed: 2, available: 0 }))
        ));
    }

    #[test]
    fn test_blinding_requirements() {
        let gens = generators(16);
        let value_gen = GeneratorSet::standard_value_generator();
        // committed value L0 squared into O0 = 49
        let circuit = Circuit::parse("1,1,0,2; L0 - R0 = 0; O0 = 49;").unwrap();
        let assignment = CircuitAssignment::new(vec![s(7)], vec![s(7)], vec![s(49)]).unwrap();

        let missing = prove(&gens, &circuit, &assignment, &[], &[1u8; 32], &value_gen, b"");
        assert!(matches!(
            missing,
            Err(CircuitError::Proof(BulletproofsError::VectorLengthMismatch { expected: 1, actual: 0 }))
        ));

        let zero = prove(&gens, &circuit, &assignment, &[Scalar::ZERO], &[1u8; 32], &value_gen, b"");
        assert!(matches!(zero, Err(CircuitError::Proof(BulletproofsError::DegenerateBlinding))));

        assert!(prove(&gens, &circuit, &assignment, &[s(5)], &[1u8; 32], &value_gen, b"").is_ok());
    }

    #[test]
    fn test_deterministic_proofs() {
        let gens = generators(16);
        let (circuit, assignment) = product();
        let value_gen = GeneratorSet::standard_value_generator();
        let run = |nonce: &[u8; 32], extra: &[u8]| {
            prove(&gens, &circuit, &assignment, &[], nonce, &value_gen, extra)
                .unwrap()
                .to_bytes()
        };
        assert_eq!(run(&[4u8; 32], b""), run(&[4u8; 32], b""));
        assert_ne!(run(&[4u8; 32], b""), run(&[5u8; 32], b""));
        assert_ne!(run(&[4u8; 32], b""), run(&[4u8; 32], b"other"));
    }
}
