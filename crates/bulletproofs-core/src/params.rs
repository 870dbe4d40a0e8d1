//! Protocol limits and serialized sizes

/// Size of a compressed Ristretto point
pub const POINT_SIZE: usize = 32;

/// Size of a canonical scalar encoding
pub const SCALAR_SIZE: usize = 32;

/// Maximum number of inner-product folding rounds.
///
/// Depth 31 is enough for an aggregate of 2^25 proofs of 64-bit ranges.
pub const MAX_DEPTH: usize = 31;

/// Largest supported bit width for a single range
pub const MAX_NBITS: usize = 64;

/// `A, S, T1, T2` followed by `t_hat, tau_x, mu`
pub const RANGEPROOF_HEADER_SIZE: usize = 4 * POINT_SIZE + 3 * SCALAR_SIZE;

/// `A_I, A_O, S, T1, T3, T4, T5, T6` followed by `t_hat, tau_x, mu`
pub const CIRCUIT_HEADER_SIZE: usize = 8 * POINT_SIZE + 3 * SCALAR_SIZE;

/// One `(L, R)` pair of the inner-product recursion
pub const IPA_ROUND_SIZE: usize = 2 * POINT_SIZE;

/// Final `(a, b)` scalars of the inner-product argument
pub const IPA_FINAL_SIZE: usize = 2 * SCALAR_SIZE;

/// Upper bound on any proof produced by this workspace
pub const MAX_PROOF_SIZE: usize = CIRCUIT_HEADER_SIZE + MAX_DEPTH * IPA_ROUND_SIZE + IPA_FINAL_SIZE;

/// Maximum memory a decoded circuit may occupy
pub const MAX_CIRCUIT_SIZE: usize = 1024 * 1024 * 1024;

/// Version tag of the binary circuit and assignment formats
pub const CIRCUIT_VERSION: u32 = 1;

/// Serialized size of an inner-product proof with `rounds` folding rounds
pub fn ipa_proof_size(rounds: usize) -> usize {
    rounds * IPA_ROUND_SIZE + IPA_FINAL_SIZE
}

/// Number of folding rounds for a power-of-two vector length
pub fn folding_rounds(n: usize) -> usize {
    debug_assert!(n.is_power_of_two());
    n.trailing_zeros() as usize
}
