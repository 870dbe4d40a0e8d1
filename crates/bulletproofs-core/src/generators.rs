//! NUMS generator derivation and optional multiples precomputation

use crate::{BulletproofsError, BulletproofsResult};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::RistrettoPoint,
    scalar::Scalar,
    traits::{MultiscalarMul, VartimeMultiscalarMul},
};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

/// Generator set for Bulletproofs operations
///
/// Holds `n` nothing-up-my-sleeve points split evenly into the `G` and `H`
/// vectors, the blinding generator Pedersen commitments are built with, and
/// the generator `u` the inner-product argument binds its claimed value to.
/// A proof over vectors of length `N` needs a set with `len() >= 2 * N`.
#[derive(Debug, Clone)]
pub struct GeneratorSet {
    blinding: RistrettoPoint,
    u: RistrettoPoint,
    g_vec: Vec<RistrettoPoint>,
    h_vec: Vec<RistrettoPoint>,
    precomputed: Option<PrecomputedTable>,
}

/// Small multiples `[P, 2P, .., kP]` of every base, blinding generator first
#[derive(Debug, Clone)]
struct PrecomputedTable {
    multiples: usize,
    table: Vec<RistrettoPoint>,
}

impl PrecomputedTable {
    fn build(bases: &[RistrettoPoint], multiples: usize) -> BulletproofsResult<Self> {
        let total = bases
            .len()
            .checked_mul(multiples)
            .ok_or(BulletproofsError::AllocationFailure)?;
        let mut table = Vec::new();
        table
            .try_reserve_exact(total)
            .map_err(|_| BulletproofsError::AllocationFailure)?;

        for base in bases {
            let mut acc = *base;
            table.push(acc);
            for _ in 1..multiples {
                acc += base;
                table.push(acc);
            }
        }

        Ok(Self { multiples, table })
    }
}

/// Hash a role label and index to a Ristretto point
fn hash_to_point(label: &[u8], index: u64) -> RistrettoPoint {
    let mut bytes = [0u8; 64];
    for (half, chunk) in bytes.chunks_mut(32).enumerate() {
        let mut hasher = Sha256::new();
        hasher.update(b"bulletproofs_generator_");
        hasher.update(label);
        hasher.update(index.to_le_bytes());
        hasher.update([half as u8]);
        chunk.copy_from_slice(&hasher.finalize());
    }

    RistrettoPoint::from_uniform_bytes(&bytes)
}

fn try_vec(len: usize) -> BulletproofsResult<Vec<RistrettoPoint>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| BulletproofsError::AllocationFailure)?;
    Ok(v)
}

impl GeneratorSet {
    /// Create a generator set with `n` NUMS points.
    ///
    /// `precompute_multiples` is the number of multiples stored for each
    /// point and the blinding generator; `1` disables precomputation.
    #[instrument(skip_all, level = "debug", fields(n = n, precompute_multiples = precompute_multiples))]
    pub fn new(
        blinding_generator: RistrettoPoint,
        n: usize,
        precompute_multiples: usize,
    ) -> BulletproofsResult<Self> {
        if precompute_multiples == 0 {
            return Err(BulletproofsError::InvalidParameters(
                "precompute_multiples must be at least 1".to_string(),
            ));
        }

        let half = n / 2;
        let mut g_vec = try_vec(half)?;
        let mut h_vec = try_vec(half)?;
        for i in 0..half as u64 {
            g_vec.push(hash_to_point(b"G", i));
            h_vec.push(hash_to_point(b"H", i));
        }

        let precomputed = if precompute_multiples > 1 {
            let mut bases = try_vec(1 + 2 * half)?;
            bases.push(blinding_generator);
            bases.extend_from_slice(&g_vec);
            bases.extend_from_slice(&h_vec);
            Some(PrecomputedTable::build(&bases, precompute_multiples)?)
        } else {
            None
        };

        debug!(points = 2 * half, "created generator set");

        Ok(Self {
            blinding: blinding_generator,
            u: hash_to_point(b"U", 0),
            g_vec,
            h_vec,
            precomputed,
        })
    }

    /// The crate's NUMS blinding generator
    pub fn standard_blinding_generator() -> RistrettoPoint {
        hash_to_point(b"B_blinding", 0)
    }

    /// The Ristretto basepoint, the default value generator
    pub fn standard_value_generator() -> RistrettoPoint {
        RISTRETTO_BASEPOINT_POINT
    }

    /// Total number of NUMS points in the `G` and `H` vectors
    pub fn len(&self) -> usize {
        self.g_vec.len() + self.h_vec.len()
    }

    /// True if the set holds no vector generators
    pub fn is_empty(&self) -> bool {
        self.g_vec.is_empty()
    }

    /// Longest vector a proof can commit to with this set
    pub fn capacity(&self) -> usize {
        self.g_vec.len()
    }

    /// Fail unless vectors of `length` can be committed to
    pub fn ensure_capacity(&self, length: usize) -> BulletproofsResult<()> {
        if length > self.capacity() {
            return Err(BulletproofsError::InsufficientGenerators {
                needed: length.saturating_mul(2),
                available: self.len(),
            });
        }
        Ok(())
    }

    /// Generator that blinding factors are multiplied by
    pub fn blinding_generator(&self) -> &RistrettoPoint {
        &self.blinding
    }

    /// Generator the inner-product argument binds `<a, b>` to
    pub fn u_generator(&self) -> &RistrettoPoint {
        &self.u
    }

    /// The first `length` generators of the `G` vector
    pub fn g_vec(&self, length: usize) -> BulletproofsResult<&[RistrettoPoint]> {
        self.ensure_capacity(length)?;
        Ok(&self.g_vec[..length])
    }

    /// The first `length` generators of the `H` vector
    pub fn h_vec(&self, length: usize) -> BulletproofsResult<&[RistrettoPoint]> {
        self.ensure_capacity(length)?;
        Ok(&self.h_vec[..length])
    }

    /// Number of multiples stored per base (1 when nothing is precomputed)
    pub fn precomputed_multiples(&self) -> usize {
        self.precomputed.as_ref().map_or(1, |t| t.multiples)
    }

    /// `k * P` for base `index`, where index 0 is the blinding generator,
    /// `1..=capacity()` the `G` vector and the rest the `H` vector.
    pub fn multiple(&self, index: usize, k: usize) -> Option<RistrettoPoint> {
        if k == 0 || index > self.len() {
            return None;
        }
        if let Some(table) = &self.precomputed {
            if k <= table.multiples {
                return table.table.get(index * table.multiples + k - 1).copied();
            }
        }

        let base = match index {
            0 => self.blinding,
            i if i <= self.capacity() => self.g_vec[i - 1],
            i => self.h_vec[i - 1 - self.capacity()],
        };
        Some(base * Scalar::from(k as u64))
    }

    /// Pedersen commitment `value * value_gen + blinding * B`.
    ///
    /// Runs in constant time in `value` and `blinding`.
    pub fn commit(
        &self,
        value: &Scalar,
        blinding: &Scalar,
        value_gen: &RistrettoPoint,
    ) -> RistrettoPoint {
        RistrettoPoint::multiscalar_mul([*value, *blinding], [*value_gen, self.blinding])
    }

    /// Compute vector commitment: `<a, G> + <b, H>` (variable time)
    pub fn vector_commit(&self, a: &[Scalar], b: &[Scalar]) -> BulletproofsResult<RistrettoPoint> {
        if a.len() != b.len() {
            return Err(BulletproofsError::VectorLengthMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        self.ensure_capacity(a.len())?;

        let scalars = a.iter().chain(b.iter());
        let points = self.g_vec[..a.len()].iter().chain(self.h_vec[..b.len()].iter());

        Ok(RistrettoPoint::vartime_multiscalar_mul(scalars, points))
    }

    /// Compute inner product commitment: `<a, G> + <b, H> + <a, b> * q`
    pub fn inner_product_commit(
        &self,
        a: &[Scalar],
        b: &[Scalar],
        q: &RistrettoPoint,
    ) -> BulletproofsResult<RistrettoPoint> {
        let vector_commit = self.vector_commit(a, b)?;
        let inner_product = crate::utils::inner_product(a, b)?;

        Ok(vector_commit + q * inner_product)
    }
}
