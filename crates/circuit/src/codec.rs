//! Canonical binary circuit format
//!
//! ```text
//! version: u32 | n_commits: u32 | n_gates: u64 | n_bits: u64 | n_constraints: u64
//! for role in L, R, O:
//!     for gate in 0..n_gates:
//!         row_len: W | row_len * (constraint: W | 0x20 | weight: 32)
//! for constraint in 0..n_constraints:
//!     0x20 | constant: 32
//! ```
//!
//! All integers are little endian and `W = encoding_width(max(n_gates, n_constraints))`.
//! The width covers constraint indices as well as gate counts, so a circuit
//! with more constraints than gates does not share its bytes with a format
//! that sizes `W` from the gate count alone.

use crate::{
    circuit::check_footprint, Circuit, CircuitError, CircuitResult, WireEntry, WireRole,
};
use bulletproofs_core::params::{CIRCUIT_VERSION, MAX_CIRCUIT_SIZE, SCALAR_SIZE};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use curve25519_dalek::scalar::Scalar;
use std::{
    fs,
    io::{Cursor, Read},
    path::Path,
};
use tracing::{debug, instrument};

/// Tag byte in front of every encoded scalar
pub(crate) const SCALAR_TAG: u8 = 0x20;

/// Size of the fixed circuit header
pub const CIRCUIT_HEADER_LEN: usize = 4 + 4 + 3 * 8;

/// Bytes needed to encode any integer up to `n`: 1, 2, 4 or 8
pub fn encoding_width(n: usize) -> usize {
    match n as u64 {
        n if n < 1 << 8 => 1,
        n if n < 1 << 16 => 2,
        n if n < 1 << 32 => 4,
        _ => 8,
    }
}

fn put_uint(out: &mut Vec<u8>, value: usize, width: usize) {
    let mut word = [0u8; 8];
    LittleEndian::write_uint(&mut word, value as u64, width);
    out.extend_from_slice(&word[..width]);
}

fn put_scalar(out: &mut Vec<u8>, scalar: &Scalar) {
    out.push(SCALAR_TAG);
    out.extend_from_slice(scalar.as_bytes());
}

/// Little-endian reader mapping every short read to [`CircuitError::Truncated`]
pub(crate) struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    /// Fail early unless at least `len` more bytes are present
    pub fn require(&self, len: usize) -> CircuitResult<()> {
        if len > self.remaining() {
            return Err(CircuitError::Truncated);
        }
        Ok(())
    }

    pub fn u32(&mut self) -> CircuitResult<u32> {
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| CircuitError::Truncated)
    }

    /// A `u64` count that must fit in memory
    pub fn length(&mut self) -> CircuitResult<usize> {
        let value = self
            .cursor
            .read_u64::<LittleEndian>()
            .map_err(|_| CircuitError::Truncated)?;
        usize::try_from(value).map_err(|_| CircuitError::TooLarge {
            needed: usize::MAX,
            limit: MAX_CIRCUIT_SIZE,
        })
    }

    pub fn uint(&mut self, width: usize) -> CircuitResult<usize> {
        let value = self
            .cursor
            .read_uint::<LittleEndian>(width)
            .map_err(|_| CircuitError::Truncated)?;
        usize::try_from(value).map_err(|_| CircuitError::IndexOutOfRange {
            index: usize::MAX,
            bound: usize::MAX,
        })
    }

    /// A tagged, canonically encoded scalar
    pub fn scalar(&mut self) -> CircuitResult<Scalar> {
        let mut buf = [0u8; 1 + SCALAR_SIZE];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| CircuitError::Truncated)?;
        if buf[0] != SCALAR_TAG {
            return Err(CircuitError::InvalidScalar);
        }
        let mut bytes = [0u8; SCALAR_SIZE];
        bytes.copy_from_slice(&buf[1..]);
        Option::from(Scalar::from_canonical_bytes(bytes)).ok_or(CircuitError::InvalidScalar)
    }

    /// Succeed only if every byte was consumed
    pub fn finish(self) -> CircuitResult<()> {
        if self.remaining() > 0 {
            return Err(CircuitError::TrailingBytes);
        }
        Ok(())
    }
}

impl Circuit {
    fn row_width(&self) -> usize {
        encoding_width(self.n_gates().max(self.n_constraints()))
    }

    /// Length of [`Circuit::encode`]'s output
    pub fn encoded_len(&self) -> usize {
        let width = self.row_width();
        CIRCUIT_HEADER_LEN
            + 3 * self.n_gates() * width
            + self.num_entries() * (width + 1 + SCALAR_SIZE)
            + self.n_constraints() * (1 + SCALAR_SIZE)
    }

    /// Serialize to the canonical binary format
    pub fn encode(&self) -> Vec<u8> {
        let width = self.row_width();
        let mut out = Vec::with_capacity(self.encoded_len());
        put_uint(&mut out, CIRCUIT_VERSION as usize, 4);
        put_uint(&mut out, self.n_commits(), 4);
        put_uint(&mut out, self.n_gates(), 8);
        put_uint(&mut out, self.n_bits(), 8);
        put_uint(&mut out, self.n_constraints(), 8);

        for role in WireRole::ALL {
            for row in self.rows(role) {
                put_uint(&mut out, row.len(), width);
                for entry in row {
                    put_uint(&mut out, entry.constraint, width);
                    put_scalar(&mut out, &entry.weight);
                }
            }
        }
        for constant in self.constants() {
            put_scalar(&mut out, constant);
        }
        out
    }

    /// Parse the canonical binary format
    ///
    /// The memory the circuit will need is checked against
    /// [`MAX_CIRCUIT_SIZE`] before anything is allocated for it.
    #[instrument(skip_all, level = "debug", fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> CircuitResult<Self> {
        let mut reader = ByteReader::new(bytes);
        let version = reader.u32()?;
        if version != CIRCUIT_VERSION {
            return Err(CircuitError::UnsupportedVersion(version));
        }
        let n_commits = reader.u32()? as usize;
        let n_gates = reader.length()?;
        let n_bits = reader.length()?;
        let n_constraints = reader.length()?;

        check_footprint(n_gates, n_constraints, 0)?;
        if n_bits > n_gates || n_commits > n_gates {
            return Err(CircuitError::InvalidParameters(format!(
                "{} gates cannot hold {} bits and {} commitments",
                n_gates, n_bits, n_commits
            )));
        }

        let width = encoding_width(n_gates.max(n_constraints));
        reader.require(3 * n_gates * width + n_constraints * (1 + SCALAR_SIZE))?;

        let mut n_entries = 0;
        let mut rows: [Vec<Vec<WireEntry>>; 3] = Default::default();
        for role_rows in rows.iter_mut() {
            role_rows.reserve_exact(n_gates);
            for _ in 0..n_gates {
                let row_len = reader.uint(width)?;
                if row_len > n_constraints {
                    return Err(CircuitError::InvalidParameters(format!(
                        "row of {} entries for {} constraints",
                        row_len, n_constraints
                    )));
                }
                reader.require(row_len * (width + 1 + SCALAR_SIZE))?;
                n_entries += row_len;
                check_footprint(n_gates, n_constraints, n_entries)?;

                let mut row = Vec::with_capacity(row_len);
                for _ in 0..row_len {
                    let constraint = reader.uint(width)?;
                    if constraint >= n_constraints {
                        return Err(CircuitError::IndexOutOfRange {
                            index: constraint,
                            bound: n_constraints,
                        });
                    }
                    row.push(WireEntry {
                        constraint,
                        weight: reader.scalar()?,
                    });
                }
                role_rows.push(row);
            }
        }

        let constants = (0..n_constraints)
            .map(|_| reader.scalar())
            .collect::<CircuitResult<Vec<_>>>()?;
        reader.finish()?;

        debug!(n_gates, n_constraints, n_entries, "decoded circuit");
        Circuit::from_parts(n_commits, n_bits, n_constraints, rows, constants)
    }

    /// Read and parse a binary circuit file
    pub fn decode_file(path: impl AsRef<Path>) -> CircuitResult<Self> {
        Self::decode(&fs::read(path)?)
    }
}
