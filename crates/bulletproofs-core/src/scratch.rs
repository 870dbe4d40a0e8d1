//! Caller-owned scratch space for verification
//!
//! A [`ScratchSpace`] is a bump arena with a byte limit. Verifiers open a
//! [`ScratchFrame`] on entry; everything allocated through the frame is
//! released when the frame is dropped, on success and failure alike.
//! Independent calls on separate arenas never interact.

use crate::{BulletproofsError, BulletproofsResult};
use curve25519_dalek::{
    ristretto::RistrettoPoint, scalar::Scalar, traits::VartimeMultiscalarMul,
};
use std::mem::size_of;

const SCALAR_COST: usize = size_of::<Scalar>();
const TERM_COST: usize = size_of::<Scalar>() + size_of::<RistrettoPoint>();

/// Bump arena holding scalar work buffers and multiscalar-multiplication terms
#[derive(Debug, Default)]
pub struct ScratchSpace {
    max_size: usize,
    buffers: Vec<Scalar>,
    term_scalars: Vec<Scalar>,
    term_points: Vec<RistrettoPoint>,
}

/// Position in a [`ScratchSpace`] that can be rewound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    buffers: usize,
    terms: usize,
}

/// Handle to a scalar buffer allocated from a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarBuf {
    start: usize,
    len: usize,
}

impl ScalarBuf {
    /// Number of scalars in the buffer
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length buffer
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl ScratchSpace {
    /// Create an arena that will hand out at most `max_size` bytes
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    /// Byte limit of the arena
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Bytes currently allocated
    pub fn used(&self) -> usize {
        self.buffers.len() * SCALAR_COST + self.term_scalars.len() * TERM_COST
    }

    /// Current allocation position
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            buffers: self.buffers.len(),
            terms: self.term_scalars.len(),
        }
    }

    /// Release everything allocated after `checkpoint`
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.buffers.truncate(checkpoint.buffers);
        self.term_scalars.truncate(checkpoint.terms);
        self.term_points.truncate(checkpoint.terms);
    }

    /// Open a frame that rewinds to the current position when dropped
    pub fn frame(&mut self) -> ScratchFrame<'_> {
        let checkpoint = self.checkpoint();
        ScratchFrame {
            space: self,
            checkpoint,
        }
    }

    fn reserve(&self, bytes: usize) -> BulletproofsResult<()> {
        let available = self.max_size.saturating_sub(self.used());
        if bytes > available {
            return Err(BulletproofsError::ScratchExhausted {
                requested: bytes,
                available,
            });
        }
        Ok(())
    }
}

/// Allocation scope over a [`ScratchSpace`]
#[derive(Debug)]
pub struct ScratchFrame<'a> {
    space: &'a mut ScratchSpace,
    checkpoint: Checkpoint,
}

impl ScratchFrame<'_> {
    /// Allocate `len` zeroed scalars
    pub fn alloc_scalars(&mut self, len: usize) -> BulletproofsResult<ScalarBuf> {
        self.space.reserve(len.saturating_mul(SCALAR_COST))?;
        let start = self.space.buffers.len();
        self.space.buffers.resize(start + len, Scalar::ZERO);
        Ok(ScalarBuf { start, len })
    }

    /// Contents of a scalar buffer
    pub fn scalars(&self, buf: ScalarBuf) -> &[Scalar] {
        &self.space.buffers[buf.start..buf.start + buf.len]
    }

    /// Mutable contents of a scalar buffer
    pub fn scalars_mut(&mut self, buf: ScalarBuf) -> &mut [Scalar] {
        &mut self.space.buffers[buf.start..buf.start + buf.len]
    }

    /// Queue `scalar * point` for the final multiscalar multiplication
    pub fn push_term(&mut self, scalar: Scalar, point: RistrettoPoint) -> BulletproofsResult<()> {
        self.space.reserve(TERM_COST)?;
        self.space.term_scalars.push(scalar);
        self.space.term_points.push(point);
        Ok(())
    }

    /// Terms queued in this frame
    pub fn terms(&self) -> (&[Scalar], &[RistrettoPoint]) {
        let start = self.checkpoint.terms;
        (&self.space.term_scalars[start..], &self.space.term_points[start..])
    }

    /// Bytes allocated by this frame
    pub fn used(&self) -> usize {
        (self.space.buffers.len() - self.checkpoint.buffers) * SCALAR_COST
            + (self.space.term_scalars.len() - self.checkpoint.terms) * TERM_COST
    }

    /// Variable-time sum of the queued terms and the `extra` scalar/point pairs
    pub fn multiscalar_mul<'s, 'p, I, J>(&self, extra_scalars: I, extra_points: J) -> RistrettoPoint
    where
        I: IntoIterator<Item = &'s Scalar>,
        J: IntoIterator<Item = &'p RistrettoPoint>,
    {
        let (scalars, points) = self.terms();
        RistrettoPoint::vartime_multiscalar_mul(
            scalars.iter().copied().chain(extra_scalars.into_iter().copied()),
            points.iter().copied().chain(extra_points.into_iter().copied()),
        )
    }
}

impl Drop for ScratchFrame<'_> {
    fn drop(&mut self) {
        self.space.rewind(self.checkpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::{constants::RISTRETTO_BASEPOINT_POINT, traits::IsIdentity};

    #[test]
    fn test_frame_rewinds_on_drop() {
        let mut space = ScratchSpace::new(1 << 16);
        {
            let mut frame = space.frame();
            let buf = frame.alloc_scalars(8).unwrap();
            frame.scalars_mut(buf)[3] = Scalar::ONE;
            frame.push_term(Scalar::ONE, RISTRETTO_BASEPOINT_POINT).unwrap();
            assert_eq!(frame.used(), 8 * SCALAR_COST + TERM_COST);
        }
        assert_eq!(space.used(), 0);
    }

    #[test]
    fn test_frame_rewinds_on_error_path() {
        fn failing(space: &mut ScratchSpace) -> BulletproofsResult<()> {
            let mut frame = space.frame();
            frame.alloc_scalars(4)?;
            frame.alloc_scalars(1 << 20)?;
            Ok(())
        }

        let mut space = ScratchSpace::new(1024);
        let err = failing(&mut space).unwrap_err();
        assert!(matches!(err, BulletproofsError::ScratchExhausted { .. }));
        assert_eq!(space.used(), 0);
    }

    #[test]
    fn test_manual_checkpoint() {
        let mut space = ScratchSpace::new(1024);
        let outer = space.checkpoint();
        {
            let mut frame = space.frame();
            frame.alloc_scalars(2).unwrap();
        }
        assert_eq!(space.checkpoint(), outer);

        let mut frame = space.frame();
        frame.alloc_scalars(3).unwrap();
        std::mem::forget(frame);
        assert_eq!(space.used(), 3 * SCALAR_COST);
        space.rewind(outer);
        assert_eq!(space.used(), 0);
    }

    #[test]
    fn test_exhaustion_reports_available() {
        let mut space = ScratchSpace::new(3 * SCALAR_COST);
        let mut frame = space.frame();
        frame.alloc_scalars(2).unwrap();
        assert_eq!(
            frame.alloc_scalars(2),
            Err(BulletproofsError::ScratchExhausted {
                requested: 2 * SCALAR_COST,
                available: SCALAR_COST,
            })
        );
    }

    #[test]
    fn test_multiscalar_mul_cancels() {
        let mut space = ScratchSpace::new(1 << 12);
        let mut frame = space.frame();
        frame.push_term(Scalar::from(3u64), RISTRETTO_BASEPOINT_POINT).unwrap();
        let buf = frame.alloc_scalars(1).unwrap();
        frame.scalars_mut(buf)[0] = -Scalar::from(3u64);

        let result = frame.multiscalar_mul(frame.scalars(buf), [RISTRETTO_BASEPOINT_POINT].iter());
        assert!(result.is_identity());
    }

    #[test]
    fn test_multiscalar_mul_with_short_lived_extras() {
        let mut space = ScratchSpace::new(1 << 12);
        let mut frame = space.frame();
        frame.push_term(Scalar::from(2u64), RISTRETTO_BASEPOINT_POINT).unwrap();
        frame.push_term(Scalar::from(5u64), RISTRETTO_BASEPOINT_POINT).unwrap();

        let result = {
            let extra_scalars = vec![-Scalar::from(7u64)];
            let extra_points = vec![RISTRETTO_BASEPOINT_POINT];
            frame.multiscalar_mul(extra_scalars.iter(), extra_points.iter())
        };
        assert!(result.is_identity());

        let nonzero = frame.multiscalar_mul([&Scalar::ONE], [&RISTRETTO_BASEPOINT_POINT]);
        assert_eq!(nonzero, RISTRETTO_BASEPOINT_POINT * Scalar::from(8u64));
    }
}
