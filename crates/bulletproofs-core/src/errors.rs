//! Error types for Bulletproofs operations

use thiserror::Error;

/// Main error type for Bulletproofs operations
///
/// Verification deliberately collapses every malformed-proof and failed-equation
/// case into [`BulletproofsError::VerificationFailed`], so callers cannot learn
/// which part of a proof was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BulletproofsError {
    /// Verification failed
    #[error("Proof verification failed")]
    VerificationFailed,

    /// Invalid parameters provided
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Vector length mismatch
    #[error("Vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },

    /// Insufficient generators
    #[error("Insufficient generators: need {needed}, have {available}")]
    InsufficientGenerators { needed: usize, available: usize },

    /// Generator or table storage could not be reserved
    #[error("Allocation failure")]
    AllocationFailure,

    /// Scratch space could not satisfy an allocation
    #[error("Scratch space exhausted: requested {requested} bytes, {available} available")]
    ScratchExhausted { requested: usize, available: usize },

    /// Output buffer too small for the serialized proof
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Range constraint violation
    #[error("Value is not in range [min, min + 2^{bits})")]
    ValueOutOfRange { bits: usize },

    /// A blinding factor was zero
    #[error("Degenerate blinding factor")]
    DegenerateBlinding,

    /// Nonce did not reproduce an opening of the commitment
    #[error("Rewind failed")]
    RewindFailed,
}

/// Result type for Bulletproofs operations
pub type BulletproofsResult<T> = Result<T, BulletproofsError>;
