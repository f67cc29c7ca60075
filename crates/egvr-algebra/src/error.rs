//! Error type for algebraic operations.

use egvr_arith::ArithError;

use crate::ByteTreeError;

/// Errors constructing or combining field and group values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgebraError {
    /// Candidate group element fails the quadratic-residue membership test
    #[error("Not a quadratic residue!")]
    NotQuadraticResidue,
    /// Candidate element is outside `[1, p)` or `[0, q)`
    #[error("Value out of range")]
    OutOfRange,
    /// Operands belong to different fields or groups
    #[error("Elements belong to different structures")]
    MixedStructures,
    /// Product structure widths disagree
    #[error("Expected width {expected}, got {actual}")]
    WidthMismatch {
        /// Width required by the operation
        expected: usize,
        /// Width actually supplied
        actual: usize,
    },
    /// Message does not fit the group's encoding capacity
    #[error("Message of {len} bytes exceeds the {max}-byte encoding limit")]
    MessageTooLong {
        /// Message length in bytes
        len: usize,
        /// Largest encodable length
        max: usize,
    },
    /// Byte string has the wrong length for a fixed-width element
    #[error("Expected {expected} bytes, got {actual}")]
    WrongByteLength {
        /// Fixed width of the structure
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
    /// Byte tree has the wrong shape for the expected value
    #[error("Unexpected byte tree shape: {0}")]
    UnexpectedShape(String),
    /// Generator does not generate an order-`q` subgroup
    #[error("Generator does not have the stated order")]
    BadGenerator,
    /// Underlying arithmetic failure
    #[error(transparent)]
    Arith(#[from] ArithError),
    /// Underlying byte tree decoding failure
    #[error(transparent)]
    ByteTree(#[from] ByteTreeError),
}
