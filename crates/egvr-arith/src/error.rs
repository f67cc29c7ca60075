//! Error type for arithmetic operations.

/// Errors that can occur in big-integer and modular arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    /// Division or reduction by zero
    #[error("Division by zero")]
    DivisionByZero,
    /// Subtraction would produce a negative natural
    #[error("Subtraction underflow")]
    Underflow,
    /// Modulus of a modular operation is zero
    #[error("Modulus must be positive")]
    NonPositiveModulus,
    /// Modulus of an inversion or square root is even
    #[error("Modulus must be odd")]
    EvenModulus,
    /// Operand has no inverse modulo the given modulus
    #[error("Element is not invertible")]
    NotInvertible,
    /// Square root of a quadratic non-residue
    #[error("Not a quadratic residue!")]
    NonResidue,
    /// Exponent of a modular power is negative
    #[error("Exponent must be non-negative")]
    NegativeExponent,
    /// Paired sequences (bases and exponents) differ in length
    #[error("Expected {expected} values, got {actual}")]
    MismatchedLengths {
        /// Length required by the operation
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
    /// Malformed textual or binary representation of a natural
    #[error("Invalid number representation: {0}")]
    ParseNatural(String),
}
