//! Signed-magnitude integers.
//!
//! [`Integer`] exists for the intermediates of the binary extended GCD,
//! which go negative before the final reduction back into `[0, m)`.
//! Production exponentiation paths work on [`Natural`] magnitudes only.

use std::cmp::Ordering;
use std::fmt;

use crate::{ArithError, Natural};

/// Sign of an [`Integer`]; `Zero` iff the magnitude is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Strictly negative.
    Negative,
    /// The value zero.
    Zero,
    /// Strictly positive.
    Positive,
}

/// An arbitrary-precision signed integer.
#[derive(Clone, PartialEq, Eq)]
pub struct Integer {
    sign: Sign,
    magnitude: Natural,
}

impl Integer {
    /// The value zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            sign: Sign::Zero,
            magnitude: Natural::zero(),
        }
    }

    /// The sign.
    #[must_use]
    pub const fn sign(&self) -> Sign {
        self.sign
    }

    /// The magnitude.
    #[must_use]
    pub fn magnitude(&self) -> &Natural {
        &self.magnitude
    }

    /// Whether this value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self.sign, Sign::Zero)
    }

    /// Whether the magnitude is even. Zero is even.
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.magnitude.is_even()
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        let sign = match self.sign {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        };
        Self {
            sign,
            magnitude: self.magnitude.clone(),
        }
    }

    /// Sum of `self` and `other`.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        match (self.sign, other.sign) {
            (Sign::Zero, _) => other.clone(),
            (_, Sign::Zero) => self.clone(),
            (lhs, rhs) if lhs == rhs => Self {
                sign: lhs,
                magnitude: self.magnitude.add(&other.magnitude),
            },
            _ => {
                // Opposite signs: the larger magnitude wins.
                match self.magnitude.cmp(&other.magnitude) {
                    Ordering::Equal => Self::zero(),
                    Ordering::Greater => Self {
                        sign: self.sign,
                        magnitude: self
                            .magnitude
                            .checked_sub(&other.magnitude)
                            .unwrap_or_default(),
                    },
                    Ordering::Less => Self {
                        sign: other.sign,
                        magnitude: other
                            .magnitude
                            .checked_sub(&self.magnitude)
                            .unwrap_or_default(),
                    },
                }
            }
        }
    }

    /// Difference `self - other`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Exact halving; the value must be even.
    #[must_use]
    pub fn halve(&self) -> Self {
        debug_assert!(self.is_even());
        let magnitude = self.magnitude.shr(1);
        let sign = if magnitude.is_zero() {
            Sign::Zero
        } else {
            self.sign
        };
        Self { sign, magnitude }
    }

    /// Least non-negative residue modulo `modulus`.
    pub fn rem_euclid(&self, modulus: &Natural) -> Result<Natural, ArithError> {
        let reduced = self.magnitude.rem(modulus)?;
        match self.sign {
            Sign::Negative if !reduced.is_zero() => modulus.sub(&reduced),
            Sign::Negative | Sign::Zero | Sign::Positive => Ok(reduced),
        }
    }
}

impl From<Natural> for Integer {
    fn from(magnitude: Natural) -> Self {
        let sign = if magnitude.is_zero() {
            Sign::Zero
        } else {
            Sign::Positive
        };
        Self { sign, magnitude }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.sign, Sign::Negative) {
            write!(f, "-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({self})")
    }
}
