//! Exponentiation homomorphisms.

use std::sync::Arc;

use crate::{AlgebraError, Field, GroupElement, RingElement};

/// The homomorphism `x ↦ b^x` from a ring into a group.
///
/// Over a product basis `(b₁, b₂, …)` a scalar exponent is applied to
/// every component at once, so a single witness drives simultaneous
/// exponentiations — the shape Chaum–Pedersen statements need.
#[derive(Debug, Clone)]
pub struct ExpHom {
    domain: Arc<Field>,
    basis: GroupElement,
}

impl ExpHom {
    /// A homomorphism with the given exponent domain and basis.
    pub fn new(domain: Arc<Field>, basis: GroupElement) -> Self {
        Self { domain, basis }
    }

    /// The exponent domain.
    #[must_use]
    pub fn domain(&self) -> &Arc<Field> {
        &self.domain
    }

    /// The basis `b`.
    #[must_use]
    pub fn basis(&self) -> &GroupElement {
        &self.basis
    }

    /// Evaluates the homomorphism at `exponent`.
    pub fn eval(&self, exponent: &RingElement) -> Result<GroupElement, AlgebraError> {
        match exponent {
            RingElement::Field(scalar) if scalar.field() != &self.domain => {
                Err(AlgebraError::MixedStructures)
            }
            RingElement::Field(_) | RingElement::Product(_) => self.basis.exp(exponent),
        }
    }
}
