//! The prime field `Fq` and its product ring.

use std::fmt;
use std::sync::Arc;

use egvr_arith::{Natural, PreparedDivisor, mod_inv};

use crate::{AlgebraError, ByteTree};

/// A prime-order field, shared read-only by its elements.
#[derive(Debug)]
pub struct Field {
    order: Natural,
    prepared: PreparedDivisor,
    byte_len: usize,
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for Field {}

impl Field {
    /// Creates the field of the given prime order. Primality is the
    /// caller's obligation; orders below two are rejected.
    pub fn new(order: Natural) -> Result<Arc<Self>, AlgebraError> {
        if order <= Natural::one() {
            return Err(AlgebraError::OutOfRange);
        }
        let prepared = PreparedDivisor::new(&order)?;
        let byte_len = order.bit_len().div_ceil(8);
        Ok(Arc::new(Self {
            order,
            prepared,
            byte_len,
        }))
    }

    /// The field order `q`.
    #[must_use]
    pub fn order(&self) -> &Natural {
        &self.order
    }

    /// Fixed serialized width of an element, in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// The additive identity.
    #[must_use]
    pub fn zero(self: &Arc<Self>) -> FieldElement {
        FieldElement {
            field: Arc::clone(self),
            value: Natural::zero(),
        }
    }

    /// The multiplicative identity.
    #[must_use]
    pub fn one(self: &Arc<Self>) -> FieldElement {
        FieldElement {
            field: Arc::clone(self),
            value: Natural::one(),
        }
    }

    /// An element from a canonical value; values at or above `q` are
    /// rejected.
    pub fn element(self: &Arc<Self>, value: Natural) -> Result<FieldElement, AlgebraError> {
        if value >= self.order {
            return Err(AlgebraError::OutOfRange);
        }
        Ok(FieldElement {
            field: Arc::clone(self),
            value,
        })
    }

    /// An element from an arbitrary natural, reduced modulo `q`.
    #[must_use]
    pub fn element_mod(self: &Arc<Self>, value: &Natural) -> FieldElement {
        FieldElement {
            field: Arc::clone(self),
            value: self.prepared.rem(value),
        }
    }

    /// An element from a big-endian byte string, reduced modulo `q`; used
    /// for hash digests, so no rejection sampling.
    #[must_use]
    pub fn element_from_bytes_mod_order(self: &Arc<Self>, bytes: &[u8]) -> FieldElement {
        self.element_mod(&Natural::from_bytes_be(bytes))
    }

    /// An element from a decimal string; must be a canonical residue.
    pub fn element_from_decimal(self: &Arc<Self>, text: &str) -> Result<FieldElement, AlgebraError> {
        self.element(Natural::from_decimal(text)?)
    }

    /// An element from a fixed-width leaf byte tree.
    pub fn element_from_byte_tree(
        self: &Arc<Self>,
        tree: &ByteTree,
    ) -> Result<FieldElement, AlgebraError> {
        match tree {
            ByteTree::Leaf(bytes) => {
                if bytes.len() != self.byte_len {
                    return Err(AlgebraError::WrongByteLength {
                        expected: self.byte_len,
                        actual: bytes.len(),
                    });
                }
                self.element(Natural::from_bytes_be(bytes))
            }
            ByteTree::Node(_) => Err(AlgebraError::UnexpectedShape(
                "expected a leaf for a field element".into(),
            )),
        }
    }
}

/// An element of a [`Field`], always reduced.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldElement {
    field: Arc<Field>,
    value: Natural,
}

impl FieldElement {
    /// The field this element belongs to.
    #[must_use]
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// The canonical value in `[0, q)`.
    #[must_use]
    pub fn value(&self) -> &Natural {
        &self.value
    }

    /// Whether this is the additive identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn ensure_same_field(&self, other: &Self) -> Result<(), AlgebraError> {
        if Arc::ptr_eq(&self.field, &other.field) || self.field == other.field {
            Ok(())
        } else {
            Err(AlgebraError::MixedStructures)
        }
    }

    /// Field addition.
    pub fn add(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.ensure_same_field(other)?;
        Ok(self.field.element_mod(&self.value.add(&other.value)))
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        if self.value.is_zero() {
            self.clone()
        } else {
            Self {
                field: Arc::clone(&self.field),
                // order - value never underflows for a reduced value
                value: self
                    .field
                    .order
                    .checked_sub(&self.value)
                    .unwrap_or_default(),
            }
        }
    }

    /// Field subtraction.
    pub fn sub(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.add(&other.neg())
    }

    /// Field multiplication.
    pub fn mul(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.ensure_same_field(other)?;
        Ok(self.field.element_mod(&self.value.mul(&other.value)))
    }

    /// Multiplicative inverse; zero has none.
    pub fn inv(&self) -> Result<Self, AlgebraError> {
        let inverse = mod_inv(&self.value, &self.field.order)?;
        self.field.element(inverse)
    }

    /// Fixed-width big-endian leaf.
    #[must_use]
    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::leaf(fixed_width_bytes(&self.value, self.field.byte_len))
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({} mod {})", self.value, self.field.order)
    }
}

/// Left-pads the big-endian bytes of `value` to `len` bytes.
pub(crate) fn fixed_width_bytes(value: &Natural, len: usize) -> Vec<u8> {
    let raw = value.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(raw.len())];
    out.extend_from_slice(&raw);
    out
}

/// An element of `Fq` or of the product ring `Fq^k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingElement {
    /// A single field element.
    Field(FieldElement),
    /// An ordered sequence of field elements; arithmetic is pointwise.
    Product(Vec<FieldElement>),
}

impl RingElement {
    /// Number of field-element components (1 for a scalar).
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::Field(_) => 1,
            Self::Product(parts) => parts.len(),
        }
    }

    /// Pointwise addition; widths must agree.
    pub fn add(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.pointwise(other, FieldElement::add)
    }

    /// Pointwise multiplication; widths must agree.
    pub fn mul(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.pointwise(other, FieldElement::mul)
    }

    /// Pointwise additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Field(elem) => Self::Field(elem.neg()),
            Self::Product(parts) => Self::Product(parts.iter().map(FieldElement::neg).collect()),
        }
    }

    fn pointwise(
        &self,
        other: &Self,
        op: impl Fn(&FieldElement, &FieldElement) -> Result<FieldElement, AlgebraError>,
    ) -> Result<Self, AlgebraError> {
        match (self, other) {
            (Self::Field(lhs), Self::Field(rhs)) => Ok(Self::Field(op(lhs, rhs)?)),
            (Self::Product(lhs), Self::Product(rhs)) => {
                if lhs.len() != rhs.len() {
                    return Err(AlgebraError::WidthMismatch {
                        expected: lhs.len(),
                        actual: rhs.len(),
                    });
                }
                let parts: Result<Vec<_>, _> =
                    lhs.iter().zip(rhs).map(|(a, b)| op(a, b)).collect();
                Ok(Self::Product(parts?))
            }
            (Self::Field(_), Self::Product(_)) | (Self::Product(_), Self::Field(_)) => {
                Err(AlgebraError::WidthMismatch {
                    expected: self.width(),
                    actual: other.width(),
                })
            }
        }
    }

    /// A leaf for a scalar, a node of component leaves for a product.
    #[must_use]
    pub fn to_byte_tree(&self) -> ByteTree {
        match self {
            Self::Field(elem) => elem.to_byte_tree(),
            Self::Product(parts) => {
                ByteTree::node(parts.iter().map(FieldElement::to_byte_tree).collect())
            }
        }
    }
}

impl From<FieldElement> for RingElement {
    fn from(elem: FieldElement) -> Self {
        Self::Field(elem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_field() -> Arc<Field> {
        Field::new(Natural::from(23u32)).expect("field")
    }

    #[test]
    fn rejects_tiny_orders() {
        assert!(Field::new(Natural::zero()).is_err());
        assert!(Field::new(Natural::one()).is_err());
    }

    #[test]
    fn canonical_elements_only() {
        let field = small_field();
        assert!(field.element(Natural::from(22u32)).is_ok());
        assert!(field.element(Natural::from(23u32)).is_err());
        assert_eq!(
            field.element_mod(&Natural::from(50u32)).value(),
            &Natural::from(4u32)
        );
    }

    #[test]
    fn additive_inverse_cancels() {
        let field = small_field();
        for v in 0u32..23 {
            let x = field.element(Natural::from(v)).expect("element");
            assert!(x.add(&x.neg()).expect("add").is_zero());
        }
    }

    #[test]
    fn multiplicative_inverse_cancels() {
        let field = small_field();
        for v in 1u32..23 {
            let x = field.element(Natural::from(v)).expect("element");
            let product = x.mul(&x.inv().expect("inv")).expect("mul");
            assert_eq!(product, field.one());
        }
    }

    #[test]
    fn zero_has_no_inverse() {
        let field = small_field();
        assert!(field.zero().inv().is_err());
    }

    #[test]
    fn cross_field_operations_fail() {
        let f23 = small_field();
        let f29 = Field::new(Natural::from(29u32)).expect("field");
        let a = f23.one();
        let b = f29.one();
        assert_eq!(a.add(&b), Err(AlgebraError::MixedStructures));
    }

    #[test]
    fn byte_tree_round_trip() {
        let field = Field::new(
            Natural::from_decimal("340282366920938463463374607431768211297").expect("decimal"),
        )
        .expect("field");
        let x = field.element(Natural::from(0xDEAD_BEEFu32)).expect("element");
        let tree = x.to_byte_tree();
        if let ByteTree::Leaf(bytes) = &tree {
            assert_eq!(bytes.len(), field.byte_len());
        } else {
            panic!("expected leaf");
        }
        assert_eq!(field.element_from_byte_tree(&tree).expect("parse"), x);
    }

    #[test]
    fn byte_tree_wrong_width_rejected() {
        let field = small_field();
        let tree = ByteTree::leaf(vec![0u8; 7]);
        assert!(matches!(
            field.element_from_byte_tree(&tree),
            Err(AlgebraError::WrongByteLength { .. })
        ));
    }

    #[test]
    fn digest_reduction() {
        let field = small_field();
        let elem = field.element_from_bytes_mod_order(&[0xFF; 32]);
        assert!(elem.value() < field.order());
    }

    #[test]
    fn product_ring_pointwise() {
        let field = small_field();
        let make = |values: &[u32]| {
            RingElement::Product(
                values
                    .iter()
                    .map(|&v| field.element(Natural::from(v)).expect("element"))
                    .collect(),
            )
        };
        let a = make(&[1, 2, 3]);
        let b = make(&[4, 5, 6]);
        assert_eq!(a.add(&b).expect("add"), make(&[5, 7, 9]));
        assert_eq!(a.mul(&b).expect("mul"), make(&[4, 10, 18]));
        assert!(a.add(&make(&[1, 2])).is_err());
    }
}
