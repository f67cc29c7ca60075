//! The order-`q` subgroup of `Z*p` and its product group.
//!
//! Membership of a candidate value is the quadratic-residue test: every
//! element of the subgroup generated by the baseline generator is a
//! residue, and the message encoding maps each coset representative onto
//! its residue. Candidates failing the test are rejected at parse time
//! with the observable "Not a quadratic residue!" error.

use std::fmt;
use std::sync::{Arc, OnceLock};

use egvr_arith::{FixedBasePow, Natural, PreparedDivisor, legendre, mod_inv, mod_pow};

use crate::field::fixed_width_bytes;
use crate::{AlgebraError, ByteTree, Field, FieldElement, RingElement};

/// Length of the big-endian message-length prefix inside an encoded
/// group element.
const ENCODE_PREFIX_LEN: usize = 4;

/// A multiplicative subgroup of `Z*p` of prime order `q`, shared
/// read-only by its elements.
#[derive(Debug)]
pub struct ModPGroup {
    modulus: Natural,
    generator: Natural,
    field: Arc<Field>,
    prepared: PreparedDivisor,
    byte_len: usize,
}

impl PartialEq for ModPGroup {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
            && self.generator == other.generator
            && self.field == other.field
    }
}

impl Eq for ModPGroup {}

impl ModPGroup {
    /// Creates the group from wire or baseline parameters, checking the
    /// generator: `1 ≤ g < p`, `g` a residue, and `g^q = 1 (mod p)`.
    pub fn new(
        modulus: Natural,
        order: Natural,
        generator: Natural,
    ) -> Result<Arc<Self>, AlgebraError> {
        if modulus.is_even() || modulus <= Natural::from(3u32) {
            return Err(AlgebraError::OutOfRange);
        }
        let field = Field::new(order)?;
        if generator.is_zero() || generator.is_one() || generator >= modulus {
            return Err(AlgebraError::BadGenerator);
        }
        if legendre(&generator, &modulus)? != 1 {
            return Err(AlgebraError::BadGenerator);
        }
        if !mod_pow(&generator, field.order(), &modulus)?.is_one() {
            return Err(AlgebraError::BadGenerator);
        }
        let prepared = PreparedDivisor::new(&modulus)?;
        let byte_len = modulus.bit_len().div_ceil(8);
        Ok(Arc::new(Self {
            modulus,
            generator,
            field,
            prepared,
            byte_len,
        }))
    }

    /// The modulus `p`.
    #[must_use]
    pub fn modulus(&self) -> &Natural {
        &self.modulus
    }

    /// The order `q` of the subgroup.
    #[must_use]
    pub fn order(&self) -> &Natural {
        self.field.order()
    }

    /// The exponent field `Fq`.
    #[must_use]
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// Fixed serialized width of an element, in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Largest message length the group can encode.
    #[must_use]
    pub fn encode_len(&self) -> usize {
        self.byte_len.saturating_sub(ENCODE_PREFIX_LEN + 1)
    }

    /// The group generator `g`.
    #[must_use]
    pub fn generator(self: &Arc<Self>) -> ModPElement {
        ModPElement {
            group: Arc::clone(self),
            value: self.generator.clone(),
            fixed: OnceLock::new(),
        }
    }

    /// The identity element.
    #[must_use]
    pub fn one(self: &Arc<Self>) -> ModPElement {
        ModPElement {
            group: Arc::clone(self),
            value: Natural::one(),
            fixed: OnceLock::new(),
        }
    }

    /// An element from a candidate value: requires `1 ≤ v < p` and
    /// quadratic residuosity.
    pub fn element(self: &Arc<Self>, value: Natural) -> Result<ModPElement, AlgebraError> {
        if value.is_zero() || value >= self.modulus {
            return Err(AlgebraError::OutOfRange);
        }
        if !value.is_one() && legendre(&value, &self.modulus)? != 1 {
            return Err(AlgebraError::NotQuadraticResidue);
        }
        Ok(ModPElement {
            group: Arc::clone(self),
            value,
            fixed: OnceLock::new(),
        })
    }

    /// An element from big-endian bytes.
    pub fn element_from_bytes(self: &Arc<Self>, bytes: &[u8]) -> Result<ModPElement, AlgebraError> {
        self.element(Natural::from_bytes_be(bytes))
    }

    /// An element from a decimal string.
    pub fn element_from_decimal(self: &Arc<Self>, text: &str) -> Result<ModPElement, AlgebraError> {
        self.element(Natural::from_decimal(text)?)
    }

    /// An element from a fixed-width leaf byte tree.
    pub fn element_from_byte_tree(
        self: &Arc<Self>,
        tree: &ByteTree,
    ) -> Result<ModPElement, AlgebraError> {
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
                "expected a leaf for a group element".into(),
            )),
        }
    }

    /// Encodes a message into a group element: a 4-byte big-endian length
    /// prefix, the payload, and zero padding to one byte short of the
    /// element width; the residue of the resulting value and its additive
    /// inverse is taken. A zero-length message gets one nonzero pad byte
    /// so the value is never zero.
    pub fn encode(self: &Arc<Self>, message: &[u8]) -> Result<ModPElement, AlgebraError> {
        let max = self.encode_len();
        if max == 0 || message.len() > max {
            return Err(AlgebraError::MessageTooLong {
                len: message.len(),
                max,
            });
        }
        let mut buffer = vec![0u8; self.byte_len - 1];
        buffer[..ENCODE_PREFIX_LEN].copy_from_slice(&(message.len() as u32).to_be_bytes());
        buffer[ENCODE_PREFIX_LEN..ENCODE_PREFIX_LEN + message.len()].copy_from_slice(message);
        if message.is_empty() {
            buffer[ENCODE_PREFIX_LEN] = 1;
        }
        let candidate = Natural::from_bytes_be(&buffer).rem(&self.modulus)?;
        let value = if legendre(&candidate, &self.modulus)? == 1 {
            candidate
        } else {
            self.modulus.sub(&candidate)?
        };
        self.element(value)
    }
}

/// An element of a [`ModPGroup`].
pub struct ModPElement {
    group: Arc<ModPGroup>,
    value: Natural,
    /// Fixed-base table installed by [`ModPElement::fix`].
    fixed: OnceLock<FixedBasePow>,
}

impl Clone for ModPElement {
    fn clone(&self) -> Self {
        Self {
            group: Arc::clone(&self.group),
            value: self.value.clone(),
            fixed: self.fixed.clone(),
        }
    }
}

impl PartialEq for ModPElement {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && *self.group == *other.group
    }
}

impl Eq for ModPElement {}

impl fmt::Debug for ModPElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModPElement({})", self.value)
    }
}

impl ModPElement {
    /// The group this element belongs to.
    #[must_use]
    pub fn group(&self) -> &Arc<ModPGroup> {
        &self.group
    }

    /// The canonical value in `[1, p)`.
    #[must_use]
    pub fn value(&self) -> &Natural {
        &self.value
    }

    /// Whether this is the identity.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    fn ensure_same_group(&self, other: &Self) -> Result<(), AlgebraError> {
        if Arc::ptr_eq(&self.group, &other.group) || self.group == other.group {
            Ok(())
        } else {
            Err(AlgebraError::MixedStructures)
        }
    }

    /// Group multiplication.
    pub fn mul(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.ensure_same_group(other)?;
        Ok(Self {
            group: Arc::clone(&self.group),
            value: self.group.prepared.rem(&self.value.mul(&other.value)),
            fixed: OnceLock::new(),
        })
    }

    /// Multiplicative inverse.
    pub fn inv(&self) -> Result<Self, AlgebraError> {
        Ok(Self {
            group: Arc::clone(&self.group),
            value: mod_inv(&self.value, &self.group.modulus)?,
            fixed: OnceLock::new(),
        })
    }

    /// Exponentiation by a field element of the group's exponent field.
    pub fn exp(&self, exponent: &FieldElement) -> Result<Self, AlgebraError> {
        if exponent.field() != &self.group.field {
            return Err(AlgebraError::MixedStructures);
        }
        self.exp_natural(exponent.value())
    }

    /// Exponentiation by a raw natural, through the fixed-base table when
    /// one is installed.
    pub fn exp_natural(&self, exponent: &Natural) -> Result<Self, AlgebraError> {
        let value = match self.fixed.get() {
            Some(table) => table.pow(exponent)?,
            None => mod_pow(&self.value, exponent, &self.group.modulus)?,
        };
        Ok(Self {
            group: Arc::clone(&self.group),
            value,
            fixed: OnceLock::new(),
        })
    }

    /// Installs a fixed-base precomputation sized for `amortization`
    /// future exponentiations of this element. Idempotent.
    pub fn fix(&self, amortization: usize) -> Result<(), AlgebraError> {
        if self.fixed.get().is_some() {
            return Ok(());
        }
        let table = FixedBasePow::new(
            &self.value,
            self.group.order().bit_len(),
            amortization,
            &self.group.modulus,
        )?;
        let _ = self.fixed.set(table);
        Ok(())
    }

    /// Fixed-width big-endian leaf.
    #[must_use]
    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::leaf(fixed_width_bytes(&self.value, self.group.byte_len))
    }

    /// Decodes the message this element encodes (see
    /// [`ModPGroup::encode`]): the smaller of `v` and `p - v` carries the
    /// length-prefixed payload.
    pub fn decode(&self) -> Result<Vec<u8>, AlgebraError> {
        if self.group.encode_len() == 0 {
            return Err(AlgebraError::UnexpectedShape(
                "group too small to carry encoded messages".into(),
            ));
        }
        let complement = self.group.modulus.sub(&self.value)?;
        let candidate = if self.value <= complement {
            &self.value
        } else {
            &complement
        };
        let buffer = fixed_width_bytes(candidate, self.group.byte_len - 1);
        if buffer.len() != self.group.byte_len - 1 {
            return Err(AlgebraError::UnexpectedShape(
                "encoded value out of range".into(),
            ));
        }
        let mut prefix = [0u8; ENCODE_PREFIX_LEN];
        prefix.copy_from_slice(&buffer[..ENCODE_PREFIX_LEN]);
        let len = u32::from_be_bytes(prefix) as usize;
        if len > self.group.encode_len() {
            return Err(AlgebraError::UnexpectedShape(format!(
                "declared message length {len} exceeds capacity"
            )));
        }
        Ok(buffer[ENCODE_PREFIX_LEN..ENCODE_PREFIX_LEN + len].to_vec())
    }
}

/// A product of groups; all factors are `ModPGroup`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGroup {
    factors: Vec<Arc<ModPGroup>>,
}

impl ProductGroup {
    /// The product of the given factor groups.
    pub fn new(factors: Vec<Arc<ModPGroup>>) -> Result<Self, AlgebraError> {
        if factors.is_empty() {
            return Err(AlgebraError::WidthMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self { factors })
    }

    /// `width` copies of one group.
    pub fn uniform(group: &Arc<ModPGroup>, width: usize) -> Result<Self, AlgebraError> {
        Self::new(vec![Arc::clone(group); width])
    }

    /// Number of factors.
    #[must_use]
    pub fn width(&self) -> usize {
        self.factors.len()
    }

    /// Builds an element from per-component elements.
    pub fn prod(&self, components: Vec<ModPElement>) -> Result<ProductElement, AlgebraError> {
        if components.len() != self.factors.len() {
            return Err(AlgebraError::WidthMismatch {
                expected: self.factors.len(),
                actual: components.len(),
            });
        }
        for (component, factor) in components.iter().zip(&self.factors) {
            if !Arc::ptr_eq(component.group(), factor) && *component.group().as_ref() != **factor {
                return Err(AlgebraError::MixedStructures);
            }
        }
        Ok(ProductElement { components })
    }

    /// Broadcasts one element across every factor; all factors must be
    /// the element's group.
    pub fn broadcast(&self, component: &ModPElement) -> Result<ProductElement, AlgebraError> {
        self.prod(vec![component.clone(); self.factors.len()])
    }
}

/// An element of a [`ProductGroup`]; operations are pointwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductElement {
    components: Vec<ModPElement>,
}

impl ProductElement {
    /// Builds an element directly from components.
    pub fn new(components: Vec<ModPElement>) -> Result<Self, AlgebraError> {
        if components.is_empty() {
            return Err(AlgebraError::WidthMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self { components })
    }

    /// The ordered components.
    #[must_use]
    pub fn components(&self) -> &[ModPElement] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn width(&self) -> usize {
        self.components.len()
    }

    /// Pointwise multiplication.
    pub fn mul(&self, other: &Self) -> Result<Self, AlgebraError> {
        if self.width() != other.width() {
            return Err(AlgebraError::WidthMismatch {
                expected: self.width(),
                actual: other.width(),
            });
        }
        let components: Result<Vec<_>, _> = self
            .components
            .iter()
            .zip(&other.components)
            .map(|(a, b)| a.mul(b))
            .collect();
        Ok(Self {
            components: components?,
        })
    }

    /// Pointwise inverse.
    pub fn inv(&self) -> Result<Self, AlgebraError> {
        let components: Result<Vec<_>, _> =
            self.components.iter().map(ModPElement::inv).collect();
        Ok(Self {
            components: components?,
        })
    }

    /// Exponentiation: a scalar is broadcast to every component, a
    /// product-ring exponent of matching width applies componentwise.
    pub fn exp(&self, exponent: &RingElement) -> Result<Self, AlgebraError> {
        let components: Result<Vec<_>, _> = match exponent {
            RingElement::Field(scalar) => {
                self.components.iter().map(|c| c.exp(scalar)).collect()
            }
            RingElement::Product(parts) => {
                if parts.len() != self.width() {
                    return Err(AlgebraError::WidthMismatch {
                        expected: self.width(),
                        actual: parts.len(),
                    });
                }
                self.components
                    .iter()
                    .zip(parts)
                    .map(|(c, e)| c.exp(e))
                    .collect()
            }
        };
        Ok(Self {
            components: components?,
        })
    }

    /// A node over the component byte trees.
    #[must_use]
    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::node(
            self.components
                .iter()
                .map(ModPElement::to_byte_tree)
                .collect(),
        )
    }
}

/// A group element of either shape, giving the sigma layer one type to
/// multiply, invert, exponentiate, and serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupElement {
    /// An element of a scalar group.
    ModP(ModPElement),
    /// An element of a product group.
    Product(ProductElement),
}

impl GroupElement {
    /// Number of scalar components.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::ModP(_) => 1,
            Self::Product(elem) => elem.width(),
        }
    }

    /// Group multiplication; shapes must agree.
    pub fn mul(&self, other: &Self) -> Result<Self, AlgebraError> {
        match (self, other) {
            (Self::ModP(lhs), Self::ModP(rhs)) => Ok(Self::ModP(lhs.mul(rhs)?)),
            (Self::Product(lhs), Self::Product(rhs)) => Ok(Self::Product(lhs.mul(rhs)?)),
            (Self::ModP(_), Self::Product(_)) | (Self::Product(_), Self::ModP(_)) => {
                Err(AlgebraError::WidthMismatch {
                    expected: self.width(),
                    actual: other.width(),
                })
            }
        }
    }

    /// Multiplicative inverse.
    pub fn inv(&self) -> Result<Self, AlgebraError> {
        match self {
            Self::ModP(elem) => Ok(Self::ModP(elem.inv()?)),
            Self::Product(elem) => Ok(Self::Product(elem.inv()?)),
        }
    }

    /// Exponentiation by a ring element; a scalar exponent broadcasts
    /// over product elements.
    pub fn exp(&self, exponent: &RingElement) -> Result<Self, AlgebraError> {
        match (self, exponent) {
            (Self::ModP(elem), RingElement::Field(scalar)) => Ok(Self::ModP(elem.exp(scalar)?)),
            (Self::ModP(_), RingElement::Product(_)) => Err(AlgebraError::WidthMismatch {
                expected: 1,
                actual: exponent.width(),
            }),
            (Self::Product(elem), _) => Ok(Self::Product(elem.exp(exponent)?)),
        }
    }

    /// The canonical byte tree.
    #[must_use]
    pub fn to_byte_tree(&self) -> ByteTree {
        match self {
            Self::ModP(elem) => elem.to_byte_tree(),
            Self::Product(elem) => elem.to_byte_tree(),
        }
    }
}

impl From<ModPElement> for GroupElement {
    fn from(elem: ModPElement) -> Self {
        Self::ModP(elem)
    }
}

impl From<ProductElement> for GroupElement {
    fn from(elem: ProductElement) -> Self {
        Self::Product(elem)
    }
}
