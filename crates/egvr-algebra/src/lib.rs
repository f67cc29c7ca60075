//! Algebraic structures for election-record verification.
//!
//! Byte trees (the canonical Fiat–Shamir hash input), the prime field `Fq`
//! and its product ring, the order-`q` subgroup of `Z*p` and its product
//! group, exponentiation homomorphisms, the SHA-256 challenge derivation,
//! and the baseline ElectionGuard parameters.

mod byte_tree;
mod error;
mod field;
mod group;
mod hash;
mod hom;
pub mod params;

pub use byte_tree::{ByteTree, ByteTreeError};
pub use error::AlgebraError;
pub use field::{Field, FieldElement, RingElement};
pub use group::{GroupElement, ModPElement, ModPGroup, ProductElement, ProductGroup};
pub use hash::challenge;
pub use hom::ExpHom;
