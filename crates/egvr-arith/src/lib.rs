//! Arbitrary-precision naturals and modular arithmetic.
//!
//! This crate is the arithmetic substrate of the election-record verifier:
//! unsigned magnitudes ([`Natural`]), a signed-magnitude wrapper
//! ([`Integer`]) for extended-GCD intermediates, and the modular routines
//! (windowed exponentiation, simultaneous exponentiation, inversion,
//! square roots, Legendre symbols) the group and field layers build on.
//!
//! Nothing in this crate is constant-time. Operand values leak through
//! timing, so it must not be used where a side-channel adversary can
//! observe secret-dependent execution. The verifier only ever handles
//! public election data.

mod div;
mod error;
mod integer;
mod modular;
mod mul;
mod natural;

pub use div::PreparedDivisor;
pub use error::ArithError;
pub use integer::{Integer, Sign};
pub use modular::{FixedBasePow, SimultaneousPow, legendre, mod_inv, mod_pow, mod_prod_pow, mod_sqrt};
pub use natural::Natural;
