//! Sigma-protocol verifiers.
//!
//! Each verifier checks one non-interactive three-message proof: a
//! Schnorr proof of a discrete logarithm (over a scalar or product
//! basis), a conjunction sharing one challenge, or a
//! Cramer–Damgård–Schoenmakers disjunction whose subchallenges must sum
//! to the Fiat–Shamir challenge. Verifiers return `bool`: any structural
//! mismatch, failed check equation, or challenge inconsistency is simply
//! a non-verifying proof.

mod proof;
mod schnorr;
mod sigma_and;
mod sigma_or;

pub use proof::SigmaProof;
pub use schnorr::SchnorrVerifier;
pub use sigma_and::SigmaAnd;
pub use sigma_or::SigmaOr;

#[cfg(test)]
pub(crate) mod testing;
