//! Schnorr proof verification.

use egvr_algebra::{ExpHom, GroupElement, RingElement, challenge};

use crate::SigmaProof;

const LOG_TARGET: &str = "egvr_sigma::schnorr";

/// Verifies Schnorr proofs of knowledge of a discrete logarithm under an
/// exponentiation homomorphism: for instance `Y` and proof `(A, c, z)`,
/// checks `c = H(label, Y, A)` and `Y^c · A = b^z`.
///
/// Over a product basis `(g, K)` this is exactly a Chaum–Pedersen proof:
/// the instance `(A, B)` shares one witness across both components.
#[derive(Debug, Clone)]
pub struct SchnorrVerifier {
    hom: ExpHom,
}

impl SchnorrVerifier {
    /// A verifier for statements about the given homomorphism.
    #[must_use]
    pub fn new(hom: ExpHom) -> Self {
        Self { hom }
    }

    /// The underlying homomorphism.
    #[must_use]
    pub fn hom(&self) -> &ExpHom {
        &self.hom
    }

    /// Full verification: the on-wire challenge must equal the
    /// Fiat–Shamir challenge derived from `(label, instance,
    /// commitment)`, and the check equation must hold.
    #[must_use]
    pub fn verify(&self, label: &[u8], instance: &GroupElement, proof: &SigmaProof) -> bool {
        let derived = challenge(
            label,
            instance.to_byte_tree(),
            proof.commitment.to_byte_tree(),
            self.hom.domain(),
        );
        if derived != proof.challenge {
            tracing::debug!(
                target: LOG_TARGET,
                "on-wire challenge differs from the derived challenge"
            );
            return false;
        }
        self.check_equation(instance, proof)
    }

    /// The bare check equation `Y^c · A = b^z`, with the proof's own
    /// challenge taken as given. Disjunctions call this per branch and
    /// constrain the challenges separately.
    #[must_use]
    pub fn check_equation(&self, instance: &GroupElement, proof: &SigmaProof) -> bool {
        let lhs = instance
            .exp(&RingElement::Field(proof.challenge.clone()))
            .and_then(|y_c| y_c.mul(&proof.commitment));
        let rhs = self.hom.eval(&RingElement::Field(proof.response.clone()));
        match (lhs, rhs) {
            (Ok(lhs), Ok(rhs)) => lhs == rhs,
            (Err(error), _) | (_, Err(error)) => {
                tracing::debug!(target: LOG_TARGET, %error, "check equation is malformed");
                false
            }
        }
    }
}
