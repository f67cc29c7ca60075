//! Conjunction of sigma proofs under one challenge.

use egvr_algebra::{ByteTree, GroupElement, challenge};
use itertools::Itertools as _;

use crate::{SchnorrVerifier, SigmaProof};

const LOG_TARGET: &str = "egvr_sigma::and";

/// Verifies a conjunction of sigma statements: every subproof must carry
/// the same challenge, that challenge must be the Fiat–Shamir challenge
/// of the combined transcript, and every check equation must hold.
#[derive(Debug, Clone)]
pub struct SigmaAnd {
    verifiers: Vec<SchnorrVerifier>,
}

impl SigmaAnd {
    /// A conjunction over the given per-statement verifiers.
    #[must_use]
    pub fn new(verifiers: Vec<SchnorrVerifier>) -> Self {
        Self { verifiers }
    }

    /// Verifies instances and subproofs paired positionally.
    #[must_use]
    pub fn verify(&self, label: &[u8], instances: &[GroupElement], proofs: &[SigmaProof]) -> bool {
        if instances.len() != self.verifiers.len() || proofs.len() != self.verifiers.len() {
            tracing::debug!(target: LOG_TARGET, "sub-statement count mismatch");
            return false;
        }
        let Some(first) = proofs.first() else {
            return false;
        };
        if !proofs.iter().map(|proof| &proof.challenge).all_equal() {
            tracing::debug!(target: LOG_TARGET, "subproofs disagree on the shared challenge");
            return false;
        }

        let instance_tree = ByteTree::node(
            instances
                .iter()
                .map(GroupElement::to_byte_tree)
                .collect(),
        );
        let commitment_tree = ByteTree::node(
            proofs
                .iter()
                .map(|proof| proof.commitment.to_byte_tree())
                .collect(),
        );
        let derived = challenge(
            label,
            instance_tree,
            commitment_tree,
            first.challenge.field(),
        );
        if derived != first.challenge {
            tracing::debug!(target: LOG_TARGET, "shared challenge is not the derived challenge");
            return false;
        }

        self.verifiers
            .iter()
            .zip(instances)
            .zip(proofs)
            .all(|((verifier, instance), proof)| verifier.check_equation(instance, proof))
    }
}
