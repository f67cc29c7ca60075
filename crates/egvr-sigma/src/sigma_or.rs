//! Cramer–Damgård–Schoenmakers disjunctions.

use egvr_algebra::{ByteTree, FieldElement, GroupElement, challenge};

use crate::{SchnorrVerifier, SigmaProof};

const LOG_TARGET: &str = "egvr_sigma::or";

/// Verifies a CDS "OR" composition: each subproof carries its own
/// challenge and must satisfy its check equation, and the subchallenges
/// must sum (in `Fq`) to the Fiat–Shamir challenge of the combined
/// transcript. The prover can simulate every branch but one, so a valid
/// proof shows one statement holds without revealing which.
#[derive(Debug, Clone)]
pub struct SigmaOr {
    verifiers: Vec<SchnorrVerifier>,
}

impl SigmaOr {
    /// A disjunction over the given per-branch verifiers; all share the
    /// challenge space.
    #[must_use]
    pub fn new(verifiers: Vec<SchnorrVerifier>) -> Self {
        Self { verifiers }
    }

    /// Verifies with short-circuiting on the first failing branch.
    #[must_use]
    pub fn verify(&self, label: &[u8], instances: &[GroupElement], proofs: &[SigmaProof]) -> bool {
        self.verify_with(label, instances, proofs, false)
    }

    /// Verifies branches in index order. With `enumerate_all`, every
    /// branch is checked (and logged) even after a failure, for
    /// diagnostics; the result is unchanged.
    #[must_use]
    pub fn verify_with(
        &self,
        label: &[u8],
        instances: &[GroupElement],
        proofs: &[SigmaProof],
        enumerate_all: bool,
    ) -> bool {
        if instances.len() != self.verifiers.len() || proofs.len() != self.verifiers.len() {
            tracing::debug!(target: LOG_TARGET, "branch count mismatch");
            return false;
        }
        let Some(first) = proofs.first() else {
            return false;
        };

        let mut ok = true;
        for (index, ((verifier, instance), proof)) in self
            .verifiers
            .iter()
            .zip(instances)
            .zip(proofs)
            .enumerate()
        {
            if !verifier.check_equation(instance, proof) {
                tracing::debug!(target: LOG_TARGET, index, "branch equation fails");
                ok = false;
                if !enumerate_all {
                    return false;
                }
            }
        }

        let Some(sum) = challenge_sum(proofs) else {
            return false;
        };
        let instance_tree =
            ByteTree::node(instances.iter().map(GroupElement::to_byte_tree).collect());
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
        if derived != sum {
            tracing::debug!(
                target: LOG_TARGET,
                "subchallenges do not sum to the derived challenge"
            );
            return false;
        }
        ok
    }
}

/// Sum of the subproof challenges in their common field; `None` when the
/// challenges live in different fields.
fn challenge_sum(proofs: &[SigmaProof]) -> Option<FieldElement> {
    let mut iter = proofs.iter();
    let mut sum = iter.next()?.challenge.clone();
    for proof in iter {
        sum = sum.add(&proof.challenge).ok()?;
    }
    Some(sum)
}
