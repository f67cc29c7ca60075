//! The three-message proof shape shared by every sigma verifier.

use egvr_algebra::{ByteTree, FieldElement, GroupElement};

/// A non-interactive sigma-protocol transcript: commitment, challenge,
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigmaProof {
    /// The prover's first message, in the statement's group.
    pub commitment: GroupElement,
    /// The challenge the prover answered.
    pub challenge: FieldElement,
    /// The prover's response in the challenge field.
    pub response: FieldElement,
}

impl SigmaProof {
    /// The proof's canonical byte tree: a node over commitment,
    /// challenge, and response (the on-wire challenge is always part of
    /// the serialized proof).
    #[must_use]
    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.commitment.to_byte_tree(),
            self.challenge.to_byte_tree(),
            self.response.to_byte_tree(),
        ])
    }
}
