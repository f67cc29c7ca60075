//! Fiat–Shamir challenge derivation.
//!
//! The challenge is SHA-256 over the canonical encoding of
//! `Node[Leaf(label), instance, commitment]`, reduced into the challenge
//! field. The layering — child order, byte-tree framing, big-endian
//! reduction — is normative: any deviation breaks verification against
//! existing records.

use std::sync::Arc;

use sha2::{Digest as _, Sha256};

use crate::{ByteTree, Field, FieldElement};

/// Derives the challenge for a proof with the given label, instance, and
/// commitment byte trees.
#[must_use]
pub fn challenge(
    label: &[u8],
    instance: ByteTree,
    commitment: ByteTree,
    field: &Arc<Field>,
) -> FieldElement {
    let transcript = ByteTree::node(vec![ByteTree::leaf(label), instance, commitment]);
    let digest = Sha256::digest(transcript.to_bytes());
    field.element_from_bytes_mod_order(&digest)
}

#[cfg(test)]
mod tests {
    use egvr_arith::Natural;

    use super::*;

    fn field() -> Arc<Field> {
        Field::new(
            Natural::from_decimal("340282366920938463463374607431768211297").expect("decimal"),
        )
        .expect("field")
    }

    #[test]
    fn deterministic() {
        let field = field();
        let a = challenge(
            b"label",
            ByteTree::leaf(vec![1, 2]),
            ByteTree::leaf(vec![3]),
            &field,
        );
        let b = challenge(
            b"label",
            ByteTree::leaf(vec![1, 2]),
            ByteTree::leaf(vec![3]),
            &field,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn sensitive_to_every_part() {
        let field = field();
        let base = challenge(
            b"label",
            ByteTree::leaf(vec![1, 2]),
            ByteTree::leaf(vec![3]),
            &field,
        );
        let changed_label = challenge(
            b"lebal",
            ByteTree::leaf(vec![1, 2]),
            ByteTree::leaf(vec![3]),
            &field,
        );
        let changed_instance = challenge(
            b"label",
            ByteTree::leaf(vec![1, 3]),
            ByteTree::leaf(vec![3]),
            &field,
        );
        let changed_commitment = challenge(
            b"label",
            ByteTree::leaf(vec![1, 2]),
            ByteTree::leaf(vec![4]),
            &field,
        );
        assert_ne!(base, changed_label);
        assert_ne!(base, changed_instance);
        assert_ne!(base, changed_commitment);
    }

    #[test]
    fn swapping_instance_and_commitment_changes_the_challenge() {
        let field = field();
        let forward = challenge(
            b"l",
            ByteTree::leaf(vec![1]),
            ByteTree::leaf(vec![2]),
            &field,
        );
        let swapped = challenge(
            b"l",
            ByteTree::leaf(vec![2]),
            ByteTree::leaf(vec![1]),
            &field,
        );
        assert_ne!(forward, swapped);
    }

    #[test]
    fn known_digest_reduction() {
        // SHA-256 of the framed transcript, reduced mod a field larger
        // than the digest, must equal the digest itself.
        let big = Field::new(Natural::one().shl(260)).expect("field");
        let tree = ByteTree::node(vec![
            ByteTree::leaf(b"L".to_vec()),
            ByteTree::leaf(vec![1]),
            ByteTree::leaf(vec![2]),
        ]);
        let expected = Sha256::digest(tree.to_bytes());
        let derived = challenge(b"L", ByteTree::leaf(vec![1]), ByteTree::leaf(vec![2]), &big);
        assert_eq!(derived.value(), &Natural::from_bytes_be(&expected));
    }
}
