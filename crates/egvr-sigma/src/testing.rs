//! Shared helpers for sigma-verifier tests: a small group, honest
//! transcript construction, and element tampering.

use std::sync::Arc;

use egvr_algebra::{
    ExpHom, Field, FieldElement, GroupElement, ModPGroup, ProductGroup, RingElement, challenge,
};
use egvr_arith::Natural;

use crate::{SchnorrVerifier, SigmaProof};

/// A small safe-prime group for transcript tests: p = 2039, q = 1019,
/// g = 4.
pub(crate) struct TestCtx {
    pub group: Arc<ModPGroup>,
}

impl TestCtx {
    pub fn field(&self) -> &Arc<Field> {
        self.group.field()
    }

    pub fn scalar(&self, value: u32) -> FieldElement {
        self.field().element_mod(&Natural::from(value))
    }
}

pub(crate) fn test_group() -> TestCtx {
    let group = ModPGroup::new(
        Natural::from(2039u32),
        Natural::from(1019u32),
        Natural::from(4u32),
    )
    .expect("test group");
    TestCtx { group }
}

/// An honest Schnorr transcript over the scalar basis `g` at the given
/// witness, with a deterministic commitment nonce.
pub(crate) fn transcript(
    ctx: &TestCtx,
    label: &[u8],
    witness: u32,
) -> (GroupElement, SigmaProof, SchnorrVerifier) {
    let g: GroupElement = ctx.group.generator().into();
    let x = ctx.scalar(witness);
    let t = ctx.scalar(witness.wrapping_mul(7).wrapping_add(3));

    let instance = g.exp(&RingElement::Field(x.clone())).expect("exp");
    let commitment = g.exp(&RingElement::Field(t.clone())).expect("exp");
    let c = challenge(
        label,
        instance.to_byte_tree(),
        commitment.to_byte_tree(),
        ctx.field(),
    );
    let response = t.add(&c.mul(&x).expect("mul")).expect("add");
    let proof = SigmaProof {
        commitment,
        challenge: c,
        response,
    };
    let verifier = SchnorrVerifier::new(ExpHom::new(ctx.field().clone(), g));
    (instance, proof, verifier)
}

/// An honest Chaum–Pedersen transcript: basis `(g, K)`, instance
/// `(g^x, K^x)`.
pub(crate) fn chaum_pedersen_transcript(
    ctx: &TestCtx,
    label: &[u8],
    secret_key: u32,
    witness: u32,
) -> (GroupElement, SigmaProof, SchnorrVerifier) {
    let g = ctx.group.generator();
    let k = g
        .exp(&ctx.scalar(secret_key))
        .expect("public key");
    let pair = ProductGroup::uniform(&ctx.group, 2).expect("product");
    let basis: GroupElement = pair.prod(vec![g, k]).expect("basis").into();

    let x = ctx.scalar(witness);
    let t = ctx.scalar(witness.wrapping_mul(11).wrapping_add(5));
    let instance = basis.exp(&RingElement::Field(x.clone())).expect("exp");
    let commitment = basis.exp(&RingElement::Field(t.clone())).expect("exp");
    let c = challenge(
        label,
        instance.to_byte_tree(),
        commitment.to_byte_tree(),
        ctx.field(),
    );
    let response = t.add(&c.mul(&x).expect("mul")).expect("add");
    let proof = SigmaProof {
        commitment,
        challenge: c,
        response,
    };
    let verifier = SchnorrVerifier::new(ExpHom::new(ctx.field().clone(), basis));
    (instance, proof, verifier)
}

/// A different valid field element: the low bit flipped, reduced back
/// into the field when the flip lands on `q`.
pub(crate) fn flip_bit(elem: &FieldElement) -> FieldElement {
    let flipped = if elem.value().is_odd() {
        elem.value().sub(&Natural::one()).expect("sub")
    } else {
        elem.value().add(&Natural::one())
    };
    elem.field().element_mod(&flipped)
}

/// A different valid group element: every component multiplied by the
/// generator.
pub(crate) fn flip_group_bit(ctx: &TestCtx, elem: &GroupElement) -> GroupElement {
    let g: GroupElement = match elem {
        GroupElement::ModP(_) => ctx.group.generator().into(),
        GroupElement::Product(parts) => ProductGroup::uniform(&ctx.group, parts.width())
            .and_then(|pg| pg.broadcast(&ctx.group.generator()))
            .expect("broadcast")
            .into(),
    };
    elem.mul(&g).expect("mul")
}
