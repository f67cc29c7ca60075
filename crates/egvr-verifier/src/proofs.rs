//! Adapters from on-wire proofs to sigma verifiers.
//!
//! Each adapter parses the decimal-string fields of a wire proof into
//! typed elements, builds the statement's basis and instance, and runs
//! the matching sigma verifier. A parse failure carries the predicate
//! code and a message naming the error, so the walker can emit a failure
//! predicate without changing control flow.

use std::sync::Arc;

use egvr_algebra::{
    AlgebraError, ExpHom, FieldElement, GroupElement, ModPElement, ModPGroup, ProductGroup,
};
use egvr_record::{ChaumPedersenWireProof, SchnorrWireProof, TrusteeCoefficient};
use egvr_sigma::{SchnorrVerifier, SigmaOr, SigmaProof};

use crate::Code;

/// Fiat–Shamir labels, one per statement kind. Provers and the verifier
/// must agree on these bytes exactly.
pub mod labels {
    /// Knowledge of a trustee coefficient's exponent.
    pub const TRUSTEE_COEFFICIENT: &[u8] = b"trustee-coefficient";
    /// A contest's selections sum to its selection limit.
    pub const CONTEST_MAX_SELECTIONS: &[u8] = b"contest-max-selections";
    /// A selection encrypts zero or one.
    pub const SELECTION_ZERO_OR_ONE: &[u8] = b"selection-zero-or-one";
    /// A decryption share is the trustee's partial decryption.
    pub const SHARE_CORRECTNESS: &[u8] = b"share-correctness";
}

/// A wire value that could not be turned into its domain element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// The predicate code to report the failure under.
    pub code: Code,
    /// What failed to parse, for the audit trail.
    pub message: String,
}

impl LoadFailure {
    pub(crate) fn new(code: Code, error: &AlgebraError) -> Self {
        Self {
            code,
            message: error.to_string(),
        }
    }
}

/// Parses a decimal string into a group element, tagging failures.
pub fn parse_element(
    group: &Arc<ModPGroup>,
    text: &str,
    code: Code,
) -> Result<ModPElement, LoadFailure> {
    group
        .element_from_decimal(text)
        .map_err(|error| LoadFailure::new(code, &error))
}

/// Parses a decimal string into an exponent-field element, tagging
/// failures.
pub fn parse_exponent(
    group: &Arc<ModPGroup>,
    text: &str,
    code: Code,
) -> Result<FieldElement, LoadFailure> {
    group
        .field()
        .element_from_decimal(text)
        .map_err(|error| LoadFailure::new(code, &error))
}

/// Verifies a trustee coefficient commitment's Schnorr proof of
/// knowledge.
pub fn verify_trustee_coefficient(
    group: &Arc<ModPGroup>,
    coefficient: &TrusteeCoefficient,
) -> Result<bool, LoadFailure> {
    let commitment = parse_element(
        group,
        coefficient.public_key.as_str(),
        Code::CoefficientCommitmentLoading,
    )?;
    verify_schnorr(
        group,
        labels::TRUSTEE_COEFFICIENT,
        &coefficient.proof,
        &commitment,
    )
}

/// Verifies a Schnorr proof of knowledge of `log_g instance`.
pub fn verify_schnorr(
    group: &Arc<ModPGroup>,
    label: &[u8],
    wire: &SchnorrWireProof,
    instance: &ModPElement,
) -> Result<bool, LoadFailure> {
    let proof = SigmaProof {
        commitment: parse_element(group, wire.commitment.as_str(), Code::SchnorrProof)?.into(),
        challenge: parse_exponent(group, wire.challenge.as_str(), Code::SchnorrProof)?,
        response: parse_exponent(group, wire.response.as_str(), Code::SchnorrProof)?,
    };
    let hom = ExpHom::new(Arc::clone(group.field()), group.generator().into());
    let verifier = SchnorrVerifier::new(hom);
    Ok(verifier.verify(label, &instance.clone().into(), &proof))
}

/// Verifies a Chaum–Pedersen proof that `(first, second)` share one
/// discrete logarithm under the bases `(g, second_base)`.
pub fn verify_chaum_pedersen(
    group: &Arc<ModPGroup>,
    label: &[u8],
    wire: &ChaumPedersenWireProof,
    second_base: &ModPElement,
    first: &ModPElement,
    second: &ModPElement,
) -> Result<bool, LoadFailure> {
    let pair = product_pair(group)?;
    let basis = pair
        .prod(vec![group.generator(), second_base.clone()])
        .map_err(|error| LoadFailure::new(Code::ChaumPedersenProof, &error))?;
    let instance = pair
        .prod(vec![first.clone(), second.clone()])
        .map_err(|error| LoadFailure::new(Code::ChaumPedersenProof, &error))?;
    let proof = parse_chaum_pedersen_proof(group, wire, Code::ChaumPedersenProof)?;

    let hom = ExpHom::new(Arc::clone(group.field()), basis.into());
    let verifier = SchnorrVerifier::new(hom);
    Ok(verifier.verify(label, &instance.into(), &proof))
}

/// Verifies a zero-or-one disjunction for the ElGamal pair `(α, β)`
/// under public key `key`: either `(α, β)` or `(α, β·g⁻¹)` has a shared
/// discrete logarithm under `(g, key)`.
pub fn verify_zero_or_one(
    group: &Arc<ModPGroup>,
    label: &[u8],
    key: &ModPElement,
    alpha: &ModPElement,
    beta: &ModPElement,
    zero_proof: &ChaumPedersenWireProof,
    one_proof: &ChaumPedersenWireProof,
) -> Result<bool, LoadFailure> {
    let fail = |error: &AlgebraError| LoadFailure::new(Code::ZeroOrOneProof, error);
    let pair = product_pair(group)?;
    let basis = pair
        .prod(vec![group.generator(), key.clone()])
        .map_err(|e| fail(&e))?;

    let beta_minus_one = group
        .generator()
        .inv()
        .and_then(|g_inv| beta.mul(&g_inv))
        .map_err(|e| fail(&e))?;
    let instances: Vec<GroupElement> = vec![
        pair.prod(vec![alpha.clone(), beta.clone()])
            .map_err(|e| fail(&e))?
            .into(),
        pair.prod(vec![alpha.clone(), beta_minus_one])
            .map_err(|e| fail(&e))?
            .into(),
    ];
    let proofs = vec![
        parse_chaum_pedersen_proof(group, zero_proof, Code::ZeroOrOneProof)?,
        parse_chaum_pedersen_proof(group, one_proof, Code::ZeroOrOneProof)?,
    ];

    let verifier = || {
        SchnorrVerifier::new(ExpHom::new(
            Arc::clone(group.field()),
            GroupElement::from(basis.clone()),
        ))
    };
    let or = SigmaOr::new(vec![verifier(), verifier()]);
    Ok(or.verify(label, &instances, &proofs))
}

/// Parses a wire Chaum–Pedersen proof into a product-group transcript.
fn parse_chaum_pedersen_proof(
    group: &Arc<ModPGroup>,
    wire: &ChaumPedersenWireProof,
    code: Code,
) -> Result<SigmaProof, LoadFailure> {
    let pair = product_pair(group)?;
    let commitment = pair
        .prod(vec![
            parse_element(group, wire.commitment.public_key.as_str(), code)?,
            parse_element(group, wire.commitment.ciphertext.as_str(), code)?,
        ])
        .map_err(|error| LoadFailure::new(code, &error))?;
    Ok(SigmaProof {
        commitment: commitment.into(),
        challenge: parse_exponent(group, wire.challenge.as_str(), code)?,
        response: parse_exponent(group, wire.response.as_str(), code)?,
    })
}

fn product_pair(group: &Arc<ModPGroup>) -> Result<ProductGroup, LoadFailure> {
    ProductGroup::uniform(group, 2)
        .map_err(|error| LoadFailure::new(Code::ChaumPedersenProof, &error))
}
