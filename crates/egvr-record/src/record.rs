//! The election record and its constituent parts.

use std::io;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::BigNum;

/// Errors loading a record from JSON. These are the structural-fatal
/// failures: anything that parses into a [`Record`] proceeds to
/// verification, where problems become predicates instead.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The document is not valid JSON or does not match the schema
    #[error("Malformed election record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// All the parameters necessary to form the election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Parameters {
    /// The date on which the election takes place.
    pub date: String,
    /// The location where the election takes place.
    pub location: String,
    /// The number of election trustees `n`.
    pub num_trustees: BigNum,
    /// The threshold `t` of trustees required to complete decryption.
    pub threshold: BigNum,
    /// The prime modulus of the group used for encryption.
    pub prime: BigNum,
    /// The generator of the group used for encryption.
    pub generator: BigNum,
}

/// All data from one election: parameters, keys, ballots, and tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    /// Election parameters.
    pub parameters: Parameters,
    /// The base hash `Q` committing to the election configuration.
    pub base_hash: BigNum,
    /// The public keys and coefficient commitments of each trustee.
    pub trustee_public_keys: Vec<TrusteePublicKey>,
    /// The joint election public key `K`.
    pub joint_public_key: BigNum,
    /// The extended base hash `Q̄`.
    pub extended_base_hash: BigNum,
    /// The encrypted ballots cast in the election.
    #[serde(default)]
    pub cast_ballots: Vec<CastBallot>,
    /// The decrypted tallies of each option of each contest.
    #[serde(default)]
    pub contest_tallies: Vec<ContestTally>,
    /// The selection-wise decryptions of the spoiled ballots.
    #[serde(default)]
    pub spoiled_ballots: Vec<SpoiledBallot>,
}

impl Record {
    /// Parses a record from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a record from a JSON reader.
    pub fn from_json_reader(reader: impl io::Read) -> Result<Self, RecordError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// One trustee's polynomial coefficient commitments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TrusteePublicKey {
    /// The `t` coefficient commitments; the first is the trustee's
    /// public key.
    pub coefficients: Vec<TrusteeCoefficient>,
}

/// A single coefficient commitment with its proof of knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TrusteeCoefficient {
    /// The commitment `K_ij = g^(a_ij)`.
    pub public_key: BigNum,
    /// A Schnorr proof of possession of the coefficient.
    pub proof: SchnorrWireProof,
}

/// A Schnorr proof as serialized: one commitment and the challenge and
/// response in the exponent field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchnorrWireProof {
    /// The commitment `g^t`.
    pub commitment: BigNum,
    /// The challenge.
    pub challenge: BigNum,
    /// The response.
    pub response: BigNum,
}

/// A Chaum–Pedersen proof as serialized: the commitment is a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChaumPedersenWireProof {
    /// The commitment pair `(g^t, K^t)`.
    pub commitment: EncryptedMessage,
    /// The challenge.
    pub challenge: BigNum,
    /// The response.
    pub response: BigNum,
}

/// An ElGamal pair `(α, β)`; also the shape of Chaum–Pedersen
/// commitments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EncryptedMessage {
    /// `α = g^r`.
    pub public_key: BigNum,
    /// `β = K^r · g^m`.
    pub ciphertext: BigNum,
}

/// An encrypted cast ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CastBallot {
    /// Where and when the ballot was encrypted.
    pub ballot_info: BallotInfo,
    /// The ballot's contests.
    pub contests: Vec<CastContest>,
}

/// Device and tracking information attached to a ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BallotInfo {
    /// The date the ballot was encrypted.
    pub date: String,
    /// Information about the device that encrypted the ballot.
    pub device_info: String,
    /// The time the ballot was encrypted.
    pub time: String,
    /// The tracker code of the ballot.
    pub tracker: String,
}

/// One contest on a cast ballot: encrypted selections and the proof
/// that exactly `max_selections` of them are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CastContest {
    /// The encrypted selections made on the ballot.
    pub selections: Vec<CastSelection>,
    /// The maximum number of selections `L` allowed in this contest.
    pub max_selections: BigNum,
    /// Proof that the selections sum to `L`.
    pub num_selections_proof: ChaumPedersenWireProof,
}

/// One encrypted selection with its zero-or-one disjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CastSelection {
    /// The encryption of zero or one.
    pub message: EncryptedMessage,
    /// The branch proving the selection encrypts zero.
    pub zero_proof: ChaumPedersenWireProof,
    /// The branch proving the selection encrypts one.
    pub one_proof: ChaumPedersenWireProof,
}

/// The decrypted tallies for all selections of one contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContestTally {
    /// Per-selection tallies.
    pub selections: Vec<DecryptedValue>,
}

/// A decryption of an encrypted ballot that was spoiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpoiledBallot {
    /// Where and when the ballot was encrypted.
    pub ballot_info: BallotInfo,
    /// The ballot's decrypted contests.
    pub contests: Vec<SpoiledContest>,
}

/// The decrypted selections of one contest of a spoiled ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpoiledContest {
    /// Per-selection decryptions.
    pub selections: Vec<DecryptedValue>,
}

/// The decryption of one encrypted value, with the shares and proofs
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecryptedValue {
    /// The cleartext value `m`.
    pub cleartext: BigNum,
    /// The decrypted value `M = g^m`.
    pub decrypted_value: BigNum,
    /// The encryption of `m`.
    pub encrypted_value: EncryptedMessage,
    /// The decryption shares `M_i` combining to `M`.
    pub shares: Vec<Share>,
}

/// A single trustee's share of a decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Share {
    /// Reconstruction data when this trustee was absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<ShareRecovery>,
    /// Proof that the share is the trustee's partial decryption.
    pub proof: ChaumPedersenWireProof,
    /// The share `M_i = α^(x_i)`.
    pub share: BigNum,
}

/// The fragments reconstructing an absent trustee's share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShareRecovery {
    /// The fragments produced by the present trustees.
    pub fragments: Vec<Fragment>,
}

/// One trustee's fragment of a missing trustee's decryption share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Fragment {
    /// The fragment `M_ij`.
    pub fragment: BigNum,
    /// The Lagrange coefficient `w_ij` weighting this fragment.
    pub lagrange_coefficient: BigNum,
    /// Proof that the fragment is consistent with the encryption.
    pub proof: ChaumPedersenWireProof,
    /// The index of the trustee who produced the fragment.
    pub trustee_index: BigNum,
}

/// The record's JSON schema, pretty-printed; backs schema-shape
/// validation and the CLI `schema` subcommand.
#[must_use]
pub fn record_schema_json() -> String {
    let schema = schemars::schema_for!(Record);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_record_json() -> String {
        serde_json::json!({
            "parameters": {
                "date": "2026-06-02",
                "location": "Gadget County",
                "num_trustees": "3",
                "threshold": "2",
                "prime": "23",
                "generator": "4"
            },
            "base_hash": "0",
            "trustee_public_keys": [
                {
                    "coefficients": [
                        {
                            "public_key": "4",
                            "proof": {
                                "commitment": "2",
                                "challenge": "1",
                                "response": "5"
                            }
                        }
                    ]
                }
            ],
            "joint_public_key": "4",
            "extended_base_hash": "0"
        })
        .to_string()
    }

    #[test]
    fn minimal_record_parses() {
        let record = Record::from_json_str(&minimal_record_json()).expect("parse");
        assert_eq!(record.parameters.num_trustees.as_str(), "3");
        assert_eq!(record.trustee_public_keys.len(), 1);
        assert!(record.cast_ballots.is_empty());
        assert!(record.contest_tallies.is_empty());
        assert!(record.spoiled_ballots.is_empty());
    }

    #[test]
    fn round_trip() {
        let record = Record::from_json_str(&minimal_record_json()).expect("parse");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(Record::from_json_str(&json).expect("reparse"), record);
    }

    #[test]
    fn malformed_json_is_fatal() {
        assert!(Record::from_json_str("not json").is_err());
        assert!(Record::from_json_str("{}").is_err());
    }

    #[test]
    fn numbers_stay_opaque() {
        // A non-numeric "prime" still parses; the verifier turns it into
        // a predicate failure later.
        let mut json: serde_json::Value =
            serde_json::from_str(&minimal_record_json()).expect("json");
        json["parameters"]["prime"] = "not-a-number".into();
        let record = Record::from_json_str(&json.to_string()).expect("parse");
        assert_eq!(record.parameters.prime.as_str(), "not-a-number");
    }

    #[test]
    fn schema_mentions_the_top_level_sections() {
        let schema = record_schema_json();
        for section in [
            "parameters",
            "trustee_public_keys",
            "cast_ballots",
            "contest_tallies",
            "spoiled_ballots",
        ] {
            assert!(schema.contains(section), "schema is missing {section}");
        }
    }
}
