//! Stable predicate identifiers.

use std::fmt;

/// The name of a verification predicate.
///
/// These strings are the stable, test-observable identifiers of the
/// audit trail; titles and messages are advisory and may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// The threshold is at most the number of trustees.
    ThresholdTrustees,
    /// The number of trustee key rows matches the declared trustee count.
    NumPubKeys,
    /// The declared prime equals the baseline modulus.
    BaselineEncryptionModulus,
    /// The declared generator equals the baseline generator.
    BaselineEncryptionGenerator,
    /// The declared base hash equals the computed base hash.
    ElectionBaseHash,
    /// The declared extended base hash equals the computed one.
    ElectionExtendedBaseHash,
    /// The trustees' first commitments multiply to the joint public key.
    JointPublicKeyCalculation,
    /// A trustee row has exactly `threshold` coefficients.
    NumberOfCoefficients,
    /// A Schnorr proof of knowledge verifies.
    SchnorrProof,
    /// A coefficient commitment failed to parse.
    CoefficientCommitmentLoading,
    /// A cast ballot has the contest count of the election schema.
    CastBallotNumberOfContests,
    /// A cast contest has the selection count of the election schema.
    CastBallotNumberOfSelections,
    /// A cast contest declares the schema's selection limit.
    CastBallotMaxSelections,
    /// A Chaum–Pedersen proof verifies.
    ChaumPedersenProof,
    /// A zero-or-one disjunction verifies.
    ZeroOrOneProof,
    /// An encrypted value's `α` component failed to parse.
    AlphaLoading,
    /// A single decryption share failed to parse.
    ShareLoading,
    /// A selection's decryption shares could not all be loaded.
    SharesLoading,
    /// A cast ballot lacks the selection being tallied.
    LoadingBallots,
    /// A cast ballot's selection failed to parse during tallying.
    CastBallot,
    /// A decryption record value failed to parse.
    DecryptionData,
    /// The encrypted tally is the homomorphic sum of the cast ballots.
    TallySum,
    /// The combined shares decrypt the tally to the declared value.
    DecryptionMatches,
    /// The declared cleartext exponentiates to the decrypted value.
    CleartextMatches,
    /// A spoiled contest's cleartexts sum to the selection limit.
    SumOfPlaintexts,
}

impl Code {
    /// The stable identifier string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThresholdTrustees => "ThresholdTrustees",
            Self::NumPubKeys => "NumPubKeys",
            Self::BaselineEncryptionModulus => "BaselineEncryptionModulus",
            Self::BaselineEncryptionGenerator => "BaselineEncryptionGenerator",
            Self::ElectionBaseHash => "ElectionBaseHash",
            Self::ElectionExtendedBaseHash => "ElectionExtendedBaseHash",
            Self::JointPublicKeyCalculation => "JointPublicKeyCalculation",
            Self::NumberOfCoefficients => "NumberOfCoefficients",
            Self::SchnorrProof => "SchnorrProof",
            Self::CoefficientCommitmentLoading => "CoefficientCommitmentLoading",
            Self::CastBallotNumberOfContests => "CastBallotNumberOfContests",
            Self::CastBallotNumberOfSelections => "CastBallotNumberOfSelections",
            Self::CastBallotMaxSelections => "CastBallotMaxSelections",
            Self::ChaumPedersenProof => "ChaumPedersenProof",
            Self::ZeroOrOneProof => "ZeroOrOneProof",
            Self::AlphaLoading => "AlphaLoading",
            Self::ShareLoading => "ShareLoading",
            Self::SharesLoading => "SharesLoading",
            Self::LoadingBallots => "LoadingBallots",
            Self::CastBallot => "CastBallot",
            Self::DecryptionData => "DecryptionData",
            Self::TallySum => "TallySum",
            Self::DecryptionMatches => "DecryptionMatches",
            Self::CleartextMatches => "CleartextMatches",
            Self::SumOfPlaintexts => "SumOfPlaintexts",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
