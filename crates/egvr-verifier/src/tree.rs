//! The verification tree.
//!
//! A depth-first walk of the election record rooted at `Election`. Each
//! node extends the recorder's context with a fixed label and emits
//! named predicates; a value that fails to load emits a failure
//! predicate and suppresses the predicates strictly beneath it, while
//! sibling subtrees keep verifying, so one run yields the full audit
//! trail.

use std::sync::Arc;

use egvr_algebra::{ModPElement, ModPGroup, params};
use egvr_arith::Natural;
use egvr_record::{
    CastBallot, CastContest, DecryptedValue, Record, SpoiledBallot, TrusteePublicKey,
};

use crate::proofs::{
    labels, parse_element, verify_chaum_pedersen, verify_trustee_coefficient, verify_zero_or_one,
};
use crate::{BaseHash, Code, Context, Recorder, StubBaseHash};

const LOG_TARGET: &str = "egvr_verifier::tree";

/// The per-contest shape of the election, inferred from the contest
/// tallies (selection counts) and the first cast ballot (selection
/// limits) — the only places the record declares the ballot style.
#[derive(Debug, Clone)]
struct ContestSchema {
    selections: usize,
    max_selections: Option<Natural>,
}

/// Verifies a parsed election record against a group and a base-hash
/// collaborator, emitting every predicate into a [`Recorder`].
pub struct Verifier<'a> {
    record: &'a Record,
    group: Arc<ModPGroup>,
    base_hash: Box<dyn BaseHash>,
}

impl<'a> Verifier<'a> {
    /// A verifier against the baseline ElectionGuard parameters.
    #[must_use]
    pub fn new(record: &'a Record) -> Self {
        Self::with_group(record, Arc::clone(params::baseline_group()))
    }

    /// A verifier against explicit parameters; the baseline predicates
    /// compare the record's declarations to this group.
    #[must_use]
    pub fn with_group(record: &'a Record, group: Arc<ModPGroup>) -> Self {
        Self {
            record,
            group,
            base_hash: Box::new(StubBaseHash),
        }
    }

    /// Replaces the base-hash collaborator.
    #[must_use]
    pub fn with_base_hash(mut self, base_hash: impl BaseHash + 'static) -> Self {
        self.base_hash = Box::new(base_hash);
        self
    }

    /// Walks the record, emitting every predicate into `recorder`.
    pub fn verify(&self, recorder: &mut dyn Recorder) {
        let ctx = Context::root("Election");
        tracing::debug!(target: LOG_TARGET, "starting verification walk");

        let threshold = self.check_counts(&ctx, recorder);
        self.check_baseline(&ctx, recorder);
        self.check_base_hashes(&ctx, recorder);

        for (i, trustee) in self.record.trustee_public_keys.iter().enumerate() {
            let trustee_ctx = ctx.child(format!("Trustee #{i}"));
            self.verify_trustee(&trustee_ctx, trustee, threshold.as_ref(), recorder);
        }

        let joint_key = self.check_joint_key(&ctx, recorder);
        if let Some(key) = &joint_key {
            // The joint key is exponentiated a few times per selection;
            // a fixed-base table amortizes over the whole record.
            let selections: usize = self
                .record
                .cast_ballots
                .iter()
                .flat_map(|ballot| &ballot.contests)
                .map(|contest| contest.selections.len())
                .sum();
            if selections > 0 {
                let _ = key.fix(selections * 4);
            }
        }
        let schema = self.infer_schema();

        for (i, ballot) in self.record.cast_ballots.iter().enumerate() {
            let ballot_ctx = ctx.child(format!("Cast ballot #{i}"));
            self.verify_cast_ballot(&ballot_ctx, ballot, &schema, joint_key.as_ref(), recorder);
        }
        for (i, tally) in self.record.contest_tallies.iter().enumerate() {
            let tally_ctx = ctx.child(format!("Tally, contest #{i}"));
            for (j, value) in tally.selections.iter().enumerate() {
                let selection_ctx = tally_ctx.child(format!("Selection #{j}"));
                self.verify_decryption(&selection_ctx, value, Some((i, j)), recorder);
            }
        }
        for (i, spoiled) in self.record.spoiled_ballots.iter().enumerate() {
            let spoiled_ctx = ctx.child(format!("Spoiled ballot #{i}"));
            self.verify_spoiled_ballot(&spoiled_ctx, spoiled, &schema, recorder);
        }
    }

    /// Trustee-count predicates; returns the threshold when it parses.
    fn check_counts(&self, ctx: &Context, recorder: &mut dyn Recorder) -> Option<Natural> {
        let parameters = &self.record.parameters;
        let trustees = Natural::from_decimal(parameters.num_trustees.as_str());
        let threshold = Natural::from_decimal(parameters.threshold.as_str());
        match (trustees, threshold) {
            (Ok(trustees), Ok(threshold)) => {
                recorder.record(
                    threshold <= trustees,
                    ctx,
                    Code::ThresholdTrustees,
                    "The threshold is at most the number of trustees",
                );
                recorder.record(
                    Natural::from(self.record.trustee_public_keys.len()) == trustees,
                    ctx,
                    Code::NumPubKeys,
                    "One key row per trustee",
                );
                Some(threshold)
            }
            (Err(error), _) | (_, Err(error)) => {
                let message = format!("Malformed trustee counts: {error}");
                recorder.record(false, ctx, Code::ThresholdTrustees, &message);
                recorder.record(false, ctx, Code::NumPubKeys, &message);
                None
            }
        }
    }

    /// Declared parameters must equal the configured baseline.
    fn check_baseline(&self, ctx: &Context, recorder: &mut dyn Recorder) {
        match Natural::from_decimal(self.record.parameters.prime.as_str()) {
            Ok(prime) => recorder.record(
                prime == *self.group.modulus(),
                ctx,
                Code::BaselineEncryptionModulus,
                "The declared prime is the baseline modulus",
            ),
            Err(error) => recorder.record(
                false,
                ctx,
                Code::BaselineEncryptionModulus,
                &format!("Malformed prime: {error}"),
            ),
        }
        match Natural::from_decimal(self.record.parameters.generator.as_str()) {
            Ok(generator) => recorder.record(
                generator == *self.group.generator().value(),
                ctx,
                Code::BaselineEncryptionGenerator,
                "The declared generator is the baseline generator",
            ),
            Err(error) => recorder.record(
                false,
                ctx,
                Code::BaselineEncryptionGenerator,
                &format!("Malformed generator: {error}"),
            ),
        }
    }

    /// Declared base hashes must equal the collaborator's computations.
    fn check_base_hashes(&self, ctx: &Context, recorder: &mut dyn Recorder) {
        let checks = [
            (
                Code::ElectionBaseHash,
                self.record.base_hash.as_str(),
                self.base_hash.base_hash(self.record),
                "The declared base hash matches the computed value",
            ),
            (
                Code::ElectionExtendedBaseHash,
                self.record.extended_base_hash.as_str(),
                self.base_hash.extended_base_hash(self.record),
                "The declared extended base hash matches the computed value",
            ),
        ];
        for (code, declared, computed, title) in checks {
            match Natural::from_decimal(declared) {
                Ok(declared) => recorder.record(declared == computed, ctx, code, title),
                Err(error) => {
                    recorder.record(false, ctx, code, &format!("Malformed hash: {error}"));
                }
            }
        }
    }

    /// One trustee's coefficient row.
    fn verify_trustee(
        &self,
        ctx: &Context,
        trustee: &TrusteePublicKey,
        threshold: Option<&Natural>,
        recorder: &mut dyn Recorder,
    ) {
        match threshold {
            Some(threshold) => recorder.record(
                Natural::from(trustee.coefficients.len()) == *threshold,
                ctx,
                Code::NumberOfCoefficients,
                "One coefficient per threshold share",
            ),
            None => recorder.record(
                false,
                ctx,
                Code::NumberOfCoefficients,
                "The threshold is unavailable",
            ),
        }
        for (j, coefficient) in trustee.coefficients.iter().enumerate() {
            let coefficient_ctx = ctx.child(format!("Coefficient #{j}"));
            match verify_trustee_coefficient(&self.group, coefficient) {
                Ok(ok) => recorder.record(
                    ok,
                    &coefficient_ctx,
                    Code::SchnorrProof,
                    "Proof of knowledge of the coefficient exponent",
                ),
                Err(failure) => {
                    recorder.record(false, &coefficient_ctx, failure.code, &failure.message);
                }
            }
        }
    }

    /// The joint-key predicate; returns the declared key when it parses,
    /// since the ballot proofs need it either way.
    fn check_joint_key(&self, ctx: &Context, recorder: &mut dyn Recorder) -> Option<ModPElement> {
        let declared = self
            .group
            .element_from_decimal(self.record.joint_public_key.as_str());
        let product = self
            .record
            .trustee_public_keys
            .iter()
            .enumerate()
            .try_fold(self.group.one(), |acc, (i, trustee)| {
                let first = trustee
                    .coefficients
                    .first()
                    .ok_or_else(|| format!("Trustee #{i} has no coefficients"))?;
                let key = self
                    .group
                    .element_from_decimal(first.public_key.as_str())
                    .map_err(|error| format!("Trustee #{i} public key: {error}"))?;
                acc.mul(&key)
                    .map_err(|error| format!("Trustee #{i} public key: {error}"))
            });
        match (&declared, product) {
            (Ok(declared), Ok(product)) => recorder.record(
                *declared == product,
                ctx,
                Code::JointPublicKeyCalculation,
                "The trustee public keys combine to the joint public key",
            ),
            (Err(error), _) => {
                let message = format!("Joint public key: {error}");
                recorder.record(false, ctx, Code::JointPublicKeyCalculation, &message);
            }
            (_, Err(message)) => {
                recorder.record(false, ctx, Code::JointPublicKeyCalculation, &message);
            }
        }
        declared.ok()
    }

    fn infer_schema(&self) -> Vec<ContestSchema> {
        let first_ballot = self.record.cast_ballots.first();
        self.record
            .contest_tallies
            .iter()
            .enumerate()
            .map(|(i, tally)| ContestSchema {
                selections: tally.selections.len(),
                max_selections: first_ballot
                    .and_then(|ballot| ballot.contests.get(i))
                    .and_then(|contest| {
                        Natural::from_decimal(contest.max_selections.as_str()).ok()
                    }),
            })
            .collect()
    }

    /// One cast ballot: shape predicates, the selection-limit proof per
    /// contest, and the zero-or-one proof per selection.
    fn verify_cast_ballot(
        &self,
        ctx: &Context,
        ballot: &CastBallot,
        schema: &[ContestSchema],
        joint_key: Option<&ModPElement>,
        recorder: &mut dyn Recorder,
    ) {
        recorder.record(
            ballot.contests.len() == schema.len(),
            ctx,
            Code::CastBallotNumberOfContests,
            "The ballot has every contest of the election",
        );
        for (j, contest) in ballot.contests.iter().enumerate() {
            let contest_ctx = ctx.child(format!("Contest #{j}"));
            let entry = schema.get(j);
            recorder.record(
                entry.is_some_and(|entry| contest.selections.len() == entry.selections),
                &contest_ctx,
                Code::CastBallotNumberOfSelections,
                "The contest has the expected number of selections",
            );
            let max_selections = Natural::from_decimal(contest.max_selections.as_str()).ok();
            recorder.record(
                max_selections.is_some()
                    && entry.is_some_and(|entry| entry.max_selections == max_selections),
                &contest_ctx,
                Code::CastBallotMaxSelections,
                "The contest declares the expected selection limit",
            );

            // Parse every selection ciphertext; failures suppress the
            // selection's own proof and void the contest sum.
            let mut pairs: Vec<Option<(ModPElement, ModPElement)>> = Vec::new();
            for (k, selection) in contest.selections.iter().enumerate() {
                let selection_ctx = contest_ctx.child(format!("Selection #{k}"));
                let alpha = parse_element(
                    &self.group,
                    selection.message.public_key.as_str(),
                    Code::CastBallot,
                );
                let beta = parse_element(
                    &self.group,
                    selection.message.ciphertext.as_str(),
                    Code::CastBallot,
                );
                match (alpha, beta) {
                    (Ok(alpha), Ok(beta)) => pairs.push(Some((alpha, beta))),
                    (Err(failure), _) | (_, Err(failure)) => {
                        recorder.record(false, &selection_ctx, failure.code, &failure.message);
                        pairs.push(None);
                    }
                }
            }

            self.verify_contest_sum(
                &contest_ctx,
                contest,
                &pairs,
                max_selections.as_ref(),
                joint_key,
                recorder,
            );

            for (k, (selection, pair)) in contest.selections.iter().zip(&pairs).enumerate() {
                let Some((alpha, beta)) = pair else {
                    continue;
                };
                let selection_ctx = contest_ctx.child(format!("Selection #{k}"));
                let Some(key) = joint_key else {
                    recorder.record(
                        false,
                        &selection_ctx,
                        Code::ZeroOrOneProof,
                        "The joint public key is unavailable",
                    );
                    continue;
                };
                match verify_zero_or_one(
                    &self.group,
                    labels::SELECTION_ZERO_OR_ONE,
                    key,
                    alpha,
                    beta,
                    &selection.zero_proof,
                    &selection.one_proof,
                ) {
                    Ok(ok) => recorder.record(
                        ok,
                        &selection_ctx,
                        Code::ZeroOrOneProof,
                        "The selection encrypts zero or one",
                    ),
                    Err(failure) => {
                        recorder.record(false, &selection_ctx, failure.code, &failure.message);
                    }
                }
            }
        }
    }

    /// The Chaum–Pedersen predicate that a contest's homomorphic sum
    /// encrypts the selection limit.
    fn verify_contest_sum(
        &self,
        ctx: &Context,
        contest: &CastContest,
        pairs: &[Option<(ModPElement, ModPElement)>],
        max_selections: Option<&Natural>,
        joint_key: Option<&ModPElement>,
        recorder: &mut dyn Recorder,
    ) {
        let title = "The selections sum to the selection limit";
        let (Some(max_selections), Some(key)) = (max_selections, joint_key) else {
            recorder.record(
                false,
                ctx,
                Code::ChaumPedersenProof,
                "The selection limit or joint public key is unavailable",
            );
            return;
        };

        let mut sum_alpha = self.group.one();
        let mut sum_beta = self.group.one();
        for pair in pairs {
            let Some((alpha, beta)) = pair else {
                recorder.record(
                    false,
                    ctx,
                    Code::ChaumPedersenProof,
                    "A selection ciphertext could not be loaded",
                );
                return;
            };
            match (sum_alpha.mul(alpha), sum_beta.mul(beta)) {
                (Ok(alpha), Ok(beta)) => {
                    sum_alpha = alpha;
                    sum_beta = beta;
                }
                (Err(error), _) | (_, Err(error)) => {
                    recorder.record(
                        false,
                        ctx,
                        Code::ChaumPedersenProof,
                        &format!("Homomorphic sum failed: {error}"),
                    );
                    return;
                }
            }
        }

        // The statement is that S / (1, g^L) encrypts zero, i.e. that
        // (Sα, Sβ·g^-L) shares one exponent under (g, K).
        let shifted_beta = self
            .group
            .generator()
            .exp_natural(max_selections)
            .and_then(|limit| limit.inv())
            .and_then(|inv| sum_beta.mul(&inv));
        let shifted_beta = match shifted_beta {
            Ok(beta) => beta,
            Err(error) => {
                recorder.record(
                    false,
                    ctx,
                    Code::ChaumPedersenProof,
                    &format!("Selection limit could not be applied: {error}"),
                );
                return;
            }
        };
        match verify_chaum_pedersen(
            &self.group,
            labels::CONTEST_MAX_SELECTIONS,
            &contest.num_selections_proof,
            key,
            &sum_alpha,
            &shifted_beta,
        ) {
            Ok(ok) => recorder.record(ok, ctx, Code::ChaumPedersenProof, title),
            Err(failure) => recorder.record(false, ctx, failure.code, &failure.message),
        }
    }

    /// One decryption record: the shares, their correctness proofs, the
    /// optional tally aggregation, and the decryption and cleartext
    /// predicates. Returns the cleartext when the record loads, for the
    /// spoiled-ballot sum.
    fn verify_decryption(
        &self,
        ctx: &Context,
        value: &DecryptedValue,
        tally_source: Option<(usize, usize)>,
        recorder: &mut dyn Recorder,
    ) -> Option<Natural> {
        let alpha = match parse_element(
            &self.group,
            value.encrypted_value.public_key.as_str(),
            Code::AlphaLoading,
        ) {
            Ok(alpha) => alpha,
            Err(failure) => {
                recorder.record(false, ctx, failure.code, &failure.message);
                return None;
            }
        };
        let beta = match parse_element(
            &self.group,
            value.encrypted_value.ciphertext.as_str(),
            Code::DecryptionData,
        ) {
            Ok(beta) => beta,
            Err(failure) => {
                recorder.record(false, ctx, failure.code, &failure.message);
                return None;
            }
        };
        let decrypted = match parse_element(
            &self.group,
            value.decrypted_value.as_str(),
            Code::DecryptionData,
        ) {
            Ok(decrypted) => decrypted,
            Err(failure) => {
                recorder.record(false, ctx, failure.code, &failure.message);
                return None;
            }
        };

        // Load every share before verifying any proof; a single
        // unloadable share voids the whole decryption.
        let mut shares = Vec::with_capacity(value.shares.len());
        let mut all_loaded = true;
        for (k, share) in value.shares.iter().enumerate() {
            let share_ctx = ctx.child(format!("Share #{k}"));
            match parse_element(&self.group, share.share.as_str(), Code::ShareLoading) {
                Ok(element) => shares.push(element),
                Err(failure) => {
                    recorder.record(false, &share_ctx, failure.code, &failure.message);
                    all_loaded = false;
                }
            }
        }
        if !all_loaded {
            recorder.record(
                false,
                ctx,
                Code::SharesLoading,
                "Some decryption shares could not be loaded",
            );
            return None;
        }

        for (k, (share, element)) in value.shares.iter().zip(&shares).enumerate() {
            let share_ctx = ctx.child(format!("Share #{k}"));
            let trustee_key = self
                .record
                .trustee_public_keys
                .get(k)
                .and_then(|trustee| trustee.coefficients.first())
                .and_then(|coefficient| {
                    self.group
                        .element_from_decimal(coefficient.public_key.as_str())
                        .ok()
                });
            let Some(trustee_key) = trustee_key else {
                recorder.record(
                    false,
                    &share_ctx,
                    Code::ChaumPedersenProof,
                    "The trustee public key is unavailable",
                );
                continue;
            };
            match verify_chaum_pedersen(
                &self.group,
                labels::SHARE_CORRECTNESS,
                &share.proof,
                &alpha,
                &trustee_key,
                element,
            ) {
                Ok(ok) => recorder.record(
                    ok,
                    &share_ctx,
                    Code::ChaumPedersenProof,
                    "The share is a valid partial decryption",
                ),
                Err(failure) => {
                    recorder.record(false, &share_ctx, failure.code, &failure.message);
                }
            }
        }

        if let Some((contest, selection)) = tally_source {
            self.verify_tally_sum(ctx, contest, selection, &alpha, &beta, recorder);
        }

        // M = ∏ M_i, then B·M⁻¹ must be the declared decryption.
        let combined = shares
            .iter()
            .try_fold(self.group.one(), |acc, share| acc.mul(share));
        match combined.and_then(|m| m.inv()).and_then(|m_inv| beta.mul(&m_inv)) {
            Ok(quotient) => recorder.record(
                quotient == decrypted,
                ctx,
                Code::DecryptionMatches,
                "The shares decrypt the tally to the declared value",
            ),
            Err(error) => recorder.record(
                false,
                ctx,
                Code::DecryptionMatches,
                &format!("Share combination failed: {error}"),
            ),
        }

        let cleartext = match Natural::from_decimal(value.cleartext.as_str()) {
            Ok(cleartext) => cleartext,
            Err(error) => {
                recorder.record(
                    false,
                    ctx,
                    Code::DecryptionData,
                    &format!("Malformed cleartext: {error}"),
                );
                return None;
            }
        };
        match self.group.generator().exp_natural(&cleartext) {
            Ok(expected) => recorder.record(
                expected == decrypted,
                ctx,
                Code::CleartextMatches,
                "The cleartext matches the decrypted value",
            ),
            Err(error) => recorder.record(
                false,
                ctx,
                Code::CleartextMatches,
                &format!("Cleartext exponentiation failed: {error}"),
            ),
        }
        Some(cleartext)
    }

    /// The encrypted tally must be the componentwise product of the cast
    /// ballots' ciphertexts for this contest and selection.
    fn verify_tally_sum(
        &self,
        ctx: &Context,
        contest: usize,
        selection: usize,
        alpha: &ModPElement,
        beta: &ModPElement,
        recorder: &mut dyn Recorder,
    ) {
        let mut sum_alpha = self.group.one();
        let mut sum_beta = self.group.one();
        for (b, ballot) in self.record.cast_ballots.iter().enumerate() {
            let message = ballot
                .contests
                .get(contest)
                .and_then(|contest| contest.selections.get(selection))
                .map(|selection| &selection.message);
            let Some(message) = message else {
                recorder.record(
                    false,
                    ctx,
                    Code::LoadingBallots,
                    &format!("Cast ballot #{b} lacks this contest or selection"),
                );
                return;
            };
            let parsed = parse_element(&self.group, message.public_key.as_str(), Code::CastBallot)
                .and_then(|alpha| {
                    parse_element(&self.group, message.ciphertext.as_str(), Code::CastBallot)
                        .map(|beta| (alpha, beta))
                });
            let (ballot_alpha, ballot_beta) = match parsed {
                Ok(pair) => pair,
                Err(failure) => {
                    recorder.record(
                        false,
                        ctx,
                        failure.code,
                        &format!("Cast ballot #{b}: {}", failure.message),
                    );
                    return;
                }
            };
            match (sum_alpha.mul(&ballot_alpha), sum_beta.mul(&ballot_beta)) {
                (Ok(new_alpha), Ok(new_beta)) => {
                    sum_alpha = new_alpha;
                    sum_beta = new_beta;
                }
                (Err(error), _) | (_, Err(error)) => {
                    recorder.record(
                        false,
                        ctx,
                        Code::TallySum,
                        &format!("Homomorphic sum failed: {error}"),
                    );
                    return;
                }
            }
        }
        recorder.record(
            sum_alpha == *alpha && sum_beta == *beta,
            ctx,
            Code::TallySum,
            "The encrypted tally is the sum of the cast ballots",
        );
    }

    /// One spoiled ballot: tally-style decryption per selection (without
    /// cross-ballot aggregation) and a cleartext-sum check per contest.
    fn verify_spoiled_ballot(
        &self,
        ctx: &Context,
        spoiled: &SpoiledBallot,
        schema: &[ContestSchema],
        recorder: &mut dyn Recorder,
    ) {
        for (j, contest) in spoiled.contests.iter().enumerate() {
            let contest_ctx = ctx.child(format!("Contest #{j}"));
            let mut cleartexts = Vec::with_capacity(contest.selections.len());
            for (k, value) in contest.selections.iter().enumerate() {
                let selection_ctx = contest_ctx.child(format!("Selection #{k}"));
                cleartexts.push(self.verify_decryption(&selection_ctx, value, None, recorder));
            }

            // The sum check needs every cleartext and the contest's
            // limit; a failed selection above suppresses it.
            let all: Option<Vec<Natural>> = cleartexts.into_iter().collect();
            let limit = schema.get(j).and_then(|entry| entry.max_selections.clone());
            if let (Some(cleartexts), Some(limit)) = (all, limit) {
                let sum = cleartexts
                    .iter()
                    .fold(Natural::zero(), |acc, value| acc.add(value));
                recorder.record(
                    sum == limit,
                    &contest_ctx,
                    Code::SumOfPlaintexts,
                    "The cleartexts sum to the selection limit",
                );
            }
        }
    }
}
