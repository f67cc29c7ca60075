//! A miniature election generator for verification-tree tests.
//!
//! Builds a complete, honest election record over a small safe-prime
//! group (p = 2039, q = 1019, g = 4): trustee coefficient commitments
//! with Schnorr proofs, cast ballots with zero-or-one and
//! selection-limit proofs, homomorphic tallies with decryption shares,
//! and one spoiled ballot. Tests corrupt targeted pieces of the result
//! and assert on the exact audit trail.

use std::sync::Arc;

use egvr_algebra::{
    ByteTree, Field, FieldElement, GroupElement, ModPElement, ModPGroup, ProductGroup, challenge,
};
use egvr_arith::Natural;
use egvr_record::{
    BallotInfo, BigNum, CastBallot, CastContest, CastSelection, ChaumPedersenWireProof,
    ContestTally, DecryptedValue, EncryptedMessage, Parameters, Record, SchnorrWireProof, Share,
    SpoiledBallot, SpoiledContest, TrusteeCoefficient, TrusteePublicKey,
};
use egvr_verifier::proofs::labels;
use rand::RngCore as _;
use rand::SeedableRng as _;
use rand_xorshift::XorShiftRng;

/// Number of trustees `n`.
pub const NUM_TRUSTEES: usize = 4;
/// Threshold `t` (and coefficients per trustee).
pub const THRESHOLD: usize = 2;
/// Selections per contest.
pub const CONTEST_SELECTIONS: [usize; 3] = [2, 2, 3];
/// Selection limit `L` for every contest.
pub const MAX_SELECTIONS: u64 = 1;
/// Number of cast ballots.
pub const CAST_BALLOTS: usize = 2;

/// The group every test record lives in.
pub fn test_group() -> Arc<ModPGroup> {
    ModPGroup::new(
        Natural::from(2039u32),
        Natural::from(1019u32),
        Natural::from(4u32),
    )
    .expect("test group")
}

fn decimal(value: &Natural) -> BigNum {
    BigNum::from(value.to_decimal())
}

fn element_num(element: &ModPElement) -> BigNum {
    decimal(element.value())
}

fn field_num(element: &FieldElement) -> BigNum {
    decimal(element.value())
}

struct Prover {
    group: Arc<ModPGroup>,
    pair: ProductGroup,
    rng: XorShiftRng,
}

impl Prover {
    fn field(&self) -> &Arc<Field> {
        self.group.field()
    }

    fn random_scalar(&mut self) -> FieldElement {
        let value = self.rng.next_u64();
        self.field().element_mod(&Natural::from(value))
    }

    fn generator(&self) -> ModPElement {
        self.group.generator()
    }

    /// An honest Schnorr proof of knowledge of `witness`, returning the
    /// instance `g^witness` and the wire proof.
    fn schnorr(&mut self, label: &[u8], witness: &FieldElement) -> (ModPElement, SchnorrWireProof) {
        let g = self.generator();
        let instance = g.exp(witness).expect("exp");
        let nonce = self.random_scalar();
        let commitment = g.exp(&nonce).expect("exp");
        let c = challenge(
            label,
            instance.to_byte_tree(),
            commitment.to_byte_tree(),
            self.field(),
        );
        let response = nonce.add(&c.mul(witness).expect("mul")).expect("add");
        let wire = SchnorrWireProof {
            commitment: element_num(&commitment),
            challenge: field_num(&c),
            response: field_num(&response),
        };
        (instance, wire)
    }

    /// An honest Chaum–Pedersen proof that the instance
    /// `((g, second_base))^witness` shares one exponent.
    fn chaum_pedersen(
        &mut self,
        label: &[u8],
        second_base: &ModPElement,
        witness: &FieldElement,
    ) -> ChaumPedersenWireProof {
        let basis = self
            .pair
            .prod(vec![self.generator(), second_base.clone()])
            .expect("basis");
        let instance = basis.exp(&witness.clone().into()).expect("exp");
        let nonce = self.random_scalar();
        let commitment = basis.exp(&nonce.clone().into()).expect("exp");
        let c = challenge(
            label,
            instance.to_byte_tree(),
            commitment.to_byte_tree(),
            self.field(),
        );
        let response = nonce.add(&c.mul(witness).expect("mul")).expect("add");
        ChaumPedersenWireProof {
            commitment: EncryptedMessage {
                public_key: element_num(&commitment.components()[0]),
                ciphertext: element_num(&commitment.components()[1]),
            },
            challenge: field_num(&c),
            response: field_num(&response),
        }
    }

    /// A CDS zero-or-one proof for `(α, β)` encrypting `m` with
    /// randomness `r` under `key`. For `m` outside `{0, 1}` the honest
    /// branch is a false statement and the proof will not verify.
    fn zero_or_one(
        &mut self,
        key: &ModPElement,
        alpha: &ModPElement,
        beta: &ModPElement,
        m: u64,
        r: &FieldElement,
    ) -> (ChaumPedersenWireProof, ChaumPedersenWireProof) {
        let basis = self
            .pair
            .prod(vec![self.generator(), key.clone()])
            .expect("basis");
        let basis: GroupElement = basis.into();
        let beta_shift = self
            .generator()
            .inv()
            .and_then(|inv| beta.mul(&inv))
            .expect("shift");
        let instances = [
            self.pair
                .prod(vec![alpha.clone(), beta.clone()])
                .expect("instance"),
            self.pair
                .prod(vec![alpha.clone(), beta_shift])
                .expect("instance"),
        ];

        let true_branch = usize::from(m != 0).min(1);
        let sim_branch = 1 - true_branch;

        // Simulated branch: pick challenge and response, derive the
        // commitment as basis^z · instance^-c.
        let sim_challenge = self.random_scalar();
        let sim_response = self.random_scalar();
        let sim_commitment = basis
            .exp(&sim_response.clone().into())
            .and_then(|num| {
                GroupElement::from(instances[sim_branch].clone())
                    .exp(&sim_challenge.clone().into())
                    .and_then(|den| den.inv())
                    .and_then(|den| num.mul(&den))
            })
            .expect("simulate");

        // Honest branch: commit, then answer whatever challenge remains.
        let nonce = self.random_scalar();
        let true_commitment = basis.exp(&nonce.clone().into()).expect("commit");

        let mut commitments = [sim_commitment.clone(), sim_commitment];
        commitments[true_branch] = true_commitment;

        let instance_tree = ByteTree::node(
            instances
                .iter()
                .map(|instance| instance.to_byte_tree())
                .collect(),
        );
        let commitment_tree = ByteTree::node(
            commitments
                .iter()
                .map(GroupElement::to_byte_tree)
                .collect(),
        );
        let total = challenge(
            labels::SELECTION_ZERO_OR_ONE,
            instance_tree,
            commitment_tree,
            self.field(),
        );
        let true_challenge = total.sub(&sim_challenge).expect("sub");
        let true_response = nonce
            .add(&true_challenge.mul(r).expect("mul"))
            .expect("add");

        let mut challenges = [sim_challenge.clone(), sim_challenge];
        challenges[true_branch] = true_challenge;
        let mut responses = [sim_response.clone(), sim_response];
        responses[true_branch] = true_response;

        let wire = |branch: usize| {
            let GroupElement::Product(commitment) = &commitments[branch] else {
                panic!("commitment must be a pair");
            };
            ChaumPedersenWireProof {
                commitment: EncryptedMessage {
                    public_key: element_num(&commitment.components()[0]),
                    ciphertext: element_num(&commitment.components()[1]),
                },
                challenge: field_num(&challenges[branch]),
                response: field_num(&responses[branch]),
            }
        };
        (wire(0), wire(1))
    }
}

fn ballot_info(tag: &str) -> BallotInfo {
    BallotInfo {
        date: "2026-06-02".to_owned(),
        device_info: "test fixture".to_owned(),
        time: "12:00".to_owned(),
        tracker: tag.to_owned(),
    }
}

/// A complete honest election record over [`test_group`], every proof
/// consistent with the verifier's Fiat–Shamir layering. In every
/// contest the first selection encrypts one and the rest zero.
pub fn build_record(seed: u64) -> (Arc<ModPGroup>, Record) {
    build_record_with(seed, &|_, _, selection| u64::from(selection == 0))
}

/// Like [`build_record`], with the plaintext of each cast-ballot
/// selection chosen by `message(ballot, contest, selection)`. Values
/// outside `{0, 1}` yield honest-looking but non-verifying proofs.
pub fn build_record_with(
    seed: u64,
    message: &dyn Fn(usize, usize, usize) -> u64,
) -> (Arc<ModPGroup>, Record) {
    let group = test_group();
    let mut prover = Prover {
        group: Arc::clone(&group),
        pair: ProductGroup::uniform(&group, 2).expect("pair"),
        rng: XorShiftRng::seed_from_u64(seed),
    };

    // Trustees: t coefficients each, with proofs of knowledge. The
    // first coefficient is the trustee's share of the joint key.
    let mut trustee_secrets: Vec<FieldElement> = Vec::new();
    let mut trustee_rows = Vec::new();
    for _ in 0..NUM_TRUSTEES {
        let mut coefficients = Vec::new();
        for j in 0..THRESHOLD {
            let secret = prover.random_scalar();
            let (commitment, proof) = prover.schnorr(labels::TRUSTEE_COEFFICIENT, &secret);
            if j == 0 {
                trustee_secrets.push(secret);
            }
            coefficients.push(TrusteeCoefficient {
                public_key: element_num(&commitment),
                proof,
            });
        }
        trustee_rows.push(TrusteePublicKey { coefficients });
    }
    let joint_secret = trustee_secrets
        .iter()
        .skip(1)
        .fold(trustee_secrets[0].clone(), |acc, secret| {
            acc.add(secret).expect("add")
        });
    let joint_key = prover.generator().exp(&joint_secret).expect("exp");

    // Cast ballots: in every contest, the first selection encrypts one
    // and the rest encrypt zero, so each contest sums to L = 1.
    let mut ballots = Vec::new();
    let mut randomness: Vec<Vec<Vec<FieldElement>>> = Vec::new();
    let mut plaintexts: Vec<Vec<Vec<u64>>> = Vec::new();
    for b in 0..CAST_BALLOTS {
        let mut contests = Vec::new();
        let mut ballot_randomness = Vec::new();
        let mut ballot_plaintexts = Vec::new();
        for (i, selections) in CONTEST_SELECTIONS.into_iter().enumerate() {
            let messages: Vec<u64> = (0..selections).map(|k| message(b, i, k)).collect();
            let (contest, contest_randomness) =
                encrypt_contest(&mut prover, &joint_key, &messages);
            contests.push(contest);
            ballot_randomness.push(contest_randomness);
            ballot_plaintexts.push(messages);
        }
        ballots.push(CastBallot {
            ballot_info: ballot_info(&format!("cast-{b}")),
            contests,
        });
        randomness.push(ballot_randomness);
        plaintexts.push(ballot_plaintexts);
    }

    // Tallies: homomorphic sums decrypted with one share per trustee.
    let mut tallies = Vec::new();
    for (i, &selections) in CONTEST_SELECTIONS.iter().enumerate() {
        let mut decrypted = Vec::new();
        for j in 0..selections {
            let total_m: u64 = plaintexts.iter().map(|ballot| ballot[i][j]).sum();
            let total_r = randomness
                .iter()
                .map(|ballot| ballot[i][j].clone())
                .reduce(|acc, r| acc.add(&r).expect("add"))
                .expect("nonempty");
            decrypted.push(decrypt_value(
                &mut prover,
                &trustee_secrets,
                &joint_key,
                total_m,
                &total_r,
            ));
        }
        tallies.push(ContestTally {
            selections: decrypted,
        });
    }

    // One spoiled ballot, decrypted selection-wise.
    let mut spoiled_contests = Vec::new();
    for selections in CONTEST_SELECTIONS {
        let messages: Vec<u64> = (0..selections).map(|k| u64::from(k == 0)).collect();
        let mut decrypted = Vec::new();
        for &m in &messages {
            let r = prover.random_scalar();
            decrypted.push(decrypt_value(
                &mut prover,
                &trustee_secrets,
                &joint_key,
                m,
                &r,
            ));
        }
        spoiled_contests.push(SpoiledContest {
            selections: decrypted,
        });
    }

    let record = Record {
        parameters: Parameters {
            date: "2026-06-02".to_owned(),
            location: "Gadget County".to_owned(),
            num_trustees: BigNum::from(NUM_TRUSTEES.to_string()),
            threshold: BigNum::from(THRESHOLD.to_string()),
            prime: decimal(group.modulus()),
            generator: decimal(group.generator().value()),
        },
        base_hash: BigNum::from("0"),
        trustee_public_keys: trustee_rows,
        joint_public_key: element_num(&joint_key),
        extended_base_hash: BigNum::from("0"),
        cast_ballots: ballots,
        contest_tallies: tallies,
        spoiled_ballots: vec![SpoiledBallot {
            ballot_info: ballot_info("spoiled-0"),
            contests: spoiled_contests,
        }],
    };
    (group, record)
}

/// Encrypts one contest's selections and proves the selection limit.
fn encrypt_contest(
    prover: &mut Prover,
    joint_key: &ModPElement,
    messages: &[u64],
) -> (CastContest, Vec<FieldElement>) {
    let g = prover.generator();
    let mut selections = Vec::new();
    let mut randomness = Vec::new();
    let mut sum_r: Option<FieldElement> = None;
    for &m in messages {
        let r = prover.random_scalar();
        let alpha = g.exp(&r).expect("exp");
        let g_m = g.exp_natural(&Natural::from(m)).expect("exp");
        let beta = joint_key.exp(&r).and_then(|k_r| k_r.mul(&g_m)).expect("beta");
        let (zero_proof, one_proof) = prover.zero_or_one(joint_key, &alpha, &beta, m, &r);
        selections.push(CastSelection {
            message: EncryptedMessage {
                public_key: element_num(&alpha),
                ciphertext: element_num(&beta),
            },
            zero_proof,
            one_proof,
        });
        sum_r = Some(match sum_r {
            None => r.clone(),
            Some(acc) => acc.add(&r).expect("add"),
        });
        randomness.push(r);
    }
    let sum_r = sum_r.expect("contest has selections");
    let num_selections_proof =
        prover.chaum_pedersen(labels::CONTEST_MAX_SELECTIONS, joint_key, &sum_r);
    (
        CastContest {
            selections,
            max_selections: BigNum::from(MAX_SELECTIONS.to_string()),
            num_selections_proof,
        },
        randomness,
    )
}

/// Encrypts `g^m` under the joint key with randomness `r` and produces
/// the full decryption record: shares, proofs, decrypted value, and
/// cleartext.
fn decrypt_value(
    prover: &mut Prover,
    trustee_secrets: &[FieldElement],
    joint_key: &ModPElement,
    m: u64,
    r: &FieldElement,
) -> DecryptedValue {
    let g = prover.generator();
    let alpha = g.exp(r).expect("exp");
    let g_m = g.exp_natural(&Natural::from(m)).expect("exp");
    let beta = joint_key.exp(r).and_then(|k_r| k_r.mul(&g_m)).expect("beta");

    let mut shares = Vec::new();
    for secret in trustee_secrets {
        let share = alpha.exp(secret).expect("share");
        let proof = prover.chaum_pedersen(labels::SHARE_CORRECTNESS, &alpha, secret);
        shares.push(Share {
            recovery: None,
            proof,
            share: element_num(&share),
        });
    }

    DecryptedValue {
        cleartext: BigNum::from(m.to_string()),
        decrypted_value: element_num(&g_m),
        encrypted_value: EncryptedMessage {
            public_key: element_num(&alpha),
            ciphertext: element_num(&beta),
        },
        shares,
    }
}

/// An honest proof that `(A, B)` encrypts one under `key`: returns
/// `(group, key, A, B, proof)` with `A = g^x`, `B = g·K^x`. The proof's
/// instance is `(A, B·g⁻¹)`.
pub fn one_encryption_fixture(
    seed: u64,
) -> (
    Arc<ModPGroup>,
    ModPElement,
    ModPElement,
    ModPElement,
    ChaumPedersenWireProof,
) {
    let group = test_group();
    let mut prover = Prover {
        group: Arc::clone(&group),
        pair: ProductGroup::uniform(&group, 2).expect("pair"),
        rng: XorShiftRng::seed_from_u64(seed),
    };
    let g = prover.generator();
    let key = g.exp(&prover.random_scalar()).expect("key");
    let x = prover.random_scalar();
    let alpha = g.exp(&x).expect("alpha");
    let beta = key
        .exp(&x)
        .and_then(|k_x| k_x.mul(&g))
        .expect("beta");
    let proof = prover.chaum_pedersen(labels::CONTEST_MAX_SELECTIONS, &key, &x);
    (group, key, alpha, beta, proof)
}

/// A quadratic non-residue of the test group's modulus, for corrupting
/// share values.
pub fn non_residue(group: &Arc<ModPGroup>) -> Natural {
    let mut candidate = Natural::from(2u32);
    loop {
        if egvr_arith::legendre(&candidate, group.modulus()).expect("legendre") == -1 {
            return candidate;
        }
        candidate = candidate.add(&Natural::one());
    }
}
