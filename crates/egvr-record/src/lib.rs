//! Serialized schema of the ElectionGuard v0.85 election record.
//!
//! These types mirror the fixed JSON layout of a published election
//! record. Every big natural number on the wire is a decimal string,
//! kept as an opaque [`BigNum`] here: conversion into field and group
//! elements happens during verification, so a malformed value surfaces
//! as a failed predicate in the audit trail rather than a load error.

mod bignum;
mod record;

pub use bignum::BigNum;
pub use record::{
    BallotInfo, CastBallot, CastContest, CastSelection, ChaumPedersenWireProof, ContestTally,
    DecryptedValue, EncryptedMessage, Fragment, Parameters, Record, RecordError, SchnorrWireProof,
    Share, ShareRecovery, SpoiledBallot, SpoiledContest, TrusteeCoefficient, TrusteePublicKey,
    record_schema_json,
};
