//! Election-record verification.
//!
//! The verification tree walks a parsed ElectionGuard v0.85 record —
//! parameters, trustee key commitments, cast ballots, contest tallies,
//! spoiled ballots — and emits one named predicate per check into a
//! [`Recorder`]. Proof-record adapters translate the record's
//! decimal-string proofs into sigma-verifier statements; values that
//! fail to parse become failure predicates rather than errors, so a
//! single run always produces the complete audit trail.

mod base_hash;
mod code;
pub mod proofs;
mod recorder;
mod tree;

pub use base_hash::{BaseHash, StubBaseHash};
pub use code::Code;
pub use proofs::LoadFailure;
pub use recorder::{CollectingRecorder, Context, Failure, LogRecorder, Recorder};
pub use tree::Verifier;
