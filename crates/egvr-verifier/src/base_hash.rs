//! Base-hash computation seam.
//!
//! The record format used by this verifier predates a settled normative
//! construction for the base and extended base hashes: the generator it
//! verifies against emits the one-byte value 0 for both. The computation
//! is therefore a trait collaborator — the stub reproduces the
//! generator's behavior today, and the normative construction replaces
//! it behind the same seam without touching the walk.

use egvr_arith::Natural;
use egvr_record::Record;

/// Computes the expected base and extended base hashes of a record.
pub trait BaseHash {
    /// The base hash `Q` the record should declare.
    fn base_hash(&self, record: &Record) -> Natural;

    /// The extended base hash `Q̄` the record should declare.
    fn extended_base_hash(&self, record: &Record) -> Natural;
}

/// The generator's stub: both hashes are zero. Records produced by other
/// tooling will fail the base-hash predicates, which is the intended
/// conservative behavior until the real construction lands here.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBaseHash;

impl BaseHash for StubBaseHash {
    fn base_hash(&self, _record: &Record) -> Natural {
        Natural::zero()
    }

    fn extended_base_hash(&self, _record: &Record) -> Natural {
        Natural::zero()
    }
}
