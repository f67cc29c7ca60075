//! Decimal-string numbers as they appear on the wire.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A big natural number in its on-wire form: a decimal string.
///
/// The record schema never interprets these; the verifier parses each
/// one into its domain (field or group) and reports failures as
/// predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct BigNum(pub String);

impl BigNum {
    /// The raw decimal string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BigNum {
    fn from(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl From<String> for BigNum {
    fn from(text: String) -> Self {
        Self(text)
    }
}
