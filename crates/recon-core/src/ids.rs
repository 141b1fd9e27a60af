//! Branded identifiers for sessions and sequencing.
//!
//! All three are nominal wrappers: a `SeqNumber` is assigned by the central
//! sequencer, a `RefNumber` records what a commit's author had observed, and
//! the two never mix arithmetically. Comparison across the two kinds is
//! explicit via the cross-kind `PartialOrd` impls.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use ulid::Ulid;

/// Identity of one participant in a shared-document session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh session identity.
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position in the sequencer's total order.
///
/// Sequence numbers are contiguous from 1; [`SeqNumber::ZERO`] is the
/// pre-history value observed by a fresh client with no commits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SeqNumber(u64);

impl SeqNumber {
    /// Pre-history: no commit carries this number.
    pub const ZERO: SeqNumber = SeqNumber(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// The next number in the total order.
    pub fn next(self) -> SeqNumber {
        SeqNumber(self.0 + 1)
    }
}

impl fmt::Display for SeqNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The largest sequence number a commit's author had observed at authoring
/// time. Defines the concurrency frontier: everything sequenced later is
/// concurrent with the commit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RefNumber(u64);

impl RefNumber {
    /// The frontier of a client that has observed nothing.
    pub const ZERO: RefNumber = RefNumber(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<SeqNumber> for RefNumber {
    fn from(seq: SeqNumber) -> Self {
        Self(seq.value())
    }
}

impl fmt::Display for RefNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<SeqNumber> for RefNumber {
    fn eq(&self, other: &SeqNumber) -> bool {
        self.0 == other.value()
    }
}

impl PartialOrd<SeqNumber> for RefNumber {
    fn partial_cmp(&self, other: &SeqNumber) -> Option<Ordering> {
        self.0.partial_cmp(&other.value())
    }
}

impl PartialEq<RefNumber> for SeqNumber {
    fn eq(&self, other: &RefNumber) -> bool {
        self.0 == other.value()
    }
}

impl PartialOrd<RefNumber> for SeqNumber {
    fn partial_cmp(&self, other: &RefNumber) -> Option<Ordering> {
        self.0.partial_cmp(&other.value())
    }
}
