//! Integer-intention changesets: the reference change family.
//!
//! A changeset is an ordered list of non-zero signed integers. Composition
//! concatenates the lists, cancelling adjacent `+i`/`-i` pairs; inversion
//! reverses and negates; rebasing leaves the list untouched because an
//! intention does not depend on what was applied before it. Small enough to
//! reason about by hand, rich enough to exercise undo/redo bracketing end
//! to end.

use crate::codec::{ChangeCodec, CodecError};
use crate::family::ChangeFamily;
use serde::{Deserialize, Serialize};

/// Codec version for [`CountChange`] payloads.
pub const COUNT_CODEC_VERSION: u32 = 1;

/// A changeset over integer intentions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountChange {
    intents: Vec<i64>,
}

impl CountChange {
    /// The identity change.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A change carrying a single intention. `intent` must be non-zero:
    /// zero is its own negation and cannot be cancelled coherently.
    pub fn mint(intent: i64) -> Self {
        debug_assert!(intent != 0, "zero is not a valid intention");
        Self {
            intents: vec![intent],
        }
    }

    /// Build a change from a list of intentions, normalizing cancellations.
    pub fn from_intents(intents: impl IntoIterator<Item = i64>) -> Self {
        let mut out = Vec::new();
        for intent in intents {
            push_cancelling(&mut out, intent);
        }
        Self { intents: out }
    }

    pub fn intents(&self) -> &[i64] {
        &self.intents
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

fn push_cancelling(stack: &mut Vec<i64>, intent: i64) {
    if stack.last() == Some(&-intent) {
        stack.pop();
    } else {
        stack.push(intent);
    }
}

/// Apply an emitted delta to a view held as a reduced intention list.
///
/// This is the view-layer half of the contract: a client that applies every
/// emitted delta in order ends up with the composition of the sequenced
/// history and its own in-flight edits.
pub fn apply_delta(view: &mut Vec<i64>, delta: &[i64]) {
    for &intent in delta {
        push_cancelling(view, intent);
    }
}

/// The reference change family over [`CountChange`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CountingFamily;

/// Anchor set for the counting family: every intention it has been rebased
/// over, in observation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountAnchors {
    intents: Vec<i64>,
}

impl CountAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> &[i64] {
        &self.intents
    }
}

impl ChangeFamily for CountingFamily {
    type Change = CountChange;
    type Delta = Vec<i64>;
    type Anchors = CountAnchors;

    fn compose(&self, changes: &[CountChange]) -> CountChange {
        let mut intents = Vec::new();
        for change in changes {
            for &intent in &change.intents {
                push_cancelling(&mut intents, intent);
            }
        }
        CountChange { intents }
    }

    fn invert(&self, change: &CountChange) -> CountChange {
        CountChange {
            intents: change.intents.iter().rev().map(|i| -i).collect(),
        }
    }

    fn rebase(&self, change: &CountChange, _over: &CountChange) -> CountChange {
        change.clone()
    }

    fn rebase_anchors(&self, anchors: &mut CountAnchors, over: &CountChange) {
        anchors.intents.extend_from_slice(&over.intents);
    }

    fn into_delta(&self, change: &CountChange) -> Vec<i64> {
        change.intents.clone()
    }

    fn is_identity(&self, change: &CountChange) -> bool {
        change.is_empty()
    }
}

impl ChangeCodec for CountingFamily {
    fn encode_json(
        &self,
        version: u32,
        change: &CountChange,
    ) -> Result<serde_json::Value, CodecError> {
        if version != COUNT_CODEC_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        serde_json::to_value(change).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    fn decode_json(
        &self,
        version: u32,
        data: &serde_json::Value,
    ) -> Result<CountChange, CodecError> {
        if version != COUNT_CODEC_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        serde_json::from_value(data.clone()).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn compose_cancels_adjacent_pairs() {
        let family = CountingFamily;
        let composed = family.compose(&[CountChange::mint(3), CountChange::mint(-3)]);
        assert!(composed.is_empty());

        let bracketed = family.compose(&[
            CountChange::mint(-3),
            CountChange::mint(1),
            CountChange::mint(3),
        ]);
        assert_eq!(bracketed.intents(), [-3, 1, 3]);
    }

    #[test]
    fn invert_reverses_and_negates() {
        let family = CountingFamily;
        let change = CountChange::from_intents([1, 2]);
        assert_eq!(family.invert(&change).intents(), [-2, -1]);
        assert!(family
            .compose(&[change.clone(), family.invert(&change)])
            .is_empty());
    }

    #[test]
    fn codec_round_trips_at_current_version() {
        let family = CountingFamily;
        let change = CountChange::from_intents([4, -7, 4]);
        let encoded = family.encode_json(COUNT_CODEC_VERSION, &change).unwrap();
        let decoded = family.decode_json(COUNT_CODEC_VERSION, &encoded).unwrap();
        assert_eq!(decoded, change);
    }

    #[test]
    fn codec_rejects_unknown_version() {
        let family = CountingFamily;
        let change = CountChange::mint(1);
        assert_eq!(
            family.encode_json(99, &change),
            Err(CodecError::UnsupportedVersion(99))
        );
        let encoded = family.encode_json(COUNT_CODEC_VERSION, &change).unwrap();
        assert_eq!(
            family.decode_json(2, &encoded),
            Err(CodecError::UnsupportedVersion(2))
        );
    }

    fn change_strategy() -> impl Strategy<Value = CountChange> {
        prop::collection::vec(prop_oneof![-9i64..=-1, 1i64..=9], 0..6)
            .prop_map(|intents| CountChange::from_intents(intents))
    }

    proptest! {
        #[test]
        fn compose_of_nothing_is_identity(a in change_strategy()) {
            let family = CountingFamily;
            let identity = family.empty_change();
            prop_assert_eq!(family.compose(&[a.clone(), identity.clone()]), a.clone());
            prop_assert_eq!(family.compose(&[identity, a.clone()]), a);
        }

        #[test]
        fn compose_is_associative(
            a in change_strategy(),
            b in change_strategy(),
            c in change_strategy()
        ) {
            let family = CountingFamily;
            let left = family.compose(&[family.compose(&[a.clone(), b.clone()]), c.clone()]);
            let right = family.compose(&[a, family.compose(&[b, c])]);
            prop_assert_eq!(left, right);
        }

        #[test]
        fn invert_distributes_over_compose(a in change_strategy(), b in change_strategy()) {
            let family = CountingFamily;
            let left = family.invert(&family.compose(&[a.clone(), b.clone()]));
            let right = family.compose(&[family.invert(&b), family.invert(&a)]);
            prop_assert_eq!(left, right);
        }

        #[test]
        fn change_cancels_with_its_inverse(a in change_strategy()) {
            let family = CountingFamily;
            prop_assert!(family.compose(&[a.clone(), family.invert(&a)]).is_empty());
            prop_assert!(family.compose(&[family.invert(&a), a]).is_empty());
        }

        #[test]
        fn rebase_over_identity_is_identity(a in change_strategy()) {
            let family = CountingFamily;
            let identity = family.empty_change();
            prop_assert_eq!(family.rebase(&a, &identity), a);
        }
    }
}
