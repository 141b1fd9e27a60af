//! The change-family capability: the algebra the engine is parameterized
//! over.
//!
//! A change family supplies, for an opaque changeset type:
//! - `compose`: sequential composition, identity on the empty slice
//! - `invert`: compositional inverse, `invert(compose([a, b])) =
//!   compose([invert(b), invert(a)])`
//! - `rebase`: transposition — `rebase(a, b)` applies after `b` with the
//!   intention of `a`, and `rebase(x, identity) = x`
//!
//! The engine assumes these laws; it never verifies them. Anchor rebasing
//! mutates the host's anchor set in place, and `into_delta` projects a
//! changeset into the concrete document delta the view layer consumes.

/// Capability record over an opaque changeset type.
///
/// Implementations are injected into the engine; nothing in this crate or
/// the engine inspects a changeset beyond equality with the identity.
pub trait ChangeFamily {
    /// Opaque changeset. Equality is only used to recognize identity
    /// changes so they can be short-circuited.
    type Change: Clone + PartialEq;

    /// The concrete document mutation handed to the view layer.
    type Delta;

    /// The host's set of stable references into the document.
    type Anchors;

    /// Sequential composition. Must be associative with `compose(&[])` as
    /// a two-sided identity.
    fn compose(&self, changes: &[Self::Change]) -> Self::Change;

    /// Compositional inverse.
    fn invert(&self, change: &Self::Change) -> Self::Change;

    /// Transpose `change` to apply after `over`, preserving its intention.
    fn rebase(&self, change: &Self::Change, over: &Self::Change) -> Self::Change;

    /// Update the anchor set, in place, for the effects of `over`.
    fn rebase_anchors(&self, anchors: &mut Self::Anchors, over: &Self::Change);

    /// Project a changeset into the document delta.
    fn into_delta(&self, change: &Self::Change) -> Self::Delta;

    /// The identity changeset.
    fn empty_change(&self) -> Self::Change {
        self.compose(&[])
    }

    /// Whether `change` is the identity.
    fn is_identity(&self, change: &Self::Change) -> bool {
        *change == self.empty_change()
    }
}
