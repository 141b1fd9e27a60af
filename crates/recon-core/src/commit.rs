//! The sequenced commit record.

use crate::ids::{RefNumber, SeqNumber, SessionId};
use serde::{Deserialize, Serialize};

/// A sequenced edit: a changeset together with its authorship and its
/// position in the sequencer's total order.
///
/// `ref_number` is the largest sequence number the author had observed when
/// the change was authored, so `ref_number < seq_number` always holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Commit<C> {
    pub session_id: SessionId,
    pub seq_number: SeqNumber,
    pub ref_number: RefNumber,
    pub change: C,
}

impl<C> Commit<C> {
    pub fn new(
        session_id: SessionId,
        seq_number: SeqNumber,
        ref_number: RefNumber,
        change: C,
    ) -> Self {
        Self {
            session_id,
            seq_number,
            ref_number,
            change,
        }
    }

    /// Whether this commit was authored by `session`.
    pub fn is_authored_by(&self, session: &SessionId) -> bool {
        self.session_id == *session
    }
}
