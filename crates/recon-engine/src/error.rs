//! Fatal error kinds for the edit manager.
//!
//! Every error here indicates a bug in the caller or the delivery path,
//! never a transient condition. After any error the manager must be treated
//! as poisoned and rebuilt from a fresh summary.

use recon_core::{SeqNumber, SessionId};
use thiserror::Error;

/// Errors surfaced by edit-manager operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// `add_local_change` was called before the session identity was set.
    #[error("local session id has not been set")]
    SessionNotSet,

    /// The session identity was already set to a different value.
    #[error("local session id is already {current}, refusing to become {requested}")]
    SessionAlreadySet {
        current: SessionId,
        requested: SessionId,
    },

    /// A sequenced commit arrived on a manager with no session identity.
    #[error("sequenced commit {seq} ingested before the local session id was set")]
    SequencedBeforeSession { seq: SeqNumber },

    /// The sequencer's total order was broken: a gap or a replay.
    #[error("sequenced commit out of order: expected {expected}, got {got} from session {session}")]
    OutOfOrder {
        expected: SeqNumber,
        got: SeqNumber,
        session: SessionId,
    },

    /// An own commit was acknowledged but no local change is in flight.
    #[error("own commit {seq} from session {session} acknowledged with an empty local branch")]
    UnexpectedAck { seq: SeqNumber, session: SessionId },
}

pub type Result<T> = std::result::Result<T, EditError>;
