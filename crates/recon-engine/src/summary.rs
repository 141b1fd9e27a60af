//! Versioned JSON summaries of the sequenced history.
//!
//! Owned by the surrounding persistence layer: the engine only supplies the
//! data being summarized. Only the trunk is persisted — in-flight local
//! edits are volatile and resubmitted by the host after reconnection.

use crate::error::EditError;
use crate::manager::EditManager;
use recon_core::{ChangeCodec, CodecError, Commit, RefNumber, SeqNumber, SessionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current summary format version.
pub const SUMMARY_VERSION: u32 = 1;

/// Errors produced while summarizing or restoring a manager.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("summary version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u32, actual: u32 },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("summarized trunk is not a valid history: {0}")]
    InvalidTrunk(#[from] EditError),
}

/// One trunk commit with its changeset encoded for storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummarizedCommit {
    pub session_id: SessionId,
    pub seq_number: SeqNumber,
    pub ref_number: RefNumber,
    pub change: serde_json::Value,
}

/// A durable description of the sequenced history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditSummary {
    pub version: u32,
    pub trunk: Vec<SummarizedCommit>,
}

/// Encode the manager's trunk at the current summary version.
pub fn summarize<F: ChangeCodec>(manager: &EditManager<F>) -> Result<EditSummary, SummaryError> {
    let family = manager.family();
    let mut trunk = Vec::with_capacity(manager.trunk().len());
    for commit in manager.trunk() {
        trunk.push(SummarizedCommit {
            session_id: commit.session_id.clone(),
            seq_number: commit.seq_number,
            ref_number: commit.ref_number,
            change: family.encode_json(SUMMARY_VERSION, &commit.change)?,
        });
    }
    Ok(EditSummary {
        version: SUMMARY_VERSION,
        trunk,
    })
}

/// Rebuild a manager from a summary.
///
/// The provided anchor set is rebased over every restored trunk change so a
/// freshly constructed anchor set ends consistent with the trunk. The
/// session identity is left unset; the host assigns it before ingesting.
pub fn restore<F: ChangeCodec>(
    family: F,
    mut anchors: F::Anchors,
    summary: &EditSummary,
) -> Result<EditManager<F>, SummaryError> {
    if summary.version != SUMMARY_VERSION {
        return Err(SummaryError::VersionMismatch {
            expected: SUMMARY_VERSION,
            actual: summary.version,
        });
    }
    let mut commits = Vec::with_capacity(summary.trunk.len());
    for summarized in &summary.trunk {
        let change = family.decode_json(summary.version, &summarized.change)?;
        family.rebase_anchors(&mut anchors, &change);
        commits.push(Commit::new(
            summarized.session_id.clone(),
            summarized.seq_number,
            summarized.ref_number,
            change,
        ));
    }
    Ok(EditManager::with_trunk(family, anchors, commits)?)
}
