//! The edit manager: folds sequenced commits into the trunk while keeping
//! the local branch rebased on top.
//!
//! Ingesting a peer commit proceeds in one pass:
//! 1. transpose the incoming change over every trunk commit it was
//!    concurrent with, so it applies after the current trunk head;
//! 2. invert the composed local branch (the undo prefix);
//! 3. rebase each branch entry over the transposed change, advancing the
//!    rebase base past each entry's old form so every entry keeps its
//!    input context;
//! 4. rebase the anchor set over the single transposed change;
//! 5. emit `compose([undo, transposed, redo])` as the corrective delta.
//!
//! Own commits are acknowledgements: the branch head moves to the trunk
//! unchanged and the emitted delta is empty, because the view already
//! contains that edit.

use crate::branch::LocalBranch;
use crate::error::{EditError, Result};
use crate::trunk::Trunk;
use recon_core::{ChangeFamily, Commit, SeqNumber, SessionId};
use std::fmt;
use tracing::{debug, trace};

/// Reconciles local edits with the server-sequenced order for one session.
///
/// Single-threaded and synchronous: every operation completes fully before
/// returning, and the anchor set is only touched during sequenced-commit
/// ingestion.
pub struct EditManager<F: ChangeFamily> {
    family: F,
    anchors: F::Anchors,
    local_session: Option<SessionId>,
    trunk: Trunk<F::Change>,
    local: LocalBranch<F::Change>,
}

impl<F: ChangeFamily> EditManager<F> {
    /// A manager with an empty history, no in-flight edits, and no session
    /// identity.
    pub fn new(family: F, anchors: F::Anchors) -> Self {
        Self {
            family,
            anchors,
            local_session: None,
            trunk: Trunk::new(),
            local: LocalBranch::new(),
        }
    }

    /// Rebuild a manager around a previously sequenced trunk.
    ///
    /// Commits must be contiguous from sequence number 1; the local branch
    /// starts empty and the session identity unset.
    pub fn with_trunk(
        family: F,
        anchors: F::Anchors,
        commits: Vec<Commit<F::Change>>,
    ) -> Result<Self> {
        let mut trunk = Trunk::new();
        for commit in commits {
            let expected = trunk.head_seq().next();
            if commit.seq_number != expected {
                return Err(EditError::OutOfOrder {
                    expected,
                    got: commit.seq_number,
                    session: commit.session_id,
                });
            }
            trunk.push(commit);
        }
        Ok(Self {
            family,
            anchors,
            local_session: None,
            trunk,
            local: LocalBranch::new(),
        })
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    /// The host's anchor set, consistent with the trunk at all times.
    pub fn anchors(&self) -> &F::Anchors {
        &self.anchors
    }

    pub fn local_session_id(&self) -> Option<&SessionId> {
        self.local_session.as_ref()
    }

    /// Sequence number of the newest sequenced commit.
    pub fn head_seq(&self) -> SeqNumber {
        self.trunk.head_seq()
    }

    /// Read-only view of the sequenced history, oldest first.
    pub fn trunk(&self) -> &[Commit<F::Change>] {
        self.trunk.commits()
    }

    /// Read-only view of the in-flight local changesets, oldest first.
    pub fn local_changes(&self) -> impl Iterator<Item = &F::Change> {
        self.local.changes()
    }

    /// Number of in-flight local edits.
    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    /// Record the local session identity. Idempotent for the same id;
    /// changing an already-set identity is refused.
    pub fn set_local_session_id(&mut self, id: SessionId) -> Result<()> {
        match &self.local_session {
            None => {
                self.local_session = Some(id);
                Ok(())
            }
            Some(current) if *current == id => Ok(()),
            Some(current) => Err(EditError::SessionAlreadySet {
                current: current.clone(),
                requested: id,
            }),
        }
    }

    /// Append a locally produced edit to the local branch.
    ///
    /// The change's input context must be the current local tip (trunk head
    /// composed with all prior in-flight edits). Returns the delta for the
    /// new edit alone; the trunk and the anchor set are untouched.
    pub fn add_local_change(&mut self, change: F::Change) -> Result<F::Delta> {
        if self.local_session.is_none() {
            return Err(EditError::SessionNotSet);
        }
        let delta = self.family.into_delta(&change);
        self.local.push(change, self.trunk.head_seq());
        trace!(branch_len = self.local.len(), "appended local change");
        Ok(delta)
    }

    /// Ingest the next commit in the sequencer's total order.
    ///
    /// Commits must arrive with strictly contiguous sequence numbers. Own
    /// commits acknowledge the branch head and emit an empty delta; peer
    /// commits are transposed into the trunk, the branch is rebased on top,
    /// and the emitted delta corrects the view in one step.
    pub fn add_sequenced_change(&mut self, commit: Commit<F::Change>) -> Result<F::Delta> {
        let own = match &self.local_session {
            None => {
                return Err(EditError::SequencedBeforeSession {
                    seq: commit.seq_number,
                })
            }
            Some(session) => commit.is_authored_by(session),
        };

        let expected = self.trunk.head_seq().next();
        if commit.seq_number != expected {
            return Err(EditError::OutOfOrder {
                expected,
                got: commit.seq_number,
                session: commit.session_id,
            });
        }

        let delta = if own {
            self.acknowledge_own(commit)?
        } else {
            self.ingest_peer(commit)
        };

        debug_assert!(
            {
                let head = self.trunk.head_seq();
                self.local.iter().all(|entry| entry.ref_seq == head)
            },
            "local branch must stay rooted at the trunk head"
        );
        Ok(delta)
    }

    /// Own commit: the branch head is exactly the changeset being
    /// acknowledged, already in trunk context from earlier rebases.
    fn acknowledge_own(&mut self, commit: Commit<F::Change>) -> Result<F::Delta> {
        let entry = self.local.pop_oldest().ok_or_else(|| EditError::UnexpectedAck {
            seq: commit.seq_number,
            session: commit.session_id.clone(),
        })?;
        debug!(seq = %commit.seq_number, "own commit acknowledged");

        self.family.rebase_anchors(&mut self.anchors, &entry.change);
        self.trunk.push(Commit {
            change: entry.change,
            ..commit
        });
        self.local.advance_branch_point(self.trunk.head_seq());
        Ok(self.family.into_delta(&self.family.empty_change()))
    }

    fn ingest_peer(&mut self, commit: Commit<F::Change>) -> F::Delta {
        // Transpose over everything the author had not observed.
        let mut transposed = commit.change.clone();
        for concurrent in self.trunk.after(commit.ref_number) {
            transposed = self.family.rebase(&transposed, &concurrent.change);
        }

        // Identity changes grow the trunk but touch nothing else.
        if self.family.is_identity(&transposed) {
            trace!(seq = %commit.seq_number, "peer commit is an identity");
            self.trunk.push(Commit {
                change: transposed,
                ..commit
            });
            self.local.advance_branch_point(self.trunk.head_seq());
            return self.family.into_delta(&self.family.empty_change());
        }

        if self.local.is_empty() {
            debug!(seq = %commit.seq_number, session = %commit.session_id, "peer commit applied");
            self.family.rebase_anchors(&mut self.anchors, &transposed);
            let delta = self.family.into_delta(&transposed);
            self.trunk.push(Commit {
                change: transposed,
                ..commit
            });
            return delta;
        }

        // Undo prefix for the stale branch.
        let stale: Vec<F::Change> = self.local.changes().cloned().collect();
        let undo = self.family.invert(&self.family.compose(&stale));

        // Rebase each entry over the transposed change, advancing the base
        // past the entry's old form so the next entry keeps its context.
        let mut base = transposed.clone();
        for entry in self.local.iter_mut() {
            let rebased = self.family.rebase(&entry.change, &base);
            base = self.family.rebase(&base, &entry.change);
            entry.change = rebased;
        }

        // Anchors follow intentions, never the undo/redo scaffolding.
        self.family.rebase_anchors(&mut self.anchors, &transposed);

        let rebased: Vec<F::Change> = self.local.changes().cloned().collect();
        let redo = self.family.compose(&rebased);
        let correction = self.family.compose(&[undo, transposed.clone(), redo]);
        let delta = self.family.into_delta(&correction);

        debug!(
            seq = %commit.seq_number,
            session = %commit.session_id,
            rebased = self.local.len(),
            "peer commit rebased into trunk"
        );
        self.trunk.push(Commit {
            change: transposed,
            ..commit
        });
        self.local.advance_branch_point(self.trunk.head_seq());
        delta
    }
}

impl<F: ChangeFamily> fmt::Debug for EditManager<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditManager")
            .field("session", &self.local_session)
            .field("trunk_len", &self.trunk.len())
            .field("local_len", &self.local.len())
            .finish()
    }
}
