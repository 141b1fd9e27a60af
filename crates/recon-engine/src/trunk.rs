//! The trunk: the canonical, server-ordered history of sequenced commits.

use recon_core::{Commit, RefNumber, SeqNumber};

/// Append-only log of sequenced commits.
///
/// Sequence numbers are contiguous from 1. Commits are stored in trunk
/// context: each changeset is the transposed form that applies cleanly
/// after the previous trunk entry, so composing the log in order
/// reproduces the sequenced document state.
#[derive(Clone, Debug, PartialEq)]
pub struct Trunk<C> {
    commits: Vec<Commit<C>>,
}

impl<C> Trunk<C> {
    pub fn new() -> Self {
        Self {
            commits: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Sequence number of the newest commit, [`SeqNumber::ZERO`] before any.
    pub fn head_seq(&self) -> SeqNumber {
        self.commits
            .last()
            .map(|c| c.seq_number)
            .unwrap_or(SeqNumber::ZERO)
    }

    /// Append the next sequenced commit.
    pub fn push(&mut self, commit: Commit<C>) {
        debug_assert_eq!(
            commit.seq_number,
            self.head_seq().next(),
            "trunk must stay contiguous"
        );
        debug_assert!(
            commit.ref_number < commit.seq_number,
            "a commit is authored before it is sequenced"
        );
        self.commits.push(commit);
    }

    /// All commits, oldest first.
    pub fn commits(&self) -> &[Commit<C>] {
        &self.commits
    }

    /// The commits sequenced after the given frontier — everything a commit
    /// authored at `frontier` is concurrent with.
    pub fn after(&self, frontier: RefNumber) -> &[Commit<C>] {
        let start = self.commits.partition_point(|c| frontier >= c.seq_number);
        &self.commits[start..]
    }
}

impl<C> Default for Trunk<C> {
    fn default() -> Self {
        Self::new()
    }
}
