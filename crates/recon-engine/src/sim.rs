//! Deterministic multi-client simulation of a sequenced editing service.
//!
//! A [`Sequencer`] plays the central service: it assigns contiguous
//! sequence numbers to submitted changes and keeps the authoritative log.
//! Each [`SimClient`] wraps an [`EditManager`] over the integer-intention
//! family and maintains an application view built *only* from emitted
//! deltas, so the simulation exercises the full delta contract. Used by
//! unit tests, the interleaving tests, and the stress runner.

use crate::error::Result;
use crate::manager::EditManager;
use recon_core::{
    apply_delta, ChangeFamily, Commit, CountAnchors, CountChange, CountingFamily, RefNumber,
    SeqNumber, SessionId,
};
use std::collections::VecDeque;

/// The central sequencing service.
#[derive(Clone, Debug, Default)]
pub struct Sequencer {
    log: Vec<Commit<CountChange>>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next sequence number to a submitted change.
    pub fn sequence(
        &mut self,
        session_id: SessionId,
        ref_number: RefNumber,
        change: CountChange,
    ) -> Commit<CountChange> {
        let seq = SeqNumber::new(self.log.len() as u64 + 1);
        let commit = Commit::new(session_id, seq, ref_number, change);
        self.log.push(commit.clone());
        commit
    }

    /// The authoritative log, oldest first.
    pub fn log(&self) -> &[Commit<CountChange>] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

/// One simulated participant.
#[derive(Debug)]
pub struct SimClient {
    manager: EditManager<CountingFamily>,
    session_id: SessionId,
    view: Vec<i64>,
    outbox: VecDeque<(RefNumber, CountChange)>,
    delivered: usize,
}

impl SimClient {
    pub fn new(session_id: SessionId) -> Result<Self> {
        let mut manager = EditManager::new(CountingFamily, CountAnchors::new());
        manager.set_local_session_id(session_id.clone())?;
        Ok(Self {
            manager,
            session_id,
            view: Vec::new(),
            outbox: VecDeque::new(),
            delivered: 0,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn manager(&self) -> &EditManager<CountingFamily> {
        &self.manager
    }

    /// The application view, reconstructed purely from emitted deltas.
    pub fn view(&self) -> &[i64] {
        &self.view
    }

    /// Number of sequenced commits this client has ingested.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Minted changes not yet handed to the sequencer.
    pub fn pending_submissions(&self) -> usize {
        self.outbox.len()
    }

    /// Mint a local edit and queue it for submission. The reference
    /// frontier is captured now, at authoring time.
    pub fn mint(&mut self, intent: i64) -> Result<()> {
        let change = CountChange::mint(intent);
        let ref_number = RefNumber::from(self.manager.head_seq());
        let delta = self.manager.add_local_change(change.clone())?;
        apply_delta(&mut self.view, &delta);
        self.outbox.push_back((ref_number, change));
        Ok(())
    }

    /// Hand the oldest unsubmitted change to the sequencer.
    pub fn submit_next(&mut self, sequencer: &mut Sequencer) -> bool {
        match self.outbox.pop_front() {
            Some((ref_number, change)) => {
                sequencer.sequence(self.session_id.clone(), ref_number, change);
                true
            }
            None => false,
        }
    }

    /// Ingest the next undelivered sequenced commit, if any.
    pub fn deliver_next(&mut self, sequencer: &Sequencer) -> Result<bool> {
        let Some(commit) = sequencer.log().get(self.delivered) else {
            return Ok(false);
        };
        let delta = self.manager.add_sequenced_change(commit.clone())?;
        apply_delta(&mut self.view, &delta);
        self.delivered += 1;
        Ok(true)
    }

    /// Emitted-delta accumulation matches a fresh composition of the trunk
    /// and the local branch.
    pub fn view_consistent(&self) -> bool {
        let family = CountingFamily;
        let mut changes: Vec<CountChange> =
            self.manager.trunk().iter().map(|c| c.change.clone()).collect();
        changes.extend(self.manager.local_changes().cloned());
        family.compose(&changes).intents() == self.view.as_slice()
    }

    /// Anchor intentions equal trunk intentions, in trunk order.
    pub fn anchors_consistent(&self) -> bool {
        let mut expected = Vec::new();
        for commit in self.manager.trunk() {
            expected.extend_from_slice(commit.change.intents());
        }
        self.manager.anchors().intents() == expected.as_slice()
    }
}

/// A sequencer plus a fixed set of clients.
#[derive(Debug)]
pub struct Cluster {
    sequencer: Sequencer,
    clients: Vec<SimClient>,
}

impl Cluster {
    /// A cluster of `n` clients with deterministic session identities.
    pub fn new(n: usize) -> Result<Self> {
        let mut clients = Vec::with_capacity(n);
        for i in 0..n {
            clients.push(SimClient::new(SessionId::from_string(format!("client-{i}")))?);
        }
        Ok(Self {
            sequencer: Sequencer::new(),
            clients,
        })
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn client(&self, idx: usize) -> &SimClient {
        &self.clients[idx]
    }

    pub fn sequenced_len(&self) -> usize {
        self.sequencer.len()
    }

    pub fn mint(&mut self, idx: usize, intent: i64) -> Result<()> {
        self.clients[idx].mint(intent)
    }

    pub fn submit_next(&mut self, idx: usize) -> bool {
        self.clients[idx].submit_next(&mut self.sequencer)
    }

    pub fn deliver_next(&mut self, idx: usize) -> Result<bool> {
        self.clients[idx].deliver_next(&self.sequencer)
    }

    /// Submit and deliver everything outstanding.
    pub fn flush(&mut self) -> Result<()> {
        for idx in 0..self.clients.len() {
            while self.submit_next(idx) {}
        }
        for idx in 0..self.clients.len() {
            while self.deliver_next(idx)? {}
        }
        Ok(())
    }

    /// Everything delivered everywhere, all views and trunks identical.
    pub fn is_converged(&self) -> bool {
        let total = self.sequencer.len();
        if !self
            .clients
            .iter()
            .all(|c| c.delivered() == total && c.pending_submissions() == 0)
        {
            return false;
        }
        self.clients.windows(2).all(|pair| {
            pair[0].view() == pair[1].view()
                && pair[0].manager().trunk() == pair[1].manager().trunk()
        })
    }

    /// Every client's view and anchors agree with its own histories.
    pub fn check_consistency(&self) -> bool {
        self.clients
            .iter()
            .all(|c| c.view_consistent() && c.anchors_consistent())
    }
}
