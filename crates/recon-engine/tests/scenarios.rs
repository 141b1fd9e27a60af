//! Contract scenarios for the edit manager, driven with the
//! integer-intention family and hand-built commits.

use recon_core::{
    CountAnchors, CountChange, CountingFamily, Commit, RefNumber, SeqNumber, SessionId,
};
use recon_engine::EditManager;

fn manager_for(session: &SessionId) -> EditManager<CountingFamily> {
    let mut m = EditManager::new(CountingFamily, CountAnchors::new());
    m.set_local_session_id(session.clone()).unwrap();
    m
}

fn session(name: &str) -> SessionId {
    SessionId::from_string(name)
}

fn commit(author: &SessionId, seq: u64, reference: u64, intent: i64) -> Commit<CountChange> {
    Commit::new(
        author.clone(),
        SeqNumber::new(seq),
        RefNumber::new(reference),
        CountChange::mint(intent),
    )
}

fn trunk_intents(m: &EditManager<CountingFamily>) -> Vec<i64> {
    m.trunk()
        .iter()
        .flat_map(|c| c.change.intents().to_vec())
        .collect()
}

/// Local edits sequenced straight back: every ack is silent and anchors
/// follow the trunk.
#[test]
fn local_edits_sequenced_immediately() {
    let local = session("local");
    let mut m = manager_for(&local);

    for (seq, intent) in [(1u64, 1i64), (2, 2), (3, 3)] {
        let delta = m.add_local_change(CountChange::mint(intent)).unwrap();
        assert_eq!(delta, vec![intent]);

        let before = m.local_changes().count();
        let ack = m
            .add_sequenced_change(commit(&local, seq, seq - 1, intent))
            .unwrap();
        assert!(ack.is_empty());
        assert_eq!(m.local_changes().count(), before - 1);
    }

    assert_eq!(trunk_intents(&m), vec![1, 2, 3]);
    assert_eq!(m.anchors().intents(), [1, 2, 3]);
}

/// Peer commits minted from a stale frontier still arrive as their own
/// intentions: transposition preserves them.
#[test]
fn peer_commits_with_stale_frontiers() {
    let peer = session("peer");
    let mut m = manager_for(&session("local"));

    assert_eq!(m.add_sequenced_change(commit(&peer, 1, 0, 1)).unwrap(), vec![1]);
    assert_eq!(m.add_sequenced_change(commit(&peer, 2, 0, 2)).unwrap(), vec![2]);
    assert_eq!(m.add_sequenced_change(commit(&peer, 3, 0, 3)).unwrap(), vec![3]);

    assert_eq!(trunk_intents(&m), vec![1, 2, 3]);
    assert_eq!(m.anchors().intents(), [1, 2, 3]);
}

/// The full local/peer interleaving worked example: nine sequenced commits
/// woven through three in-flight local edits, with the exact corrective
/// delta checked at every step.
#[test]
fn local_and_peer_interleaving() {
    let local = session("local");
    let peer_b = session("peer-b");
    let peer_c = session("peer-c");
    let mut m = manager_for(&local);

    assert_eq!(m.add_local_change(CountChange::mint(3)).unwrap(), vec![3]);

    assert_eq!(
        m.add_sequenced_change(commit(&peer_b, 1, 0, 1)).unwrap(),
        vec![-3, 1, 3]
    );
    assert_eq!(
        m.add_sequenced_change(commit(&peer_b, 2, 0, 2)).unwrap(),
        vec![-3, 2, 3]
    );

    assert_eq!(m.add_local_change(CountChange::mint(6)).unwrap(), vec![6]);
    assert_eq!(m.add_local_change(CountChange::mint(8)).unwrap(), vec![8]);

    assert!(m.add_sequenced_change(commit(&local, 3, 0, 3)).unwrap().is_empty());

    assert_eq!(
        m.add_sequenced_change(commit(&peer_c, 4, 2, 4)).unwrap(),
        vec![-8, -6, 4, 6, 8]
    );
    assert_eq!(
        m.add_sequenced_change(commit(&peer_c, 5, 2, 5)).unwrap(),
        vec![-8, -6, 5, 6, 8]
    );

    assert!(m.add_sequenced_change(commit(&local, 6, 2, 6)).unwrap().is_empty());

    assert_eq!(
        m.add_sequenced_change(commit(&peer_b, 7, 2, 7)).unwrap(),
        vec![-8, 7, 8]
    );

    assert!(m.add_sequenced_change(commit(&local, 8, 2, 8)).unwrap().is_empty());

    assert_eq!(m.add_sequenced_change(commit(&peer_b, 9, 8, 9)).unwrap(), vec![9]);

    assert_eq!(trunk_intents(&m), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(m.anchors().intents(), [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(m.local_changes().count(), 0);
}

/// Identity changesets are legal and silent, whatever the branch state.
#[test]
fn identity_changes_are_silent() {
    let peer = session("peer");
    let mut m = manager_for(&session("local"));
    m.add_local_change(CountChange::mint(5)).unwrap();

    let empty_commit = Commit::new(
        peer.clone(),
        SeqNumber::new(1),
        RefNumber::ZERO,
        CountChange::empty(),
    );
    let delta = m.add_sequenced_change(empty_commit).unwrap();
    assert!(delta.is_empty());
    assert!(m.anchors().intents().is_empty());
    assert_eq!(m.local_changes().count(), 1);

    // The branch still rebases cleanly over later real commits.
    assert_eq!(
        m.add_sequenced_change(commit(&peer, 2, 1, 7)).unwrap(),
        vec![-5, 7, 5]
    );
}

/// A commit authored concurrently with several sequenced commits rebases
/// to the same intention.
#[test]
fn rebase_over_multiple_peer_commits() {
    let peer_b = session("peer-b");
    let peer_c = session("peer-c");
    let mut m = manager_for(&session("local"));

    assert_eq!(m.add_sequenced_change(commit(&peer_b, 1, 0, 1)).unwrap(), vec![1]);
    assert_eq!(m.add_sequenced_change(commit(&peer_b, 2, 1, 2)).unwrap(), vec![2]);
    assert_eq!(m.add_sequenced_change(commit(&peer_b, 3, 2, 3)).unwrap(), vec![3]);

    // Authored before any of the above were observed.
    assert_eq!(m.add_sequenced_change(commit(&peer_c, 4, 0, 4)).unwrap(), vec![4]);
    assert_eq!(trunk_intents(&m), vec![1, 2, 3, 4]);
}

/// A frontier equal to the trunk head means nothing is concurrent: the
/// change lands as authored and the branch rebases directly over it.
#[test]
fn frontier_at_trunk_head_skips_transposition() {
    let peer = session("peer");
    let mut m = manager_for(&session("local"));

    m.add_sequenced_change(commit(&peer, 1, 0, 1)).unwrap();
    m.add_local_change(CountChange::mint(5)).unwrap();

    assert_eq!(
        m.add_sequenced_change(commit(&peer, 2, 1, 2)).unwrap(),
        vec![-5, 2, 5]
    );
    assert_eq!(trunk_intents(&m), vec![1, 2]);
}
