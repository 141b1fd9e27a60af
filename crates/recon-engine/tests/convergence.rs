//! Randomized schedules at larger sizes than the exhaustive enumeration
//! can reach.

use proptest::prelude::*;
use recon_engine::sim::Cluster;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any schedule of mints, submissions, and deliveries leaves every
    /// client's view and anchors consistent, and flushing converges the
    /// cluster. Submissions and deliveries with nothing to do are no-ops.
    #[test]
    fn random_schedules_converge(
        commands in prop::collection::vec((0usize..4, 0u8..3), 0..60)
    ) {
        let mut cluster = Cluster::new(4).unwrap();
        let mut next_intent = 1i64;
        for (client, kind) in commands {
            match kind {
                0 => {
                    cluster.mint(client, next_intent).unwrap();
                    next_intent += 1;
                }
                1 => {
                    cluster.submit_next(client);
                }
                _ => {
                    cluster.deliver_next(client).unwrap();
                }
            }
            prop_assert!(cluster.check_consistency());
        }

        cluster.flush().unwrap();
        prop_assert!(cluster.is_converged());
        prop_assert!(cluster.check_consistency());
    }
}
