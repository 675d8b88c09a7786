//! Property tests for the bounded message log

use proptest::prelude::*;

use collabhub::backend::chat::MessageLog;

proptest! {
    /// The log never exceeds its cap, ids stay strictly increasing, and
    /// what survives eviction is exactly the newest suffix.
    #[test]
    fn log_stays_bounded_and_ordered(
        cap in 1usize..20,
        bodies in proptest::collection::vec("[a-z]{1,8}", 0..64),
    ) {
        let mut log = MessageLog::new(cap);
        for body in &bodies {
            log.append_chat("u1", "Alice", body.clone());
        }

        let messages = log.messages();
        prop_assert!(messages.len() <= cap);
        prop_assert_eq!(messages.len(), bodies.len().min(cap));

        for pair in messages.windows(2) {
            prop_assert!(pair[0].id < pair[1].id);
        }

        let expected_tail: Vec<_> = bodies
            .iter()
            .skip(bodies.len().saturating_sub(cap))
            .cloned()
            .collect();
        let actual: Vec<_> = messages.iter().map(|m| m.body.clone()).collect();
        prop_assert_eq!(actual, expected_tail);
    }
}
