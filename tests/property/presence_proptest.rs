//! Property tests for the presence registry

use std::collections::HashSet;

use proptest::prelude::*;

use collabhub::backend::presence::PresenceRegistry;
use collabhub::shared::{PresenceStatus, Role};

#[derive(Debug, Clone)]
enum Op {
    Join(u8),
    Leave(u8),
    SetAway(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8).prop_map(Op::Join),
        (0u8..8).prop_map(Op::Leave),
        (0u8..8).prop_map(Op::SetAway),
    ]
}

proptest! {
    /// No sequence of joins and leaves ever duplicates a user id, and the
    /// registry count always matches a set-based model.
    #[test]
    fn presence_never_duplicates(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut registry = PresenceRegistry::new();
        let mut model: HashSet<String> = HashSet::new();

        for op in ops {
            match op {
                Op::Join(n) => {
                    let user_id = format!("u{}", n);
                    registry.join(&user_id, format!("User {}", n), Role::Editor);
                    model.insert(user_id);
                }
                Op::Leave(n) => {
                    let user_id = format!("u{}", n);
                    registry.leave(&user_id);
                    model.remove(&user_id);
                }
                Op::SetAway(n) => {
                    // Status changes never affect membership
                    let _ = registry.set_status(&format!("u{}", n), PresenceStatus::Away);
                }
            }

            let listed = registry.list();
            let unique: HashSet<_> = listed.iter().map(|c| c.user_id.clone()).collect();
            prop_assert_eq!(unique.len(), listed.len());
            prop_assert_eq!(listed.len(), model.len());
        }
    }

    /// A rejoin resets status to online no matter what happened before.
    #[test]
    fn rejoin_resets_status(away_first in proptest::bool::ANY) {
        let mut registry = PresenceRegistry::new();
        registry.join("u1", "Alice", Role::Owner);
        if away_first {
            registry.set_status("u1", PresenceStatus::Away).unwrap();
        }

        let (collaborator, count) = registry.join("u1", "Alice", Role::Owner);
        prop_assert_eq!(count, 1);
        prop_assert_eq!(collaborator.status, PresenceStatus::Online);
    }
}
