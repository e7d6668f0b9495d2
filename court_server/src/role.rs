// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use court_protocol::id::UserId;
use court_protocol::role::Role;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Output of [`assign_roles`]: one role per player, plus quick references to
/// whoever drew Judge and Defendant.
pub struct RoleAssignment {
    pub roles: Vec<(UserId, Role)>,
    pub judge_id: Option<UserId>,
    pub defendant_id: Option<UserId>,
}

/// Uniformly permutes the players, deals [`Role::PRIORITY`] to the first four
/// in permutation order (fewer if the roster is smaller) and the fallback
/// role to everyone else. The only randomness in who becomes judge/defendant
/// is the permutation itself; no balancing across rounds.
pub fn assign_roles(player_ids: &[UserId]) -> RoleAssignment {
    let mut shuffled = player_ids.to_vec();
    shuffled.shuffle(&mut thread_rng());

    let mut roles = Vec::with_capacity(shuffled.len());
    let mut judge_id = None;
    let mut defendant_id = None;
    for (i, &user_id) in shuffled.iter().enumerate() {
        let role = Role::PRIORITY.get(i).copied().unwrap_or(Role::Witness);
        match role {
            Role::Judge => judge_id = Some(user_id),
            Role::Defendant => defendant_id = Some(user_id),
            _ => {}
        }
        roles.push((user_id, role));
    }

    RoleAssignment {
        roles,
        judge_id,
        defendant_id,
    }
}

#[cfg(test)]
mod tests {
    use crate::role::assign_roles;
    use court_protocol::id::UserId;
    use court_protocol::role::Role;
    use std::collections::HashMap;
    use std::num::NonZeroU64;

    fn users(n: u64) -> Vec<UserId> {
        (1..=n).map(|i| UserId(NonZeroU64::new(i).unwrap())).collect()
    }

    fn counts(roles: &[(UserId, Role)]) -> HashMap<Role, usize> {
        let mut counts = HashMap::new();
        for &(_, role) in roles {
            *counts.entry(role).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_five_players_get_all_distinguished_roles_once() {
        let assignment = assign_roles(&users(5));
        let counts = counts(&assignment.roles);
        assert_eq!(counts[&Role::Judge], 1);
        assert_eq!(counts[&Role::Prosecutor], 1);
        assert_eq!(counts[&Role::Defense], 1);
        assert_eq!(counts[&Role::Defendant], 1);
        assert_eq!(counts[&Role::Witness], 1);

        let judge = assignment.judge_id.unwrap();
        let defendant = assignment.defendant_id.unwrap();
        assert_ne!(judge, defendant);
        for &(user_id, role) in &assignment.roles {
            match role {
                Role::Judge => assert_eq!(user_id, judge),
                Role::Defendant => assert_eq!(user_id, defendant),
                _ => {
                    assert_ne!(user_id, judge);
                    assert_ne!(user_id, defendant);
                }
            }
        }
    }

    #[test]
    fn test_small_roster_gets_role_prefix_only() {
        let assignment = assign_roles(&users(2));
        let counts = counts(&assignment.roles);
        assert_eq!(counts[&Role::Judge], 1);
        assert_eq!(counts[&Role::Prosecutor], 1);
        assert!(!counts.contains_key(&Role::Defendant));
        assert!(!counts.contains_key(&Role::Witness));
        assert!(assignment.judge_id.is_some());
        assert!(assignment.defendant_id.is_none());
    }

    #[test]
    fn test_large_roster_fills_with_witnesses() {
        let assignment = assign_roles(&users(10));
        let counts = counts(&assignment.roles);
        assert_eq!(counts[&Role::Witness], 6);
    }

    #[test]
    fn test_empty_roster() {
        let assignment = assign_roles(&[]);
        assert!(assignment.roles.is_empty());
        assert!(assignment.judge_id.is_none());
        assert!(assignment.defendant_id.is_none());
    }
}
