//! Fast-forwarding idle rounds
//!
//! A round can be skipped when nobody has anything meaningful left to do
//! in it. Waiting never counts, and AI participants moving around do not
//! hold up the battle.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::actions::ActionCatalog;
use super::state::{Battle, Participant};
use super::BattleError;

/// Action points of a participant that has not acted yet this round
pub const FULL_ACTION_POINTS: f64 = 100.0;

/// Action points `user` has left in the round that started at `round_started_at`.
///
/// Participants whose last action predates the round start a fresh round.
pub fn action_points_in_round(user: &Participant, round_started_at: DateTime<Utc>) -> f64 {
    if user.updated_at > round_started_at {
        user.action_points
    } else {
        FULL_ACTION_POINTS
    }
}

/// Check whether the current round can be skipped.
///
/// Returns false as soon as one participant has an affordable action that
/// is neither waiting nor an AI participant moving.
pub fn do_fast_forward<C: ActionCatalog + ?Sized>(
    battle: &Battle,
    catalog: &C,
    now: DateTime<Utc>,
) -> Result<bool, BattleError> {
    let round = battle.round_at(now, 0)?;

    for user in &battle.users_state {
        let points = action_points_in_round(user, round.round_started_at);
        if points <= 0.0 {
            continue;
        }

        let blocking = catalog
            .available_actions(battle, &user.user_id)
            .into_iter()
            .find(|action| {
                let affordable = action.action_cost_perc <= points;
                let ai_move = user.is_ai && action.is_move();
                affordable && !action.is_wait() && !ai_move
            });

        if let Some(action) = blocking {
            debug!(
                "round {} of battle {} not skipped: {} can still use {}",
                round.round, battle.id, user.user_id, action.id
            );
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::actions::{CombatAction, StaticCatalog, MOVE_ACTION_ID, WAIT_ACTION_ID};
    use crate::Config;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    /// Battle in round 2 (round started at +20s, now is +25s)
    fn now() -> DateTime<Utc> {
        start() + Duration::seconds(25)
    }

    fn battle(users: Vec<Participant>) -> Battle {
        let mut battle = Battle::new("b1", start(), &Config::default());
        battle.round_length_ms = 10_000;
        battle.users_state = users;
        battle
    }

    /// Participant that already acted this round with `points` left
    fn acted(id: &str, points: f64) -> Participant {
        let mut user = Participant::new(id, 1, start() + Duration::seconds(22));
        user.action_points = points;
        user
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            CombatAction::new(WAIT_ACTION_ID, 0.0),
            CombatAction::new(MOVE_ACTION_ID, 20.0),
            CombatAction::new("punch", 40.0),
        ])
    }

    #[test]
    fn test_action_points_reset_each_round() {
        let round_start = start() + Duration::seconds(20);
        let old = Participant::new("a", 1, start() + Duration::seconds(5));
        assert_eq!(action_points_in_round(&old, round_start), FULL_ACTION_POINTS);
        assert_eq!(action_points_in_round(&acted("b", 15.0), round_start), 15.0);
    }

    #[test]
    fn test_blocked_by_affordable_action() {
        let battle = battle(vec![acted("alice", 0.0), acted("bob", 50.0)]);
        assert!(!do_fast_forward(&battle, &catalog(), now()).unwrap());
    }

    #[test]
    fn test_fresh_round_blocks() {
        let mut alice = acted("alice", 0.0);
        alice.updated_at = start() + Duration::seconds(3);
        let battle = battle(vec![alice]);
        assert!(!do_fast_forward(&battle, &catalog(), now()).unwrap());
    }

    #[test]
    fn test_no_points_left() {
        let battle = battle(vec![acted("alice", 0.0), acted("bob", 0.0)]);
        assert!(do_fast_forward(&battle, &catalog(), now()).unwrap());
    }

    #[test]
    fn test_unaffordable_actions_do_not_block() {
        // Move costs 20 and punch 40
        let battle = battle(vec![acted("alice", 10.0)]);
        assert!(do_fast_forward(&battle, &catalog(), now()).unwrap());
    }

    #[test]
    fn test_wait_only() {
        let catalog = StaticCatalog::new(vec![CombatAction::new(WAIT_ACTION_ID, 0.0)]);
        let battle = battle(vec![acted("alice", 100.0)]);
        assert!(do_fast_forward(&battle, &catalog, now()).unwrap());
    }

    #[test]
    fn test_ai_movement_does_not_block() {
        // 30 points: AI can afford move but not punch
        let ai = acted("bot", 30.0).as_ai();
        assert!(do_fast_forward(&battle(vec![ai]), &catalog(), now()).unwrap());

        // The same budget blocks a human
        let human = acted("alice", 30.0);
        assert!(!do_fast_forward(&battle(vec![human]), &catalog(), now()).unwrap());
    }

    #[test]
    fn test_does_not_mutate() {
        let battle = battle(vec![acted("alice", 50.0)]);
        let before = battle.clone();
        do_fast_forward(&battle, &catalog(), now()).unwrap();
        assert_eq!(battle, before);
    }

    #[test]
    fn test_invalid_round_length() {
        let mut battle = battle(vec![acted("alice", 50.0)]);
        battle.round_length_ms = 0;
        assert!(do_fast_forward(&battle, &catalog(), now()).is_err());
    }
}
