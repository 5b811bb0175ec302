//! End-to-end battle flow over the public API
//!
//! Resolves effects round by round until one side falls, then checks
//! exits, rewards, masking and fast-forwarding on the resulting snapshot.

mod common;

use battle_engine::combat::{
    calc_battle_result, calc_pool_cost, do_fast_forward, mask_battle, resolve_effects, Battle,
    Calculation, CombatAction, Effect, EffectKind, EffectTimers, Location, ParticipantView,
    Pool, StaticCatalog, StatCategory, MOVE_ACTION_ID, WAIT_ACTION_ID,
};
use common::{apply_consequences, at, duel, power_executor, start};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn poison(battle: &mut Battle) {
    battle.users_effects.push(
        Effect::on_user(EffectKind::Damage, "bob", start())
            .with_rounds(5)
            .with_power(Calculation::Static, 200.0)
            .created_by("alice"),
    );
}

#[test]
fn test_poison_kills_over_rounds() {
    let mut battle = duel();
    poison(&mut battle);
    let mut timers = EffectTimers::new();
    let mut executor = power_executor;

    // Round 0: first tick
    let resolution = resolve_effects(&battle, &mut timers, &mut executor, at(1), 0).unwrap();
    apply_consequences(&mut battle, &resolution.consequences);
    assert_eq!(battle.user("bob").unwrap().cur_health, 350.0);

    // Still round 0: no second tick
    let resolution = resolve_effects(&battle, &mut timers, &mut executor, at(9), 0).unwrap();
    assert!(resolution.consequences.is_empty());

    // Round 2: two missed ticks catch up
    let resolution = resolve_effects(&battle, &mut timers, &mut executor, at(25), 0).unwrap();
    apply_consequences(&mut battle, &resolution.consequences);
    assert!(battle.user("bob").unwrap().is_dead());
    assert_eq!(battle.user("alice").unwrap().cur_health, 550.0);
}

#[test]
fn test_exit_and_rewards_after_defeat() {
    let mut battle = duel();
    battle.user_mut("bob").unwrap().cur_health = 0.0;
    battle.user_mut("alice").unwrap().used_stats = vec![StatCategory::NinjutsuOffence];
    let mut rng = StdRng::seed_from_u64(42);

    let loser = calc_battle_result(&mut battle, "bob", &mut rng)
        .unwrap()
        .unwrap();
    assert!(!loser.did_win);
    assert_eq!(loser.experience, 8.0);
    assert_eq!(loser.elo_pvp, 8.0);
    assert_eq!(loser.money, 0);
    assert_eq!(loser.targets_left, 1);

    let winner = calc_battle_result(&mut battle, "alice", &mut rng)
        .unwrap()
        .unwrap();
    assert!(winner.did_win);
    assert_eq!(winner.experience, 16.0);
    assert_eq!(winner.stat(StatCategory::NinjutsuOffence), 16.0);
    assert!((40..=50).contains(&winner.money));
    assert_eq!(winner.targets_left, 0);

    // Both marked exactly once
    assert!(battle.users_state.iter().all(|u| u.left_battle));
    assert!(calc_battle_result(&mut battle, "alice", &mut rng)
        .unwrap()
        .is_none());
}

#[test]
fn test_mask_hides_opponent_resources() {
    let mut battle = duel();
    poison(&mut battle);
    let masked = mask_battle(&battle, "alice");

    assert_eq!(masked.users_state.len(), 2);
    match &masked.users_state[0] {
        ParticipantView::Owner(alice) => assert_eq!(alice.money, 100),
        other => panic!("expected owner view, got {:?}", other),
    }
    assert!(!masked.users_state[1].is_owner());
    assert_eq!(masked.users_effects, battle.users_effects);

    let json = serde_json::to_value(&masked.users_state[1]).unwrap();
    assert_eq!(json["view"], "public");
    assert!(json.get("money").is_none());
    assert!(json.get("cur_chakra").is_none());
}

#[test]
fn test_fast_forward_after_both_spent() {
    let mut battle = duel();
    let catalog = StaticCatalog::new(vec![
        CombatAction::new(WAIT_ACTION_ID, 0.0),
        CombatAction::new(MOVE_ACTION_ID, 20.0),
        CombatAction::new("strike", 60.0),
    ]);

    // Round 1 just started: everybody has a full round
    assert!(!do_fast_forward(&battle, &catalog, at(12)).unwrap());

    for user in battle.users_state.iter_mut() {
        user.updated_at = at(14);
        user.action_points = 10.0;
    }
    assert!(do_fast_forward(&battle, &catalog, at(15)).unwrap());

    // Next round resets the budget
    assert!(!do_fast_forward(&battle, &catalog, at(21)).unwrap());
}

#[test]
fn test_pool_cost_with_adjustments() {
    let mut battle = duel();
    battle.users_effects.push(
        Effect::on_user(EffectKind::PoolCostAdjust, "alice", start())
            .with_power(Calculation::Percentage, -50.0)
            .affecting(&[Pool::Health, Pool::Chakra]),
    );
    let action = CombatAction::new("strike", 60.0).with_pool_costs(10.0, 20.0, 0.0);
    let alice = battle.user("alice").unwrap();

    let cost = calc_pool_cost(&action, &battle.users_effects, alice);
    assert_eq!(cost.hp_cost, 27.5);
    assert_eq!(cost.cp_cost, 55.0);
    assert_eq!(cost.sp_cost, 0.0);

    // Bob pays full price
    let bob = battle.user("bob").unwrap();
    let cost = calc_pool_cost(&action, &battle.users_effects, bob);
    assert_eq!(cost.hp_cost, 55.0);
}

#[test]
fn test_ground_effect_follows_occupant() {
    let mut battle = duel();
    battle.ground_effects.push(
        Effect::ground(EffectKind::Heal, Location::new(8, 2), start())
            .with_power(Calculation::Static, 25.0),
    );
    battle.user_mut("bob").unwrap().cur_health = 100.0;
    let mut timers = EffectTimers::new();

    let resolution = resolve_effects(&battle, &mut timers, &mut power_executor, at(3), 0).unwrap();
    apply_consequences(&mut battle, &resolution.consequences);
    assert_eq!(battle.user("bob").unwrap().cur_health, 125.0);

    // Bob steps off the cell
    battle.user_mut("bob").unwrap().location = Location::new(7, 2);
    let resolution = resolve_effects(&battle, &mut timers, &mut power_executor, at(4), 0).unwrap();
    assert!(resolution.consequences.is_empty());
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut battle = duel();
    poison(&mut battle);
    let json = serde_json::to_string(&battle).unwrap();
    let parsed: Battle = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, battle);
    assert_eq!(parsed.round_at(at(35), 0).unwrap().round, 3);
}
