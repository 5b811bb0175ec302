//! Common test utilities - battle fixtures and a simple effect executor

#![allow(dead_code)]

use battle_engine::combat::{Battle, Consequence, Effect, EffectKind, Location, Participant};
use battle_engine::Config;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Battle creation time shared by all fixtures
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()
}

/// Time `secs` seconds into the battle
pub fn at(secs: i64) -> DateTime<Utc> {
    start() + Duration::seconds(secs)
}

/// Level 10 participant with 1000 experience and 100 money
pub fn fighter(id: &str) -> Participant {
    Participant::new(id, 10, start())
        .with_experience(1000.0)
        .with_money(100)
}

/// One-on-one battle between alice and bob with 10 second rounds
pub fn duel() -> Battle {
    Battle::new("duel", start(), &Config::default())
        .with_user(fighter("alice").at(Location::new(2, 2)))
        .with_user(fighter("bob").at(Location::new(8, 2)))
}

/// Executor where each application deals or heals the effect's power
pub fn power_executor(
    _battle: &Battle,
    effect: &Effect,
    target: &Participant,
    times: u32,
) -> Vec<Consequence> {
    let amount = effect.power * f64::from(times);
    let consequence = Consequence::new(&target.user_id);
    match effect.kind {
        EffectKind::Damage => vec![consequence.with_damage(amount)],
        EffectKind::Heal => vec![consequence.with_heal(amount)],
        _ => Vec::new(),
    }
}

/// Apply net consequences to participant health
pub fn apply_consequences(battle: &mut Battle, consequences: &[Consequence]) {
    for consequence in consequences {
        if let Some(user) = battle.user_mut(&consequence.target_id) {
            let delta = consequence.heal.unwrap_or(0.0) - consequence.damage.unwrap_or(0.0);
            user.cur_health = (user.cur_health + delta).clamp(0.0, user.max_health);
        }
    }
}
