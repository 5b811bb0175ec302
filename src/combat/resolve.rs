//! Resolution pass
//!
//! Runs every active effect of a battle once, in resolution order, and
//! reduces what they produce into one consequence per participant. What
//! an effect actually does is up to the caller's `EffectExecutor`.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::consequence::{collapse_consequences, Consequence};
use super::effects::{
    is_effect_still_active, should_apply_effect_times, Effect, EffectId, EffectTarget,
    EffectTimers,
};
use super::ordering::sort_effects;
use super::state::{Battle, Participant};
use super::BattleError;

/// Turns one effect application into consequences
pub trait EffectExecutor {
    /// Apply `effect` to `target` `times` times
    fn execute(
        &mut self,
        battle: &Battle,
        effect: &Effect,
        target: &Participant,
        times: u32,
    ) -> Vec<Consequence>;
}

impl<F> EffectExecutor for F
where
    F: FnMut(&Battle, &Effect, &Participant, u32) -> Vec<Consequence>,
{
    fn execute(
        &mut self,
        battle: &Battle,
        effect: &Effect,
        target: &Participant,
        times: u32,
    ) -> Vec<Consequence> {
        self(battle, effect, target, times)
    }
}

/// Result of a resolution pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Net consequence per target, in order of first appearance
    pub consequences: Vec<Consequence>,
    /// Effects that ran out and should be removed from the battle
    pub expired: Vec<EffectId>,
}

/// Resolve all effects of `battle` at `now`.
///
/// User effects apply to their target participant, ground effects to the
/// live participant standing on their cell, if any. Timers of expired
/// effects are dropped; the rest are updated and must be persisted with
/// the battle.
pub fn resolve_effects<E: EffectExecutor + ?Sized>(
    battle: &Battle,
    timers: &mut EffectTimers,
    executor: &mut E,
    now: DateTime<Utc>,
    skew_ms: i64,
) -> Result<Resolution, BattleError> {
    battle.clock()?;

    let mut active: Vec<Effect> = Vec::new();
    let mut expired = Vec::new();

    for effect in battle.users_effects.iter().chain(&battle.ground_effects) {
        if is_effect_still_active(effect, battle, now, skew_ms)? {
            active.push(effect.clone());
        } else {
            timers.forget(effect.id);
            expired.push(effect.id);
        }
    }
    sort_effects(&mut active);

    let mut produced = Vec::new();
    for effect in &active {
        let target = match &effect.target {
            EffectTarget::User(user_id) => battle.user(user_id),
            EffectTarget::Ground(location) => battle.find_user(*location),
        };
        let Some(target) = target else {
            continue;
        };

        let times = should_apply_effect_times(effect, battle, &target.user_id, timers, now)?;
        if times <= 0 {
            continue;
        }
        produced.extend(executor.execute(battle, effect, target, times as u32));
    }

    debug!(
        "resolved {} effects in battle {} ({} expired, {} consequences)",
        active.len(),
        battle.id,
        expired.len(),
        produced.len()
    );

    Ok(Resolution {
        consequences: collapse_consequences(produced),
        expired,
    })
}
