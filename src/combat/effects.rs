//! Battle effects
//!
//! Effects are timed modifiers attached either to a participant or to a
//! cell of the arena. This module decides:
//! - Whether an effect is still active
//! - How many times a recurring effect fires for a target right now

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{Battle, Location, Pool};
use super::BattleError;

/// Unique effect identifier
pub type EffectId = Uuid;

/// Kinds of battle effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Absorbs part of incoming damage into a pool
    Absorb,
    ArmorAdjust,
    /// Blocks a cell of the arena
    Barrier,
    /// Removes other effects
    Clear,
    Clone,
    Damage,
    DamageGivenAdjust,
    DamageTakenAdjust,
    Flee,
    FleePrevent,
    Heal,
    HealAdjust,
    Lifesteal,
    Move,
    OneHitKill,
    OneHitKillPrevent,
    Pierce,
    /// Changes the pool cost of actions
    PoolCostAdjust,
    Recoil,
    /// Returns part of incoming damage to the attacker
    Reflect,
    Rob,
    RobPrevent,
    Seal,
    SealPrevent,
    StatAdjust,
    Stun,
    StunPrevent,
    Summon,
    SummonPrevent,
    Visual,
}

/// Kinds resolved against every attack regardless of round timing
const ALWAYS_APPLY: [EffectKind; 14] = [
    EffectKind::Absorb,
    EffectKind::ArmorAdjust,
    EffectKind::DamageGivenAdjust,
    EffectKind::DamageTakenAdjust,
    EffectKind::HealAdjust,
    EffectKind::PoolCostAdjust,
    EffectKind::StatAdjust,
    EffectKind::FleePrevent,
    EffectKind::OneHitKillPrevent,
    EffectKind::Reflect,
    EffectKind::RobPrevent,
    EffectKind::SealPrevent,
    EffectKind::StunPrevent,
    EffectKind::SummonPrevent,
];

impl EffectKind {
    /// Get all effect kinds
    pub fn all() -> &'static [EffectKind] {
        &[
            EffectKind::Absorb,
            EffectKind::ArmorAdjust,
            EffectKind::Barrier,
            EffectKind::Clear,
            EffectKind::Clone,
            EffectKind::Damage,
            EffectKind::DamageGivenAdjust,
            EffectKind::DamageTakenAdjust,
            EffectKind::Flee,
            EffectKind::FleePrevent,
            EffectKind::Heal,
            EffectKind::HealAdjust,
            EffectKind::Lifesteal,
            EffectKind::Move,
            EffectKind::OneHitKill,
            EffectKind::OneHitKillPrevent,
            EffectKind::Pierce,
            EffectKind::PoolCostAdjust,
            EffectKind::Recoil,
            EffectKind::Reflect,
            EffectKind::Rob,
            EffectKind::RobPrevent,
            EffectKind::Seal,
            EffectKind::SealPrevent,
            EffectKind::StatAdjust,
            EffectKind::Stun,
            EffectKind::StunPrevent,
            EffectKind::Summon,
            EffectKind::SummonPrevent,
            EffectKind::Visual,
        ]
    }

    /// Whether this kind fires once per resolution, ignoring round timers
    pub fn always_applies(&self) -> bool {
        ALWAYS_APPLY.contains(self)
    }

    /// Tag used in battle records
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Absorb => "absorb",
            EffectKind::ArmorAdjust => "armoradjust",
            EffectKind::Barrier => "barrier",
            EffectKind::Clear => "clear",
            EffectKind::Clone => "clone",
            EffectKind::Damage => "damage",
            EffectKind::DamageGivenAdjust => "damagegivenadjust",
            EffectKind::DamageTakenAdjust => "damagetakenadjust",
            EffectKind::Flee => "flee",
            EffectKind::FleePrevent => "fleeprevent",
            EffectKind::Heal => "heal",
            EffectKind::HealAdjust => "healadjust",
            EffectKind::Lifesteal => "lifesteal",
            EffectKind::Move => "move",
            EffectKind::OneHitKill => "onehitkill",
            EffectKind::OneHitKillPrevent => "onehitkillprevent",
            EffectKind::Pierce => "pierce",
            EffectKind::PoolCostAdjust => "poolcostadjust",
            EffectKind::Recoil => "recoil",
            EffectKind::Reflect => "reflect",
            EffectKind::Rob => "rob",
            EffectKind::RobPrevent => "robprevent",
            EffectKind::Seal => "seal",
            EffectKind::SealPrevent => "sealprevent",
            EffectKind::StatAdjust => "statadjust",
            EffectKind::Stun => "stun",
            EffectKind::StunPrevent => "stunprevent",
            EffectKind::Summon => "summon",
            EffectKind::SummonPrevent => "summonprevent",
            EffectKind::Visual => "visual",
        }
    }
}

impl FromStr for EffectKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.to_lowercase();
        EffectKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == tag)
            .ok_or(())
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an effect's power is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calculation {
    /// Power is added to the base value
    #[default]
    Static,
    /// Power is a percentage change of the base value
    Percentage,
}

/// What an effect is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectTarget {
    /// A participant, by user ID
    User(String),
    /// A cell of the arena
    Ground(Location),
}

/// An effect instance in a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub kind: EffectKind,
    /// Duration in rounds; `None` lasts until removed
    pub rounds: Option<u32>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub calculation: Calculation,
    #[serde(default)]
    pub power: f64,
    /// Pools changed by pool cost adjustments
    #[serde(default)]
    pub pools_affected: Vec<Pool>,
    /// Participant who created the effect
    pub creator_id: Option<String>,
    pub target: EffectTarget,
}

impl Effect {
    fn new(kind: EffectKind, target: EffectTarget, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            rounds: None,
            created_at,
            calculation: Calculation::Static,
            power: 0.0,
            pools_affected: Vec::new(),
            creator_id: None,
            target,
        }
    }

    /// Create an effect on a participant
    pub fn on_user(kind: EffectKind, target_id: &str, created_at: DateTime<Utc>) -> Self {
        Self::new(kind, EffectTarget::User(target_id.to_string()), created_at)
    }

    /// Create an effect on an arena cell
    pub fn ground(kind: EffectKind, location: Location, created_at: DateTime<Utc>) -> Self {
        Self::new(kind, EffectTarget::Ground(location), created_at)
    }

    /// Limit the effect to a number of rounds
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Set power and how it is applied
    pub fn with_power(mut self, calculation: Calculation, power: f64) -> Self {
        self.calculation = calculation;
        self.power = power;
        self
    }

    /// Set pools affected by the effect
    pub fn affecting(mut self, pools: &[Pool]) -> Self {
        self.pools_affected = pools.to_vec();
        self
    }

    /// Set the creator of this effect
    pub fn created_by(mut self, creator_id: &str) -> Self {
        self.creator_id = Some(creator_id.to_string());
        self
    }

    /// Target participant, for user effects
    pub fn target_id(&self) -> Option<&str> {
        match &self.target {
            EffectTarget::User(id) => Some(id),
            EffectTarget::Ground(_) => None,
        }
    }

    /// Target cell, for ground effects
    pub fn location(&self) -> Option<Location> {
        match self.target {
            EffectTarget::Ground(location) => Some(location),
            EffectTarget::User(_) => None,
        }
    }
}

/// Round of the last application of each recurring effect, per target.
///
/// Kept apart from the effects themselves so that the only state the
/// lifecycle mutates is visible at the call site. Persist it together
/// with the battle after each resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTimers {
    last_applied: HashMap<EffectId, HashMap<String, u64>>,
}

impl EffectTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round in which an effect last fired for a target
    pub fn last_applied(&self, effect_id: EffectId, target_id: &str) -> Option<u64> {
        self.last_applied
            .get(&effect_id)
            .and_then(|targets| targets.get(target_id))
            .copied()
    }

    /// Record that an effect fired for a target in `round`
    pub fn record(&mut self, effect_id: EffectId, target_id: &str, round: u64) {
        self.last_applied
            .entry(effect_id)
            .or_default()
            .insert(target_id.to_string(), round);
    }

    /// Drop all records of an effect
    pub fn forget(&mut self, effect_id: EffectId) {
        self.last_applied.remove(&effect_id);
    }

    /// Keep only records of the given effects
    pub fn retain(&mut self, live: &[EffectId]) {
        self.last_applied.retain(|id, _| live.contains(id));
    }

    /// Number of effects with recorded applications
    pub fn len(&self) -> usize {
        self.last_applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_applied.is_empty()
    }
}

/// Check whether an effect is still active at `now`.
///
/// Effects without a duration stay active until removed. Otherwise the
/// effect expires once the current round reaches its creation round plus
/// its duration. The skew is applied to both timestamps.
pub fn is_effect_still_active(
    effect: &Effect,
    battle: &Battle,
    now: DateTime<Utc>,
    skew_ms: i64,
) -> Result<bool, BattleError> {
    let clock = battle.clock()?;
    let Some(rounds) = effect.rounds else {
        return Ok(true);
    };
    let start = clock.round_at(effect.created_at, skew_ms).round;
    let current = clock.round_at(now, skew_ms).round;
    Ok(start + u64::from(rounds) > current)
}

/// Number of times an effect must fire for `target_id` at `now`.
///
/// A result of zero or less means the effect already fired for the
/// target this round and must not fire again. Recurring effects that were
/// idle for several rounds catch up by returning the number of rounds
/// missed.
pub fn should_apply_effect_times(
    effect: &Effect,
    battle: &Battle,
    target_id: &str,
    timers: &mut EffectTimers,
    now: DateTime<Utc>,
) -> Result<i64, BattleError> {
    let clock = battle.clock()?;
    if effect.kind.always_applies() || effect.rounds.is_none() {
        return Ok(1);
    }

    let current = clock.round_at(now, 0).round;
    match timers.last_applied(effect.id, target_id) {
        Some(previous) => {
            let times = current as i64 - previous as i64;
            if times > 0 {
                timers.record(effect.id, target_id, current);
            }
            Ok(times)
        }
        None => {
            timers.record(effect.id, target_id, current);
            Ok(1)
        }
    }
}
