//! Effect resolution order
//!
//! Effects resolve in four phases: pre-modifiers, primary effects,
//! post-modifiers and terminal effects. Prevention effects come right
//! before the effect they block; reflect and absorb come after damage
//! and heal so they see adjusted amounts.

use std::cmp::Ordering;

use super::effects::{Effect, EffectKind};

/// Resolution phase of an effect kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolutionPhase {
    /// Clears, armor, cost and stat adjustments
    PreModifier = 0,
    /// Barrier, damage, heal, stun and the rest of the primary effects
    Primary = 1,
    /// Absorb, reflect and given/taken adjustments
    PostModifier = 2,
    /// Movement and visuals
    Terminal = 3,
}

/// Fixed resolution order. Kinds missing here have no preferred position.
const RESOLUTION_ORDER: [(EffectKind, ResolutionPhase); 28] = [
    (EffectKind::Clear, ResolutionPhase::PreModifier),
    (EffectKind::ArmorAdjust, ResolutionPhase::PreModifier),
    (EffectKind::PoolCostAdjust, ResolutionPhase::PreModifier),
    (EffectKind::StatAdjust, ResolutionPhase::PreModifier),
    // Listed twice; the first position wins
    (EffectKind::PoolCostAdjust, ResolutionPhase::PreModifier),
    (EffectKind::Barrier, ResolutionPhase::Primary),
    (EffectKind::Clone, ResolutionPhase::Primary),
    (EffectKind::Damage, ResolutionPhase::Primary),
    (EffectKind::FleePrevent, ResolutionPhase::Primary),
    (EffectKind::Flee, ResolutionPhase::Primary),
    (EffectKind::Heal, ResolutionPhase::Primary),
    (EffectKind::OneHitKillPrevent, ResolutionPhase::Primary),
    (EffectKind::OneHitKill, ResolutionPhase::Primary),
    (EffectKind::RobPrevent, ResolutionPhase::Primary),
    (EffectKind::Rob, ResolutionPhase::Primary),
    (EffectKind::SealPrevent, ResolutionPhase::Primary),
    (EffectKind::Seal, ResolutionPhase::Primary),
    (EffectKind::StunPrevent, ResolutionPhase::Primary),
    (EffectKind::Stun, ResolutionPhase::Primary),
    (EffectKind::SummonPrevent, ResolutionPhase::Primary),
    (EffectKind::Summon, ResolutionPhase::Primary),
    (EffectKind::Absorb, ResolutionPhase::PostModifier),
    (EffectKind::DamageGivenAdjust, ResolutionPhase::PostModifier),
    (EffectKind::DamageTakenAdjust, ResolutionPhase::PostModifier),
    (EffectKind::HealAdjust, ResolutionPhase::PostModifier),
    (EffectKind::Reflect, ResolutionPhase::PostModifier),
    (EffectKind::Move, ResolutionPhase::Terminal),
    (EffectKind::Visual, ResolutionPhase::Terminal),
];

impl EffectKind {
    /// Position in the resolution order, if the kind has one
    pub fn resolution_rank(&self) -> Option<usize> {
        RESOLUTION_ORDER.iter().position(|(kind, _)| kind == self)
    }

    /// Resolution phase, if the kind has one
    pub fn resolution_phase(&self) -> Option<ResolutionPhase> {
        RESOLUTION_ORDER
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, phase)| *phase)
    }
}

/// Compare two effect kinds by resolution order.
///
/// Returns `None` when either kind has no fixed position: such kinds are
/// neutral relative to every other kind.
pub fn resolution_order(a: EffectKind, b: EffectKind) -> Option<Ordering> {
    Some(a.resolution_rank()?.cmp(&b.resolution_rank()?))
}

/// Sort effects into resolution order.
///
/// Ranked effects are stably sorted among the slots they occupy; effects
/// without a rank keep their position.
pub fn sort_effects(effects: &mut [Effect]) {
    let slots: Vec<usize> = effects
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind.resolution_rank().is_some())
        .map(|(i, _)| i)
        .collect();

    let mut ranked: Vec<Effect> = slots.iter().map(|&i| effects[i].clone()).collect();
    ranked.sort_by_key(|e| e.kind.resolution_rank());

    for (slot, effect) in slots.into_iter().zip(ranked) {
        effects[slot] = effect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn effect(kind: EffectKind) -> Effect {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Effect::on_user(kind, "alice", now)
    }

    fn kinds(effects: &[Effect]) -> Vec<EffectKind> {
        effects.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_phases() {
        assert_eq!(EffectKind::Clear.resolution_phase(), Some(ResolutionPhase::PreModifier));
        assert_eq!(EffectKind::Damage.resolution_phase(), Some(ResolutionPhase::Primary));
        assert_eq!(EffectKind::Reflect.resolution_phase(), Some(ResolutionPhase::PostModifier));
        assert_eq!(EffectKind::Move.resolution_phase(), Some(ResolutionPhase::Terminal));
        assert_eq!(EffectKind::Lifesteal.resolution_phase(), None);
    }

    #[test]
    fn test_phases_are_contiguous() {
        let phases: Vec<ResolutionPhase> = RESOLUTION_ORDER.iter().map(|(_, p)| *p).collect();
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_prevent_before_effect() {
        let pairs = [
            (EffectKind::FleePrevent, EffectKind::Flee),
            (EffectKind::OneHitKillPrevent, EffectKind::OneHitKill),
            (EffectKind::RobPrevent, EffectKind::Rob),
            (EffectKind::SealPrevent, EffectKind::Seal),
            (EffectKind::StunPrevent, EffectKind::Stun),
            (EffectKind::SummonPrevent, EffectKind::Summon),
        ];
        for (prevent, effect) in pairs {
            assert_eq!(resolution_order(prevent, effect), Some(Ordering::Less));
            assert_eq!(resolution_order(effect, prevent), Some(Ordering::Greater));
        }
    }

    #[test]
    fn test_unranked_kinds_are_neutral() {
        assert_eq!(resolution_order(EffectKind::Pierce, EffectKind::Damage), None);
        assert_eq!(resolution_order(EffectKind::Damage, EffectKind::Recoil), None);
        assert_eq!(resolution_order(EffectKind::Lifesteal, EffectKind::Pierce), None);
        assert_eq!(
            resolution_order(EffectKind::Heal, EffectKind::Heal),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_sort_effects() {
        let mut effects = vec![
            effect(EffectKind::Visual),
            effect(EffectKind::Reflect),
            effect(EffectKind::Damage),
            effect(EffectKind::Clear),
            effect(EffectKind::StunPrevent),
        ];
        sort_effects(&mut effects);
        assert_eq!(
            kinds(&effects),
            vec![
                EffectKind::Clear,
                EffectKind::Damage,
                EffectKind::StunPrevent,
                EffectKind::Reflect,
                EffectKind::Visual,
            ]
        );
    }

    #[test]
    fn test_sort_keeps_unranked_in_place() {
        let mut effects = vec![
            effect(EffectKind::Move),
            effect(EffectKind::Lifesteal),
            effect(EffectKind::Damage),
            effect(EffectKind::Pierce),
        ];
        sort_effects(&mut effects);
        assert_eq!(
            kinds(&effects),
            vec![
                EffectKind::Damage,
                EffectKind::Lifesteal,
                EffectKind::Move,
                EffectKind::Pierce,
            ]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let first = effect(EffectKind::Damage);
        let second = effect(EffectKind::Damage);
        let ids = [first.id, second.id];
        let mut effects = vec![effect(EffectKind::Move), first, second];
        sort_effects(&mut effects);
        assert_eq!([effects[0].id, effects[1].id], ids);
    }
}
