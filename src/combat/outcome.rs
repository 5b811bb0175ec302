//! Battle exit and rewards
//!
//! Decides when a participant leaves a battle and what it earns:
//! - Rating change from an expected-score (ELO) formula
//! - Experience, split across the stats exercised in the fight
//! - Money for winners

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::state::{Battle, General, Participant, StatCategory};
use super::BattleError;

/// Rating K-factor before reward scaling
pub const BASE_K_FACTOR: f64 = 32.0;

/// Smallest rating gain awarded for taking part
pub const MIN_RATING_GAIN: f64 = 0.02;

/// Experience awarded for fleeing
pub const FLED_EXPERIENCE: f64 = 0.01;

/// Money won, before adding the winner's level
pub const WIN_MONEY_MIN: i64 = 30;
pub const WIN_MONEY_MAX: i64 = 40;

/// Rewards for a participant leaving a battle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombatResult {
    pub did_win: bool,
    pub experience: f64,
    pub elo_pvp: f64,
    pub elo_pve: f64,
    pub cur_health: f64,
    pub cur_stamina: f64,
    pub cur_chakra: f64,
    pub strength: f64,
    pub intelligence: f64,
    pub willpower: f64,
    pub speed: f64,
    pub ninjutsu_offence: f64,
    pub genjutsu_offence: f64,
    pub taijutsu_offence: f64,
    pub bukijutsu_offence: f64,
    pub ninjutsu_defence: f64,
    pub genjutsu_defence: f64,
    pub taijutsu_defence: f64,
    pub bukijutsu_defence: f64,
    /// Money change relative to the start of the battle
    pub money: i64,
    /// Allies still fighting (not left, not AI)
    pub friends_left: usize,
    /// Opponents still fighting (not left, not AI)
    pub targets_left: usize,
}

impl CombatResult {
    /// Experience gained in a combat stat
    pub fn stat(&self, stat: StatCategory) -> f64 {
        match stat {
            StatCategory::NinjutsuOffence => self.ninjutsu_offence,
            StatCategory::NinjutsuDefence => self.ninjutsu_defence,
            StatCategory::GenjutsuOffence => self.genjutsu_offence,
            StatCategory::GenjutsuDefence => self.genjutsu_defence,
            StatCategory::TaijutsuOffence => self.taijutsu_offence,
            StatCategory::TaijutsuDefence => self.taijutsu_defence,
            StatCategory::BukijutsuOffence => self.bukijutsu_offence,
            StatCategory::BukijutsuDefence => self.bukijutsu_defence,
        }
    }

    /// Experience gained in a general attribute
    pub fn general(&self, general: General) -> f64 {
        match general {
            General::Strength => self.strength,
            General::Intelligence => self.intelligence,
            General::Willpower => self.willpower,
            General::Speed => self.speed,
        }
    }

    fn stat_mut(&mut self, stat: StatCategory) -> &mut f64 {
        match stat {
            StatCategory::NinjutsuOffence => &mut self.ninjutsu_offence,
            StatCategory::NinjutsuDefence => &mut self.ninjutsu_defence,
            StatCategory::GenjutsuOffence => &mut self.genjutsu_offence,
            StatCategory::GenjutsuDefence => &mut self.genjutsu_defence,
            StatCategory::TaijutsuOffence => &mut self.taijutsu_offence,
            StatCategory::TaijutsuDefence => &mut self.taijutsu_defence,
            StatCategory::BukijutsuOffence => &mut self.bukijutsu_offence,
            StatCategory::BukijutsuDefence => &mut self.bukijutsu_defence,
        }
    }

    fn general_mut(&mut self, general: General) -> &mut f64 {
        match general {
            General::Strength => &mut self.strength,
            General::Intelligence => &mut self.intelligence,
            General::Willpower => &mut self.willpower,
            General::Speed => &mut self.speed,
        }
    }
}

/// Teams as seen from one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sides {
    /// Original participants on the same side, including the participant
    pub friends: Vec<String>,
    /// Original participants on the opposing side
    pub targets: Vec<String>,
}

/// Floor to two decimal places
pub fn floor2(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// Largest rating change a battle with `reward_scaling` can award
pub fn max_rating_gain(reward_scaling: f64) -> f64 {
    floor2(BASE_K_FACTOR * reward_scaling)
}

/// Rating change from an expected-score formula, floored to two decimals
pub fn calc_elo_change(user: f64, opponent: f64, k_factor: f64, won: bool) -> f64 {
    let expected = 1.0 / (1.0 + 10f64.powf((opponent - user) / 400.0));
    let score = if won { 1.0 } else { 0.0 };
    floor2(k_factor * (score - expected))
}

/// Split original participants into friends and targets of `user_id`.
///
/// With exactly two originals the battle is a duel and sides are split by
/// identity. Otherwise sides follow the village.
pub fn battle_sides(battle: &Battle, user_id: &str) -> Option<Sides> {
    let user = battle.user(user_id)?;
    let originals = battle.users_state.iter().filter(|u| u.is_original);
    let duel = battle.users_state.iter().filter(|u| u.is_original).count() == 2;

    let (friends, targets): (Vec<&Participant>, Vec<&Participant>) = if duel {
        originals.partition(|u| u.user_id == user_id)
    } else {
        originals.partition(|u| u.village_id == user.village_id)
    };

    let ids = |users: Vec<&Participant>| -> Vec<String> {
        users.iter().map(|u| u.user_id.clone()).collect()
    };
    Some(Sides {
        friends: ids(friends),
        targets: ids(targets),
    })
}

fn average_experience(battle: &Battle, ids: &[String], fallback: f64) -> f64 {
    let exps: Vec<f64> = ids
        .iter()
        .filter_map(|id| battle.user(id))
        .map(|u| u.experience)
        .collect();
    if exps.is_empty() {
        return fallback;
    }
    exps.iter().sum::<f64>() / exps.len() as f64
}

fn still_fighting(battle: &Battle, ids: &[String]) -> usize {
    ids.iter()
        .filter_map(|id| battle.user(id))
        .filter(|u| !u.left_battle && !u.is_ai)
        .count()
}

/// Check whether `user_id` has left the battle and compute its rewards.
///
/// Returns `None` if the participant is unknown, already left, or is still
/// in the fight. On exit the participant is marked as left in `battle`.
pub fn calc_battle_result<R: Rng>(
    battle: &mut Battle,
    user_id: &str,
    rng: &mut R,
) -> Result<Option<CombatResult>, BattleError> {
    battle.clock()?;

    let Some(user) = battle.user(user_id).cloned() else {
        return Ok(None);
    };
    if user.left_battle {
        return Ok(None);
    }
    let Some(sides) = battle_sides(battle, user_id) else {
        return Ok(None);
    };

    let surviving_targets = sides
        .targets
        .iter()
        .filter_map(|id| battle.user(id))
        .filter(|t| t.is_fighting())
        .count();
    if user.is_fighting() && surviving_targets > 0 {
        debug!(
            "{} still fighting {} opponents in battle {}",
            user_id, surviving_targets, battle.id
        );
        return Ok(None);
    }

    if let Some(leaving) = battle.user_mut(user_id) {
        leaving.left_battle = true;
    }

    // Rating change as if the participant had won
    let u_exp = average_experience(battle, &sides.friends, user.experience);
    let o_exp = average_experience(battle, &sides.targets, u_exp);
    let did_win = user.is_fighting();
    let max_gain = max_rating_gain(battle.reward_scaling);
    let elo_diff = calc_elo_change(u_exp, o_exp, max_gain, true).max(MIN_RATING_GAIN);
    let experience = if user.fled_battle {
        FLED_EXPERIENCE
    } else if did_win {
        elo_diff
    } else {
        floor2(elo_diff / 2.0)
    };

    let new_money = if did_win {
        user.money + rng.random_range(WIN_MONEY_MIN..=WIN_MONEY_MAX) + i64::from(user.level)
    } else {
        user.money
    };

    let against_ai = sides
        .targets
        .iter()
        .filter_map(|id| battle.user(id))
        .all(|t| t.is_ai);

    let mut result = CombatResult {
        did_win,
        experience,
        cur_health: user.cur_health,
        cur_stamina: user.cur_stamina,
        cur_chakra: user.cur_chakra,
        money: new_money - user.original_money,
        friends_left: still_fighting(battle, &sides.friends),
        targets_left: still_fighting(battle, &sides.targets),
        ..CombatResult::default()
    };
    if against_ai {
        result.elo_pve = experience;
    } else {
        result.elo_pvp = experience;
    }

    // Spread experience over exercised stats, or over everything if none were
    let (stats, generals) = if user.used_stats.is_empty() && user.used_generals.is_empty() {
        (StatCategory::ALL.to_vec(), General::ALL.to_vec())
    } else {
        (user.used_stats.clone(), user.used_generals.clone())
    };
    let stat_gain = floor2(experience / (stats.len() + generals.len()) as f64);
    for stat in stats {
        *result.stat_mut(stat) += stat_gain;
    }
    for general in generals {
        *result.general_mut(general) += stat_gain;
    }

    info!(
        "{} left battle {} (won: {}, experience: {:.2}, money: {})",
        user_id, battle.id, did_win, experience, result.money
    );
    Ok(Some(result))
}
