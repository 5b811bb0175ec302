//! Battle snapshot
//!
//! The aggregate the engine works on:
//! - Participants and their resource pools
//! - Participant-scoped and arena-scoped effects
//! - Location lookups on the arena grid

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{BattleRound, RoundClock};
use super::effects::{is_effect_still_active, Effect, EffectId, EffectKind};
use super::BattleError;
use crate::profile::{calc_cp, calc_hp, calc_sp};
use crate::Config;

/// A cell on the arena grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub longitude: i32,
    pub latitude: i32,
}

impl Location {
    pub fn new(longitude: i32, latitude: i32) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Dimensions of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaGrid {
    pub width: u32,
    pub height: u32,
}

impl Default for ArenaGrid {
    fn default() -> Self {
        Self {
            width: 13,
            height: 5,
        }
    }
}

impl ArenaGrid {
    /// Check if a location lies on the grid
    pub fn contains(&self, location: Location) -> bool {
        location.longitude >= 0
            && location.latitude >= 0
            && (location.longitude as u32) < self.width
            && (location.latitude as u32) < self.height
    }
}

/// Resource pools a participant spends on actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pool {
    Health,
    Chakra,
    Stamina,
}

/// Combat stats that gain experience when exercised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatCategory {
    NinjutsuOffence,
    NinjutsuDefence,
    GenjutsuOffence,
    GenjutsuDefence,
    TaijutsuOffence,
    TaijutsuDefence,
    BukijutsuOffence,
    BukijutsuDefence,
}

impl StatCategory {
    /// Every combat stat, in the order experience is credited by default
    pub const ALL: [StatCategory; 8] = [
        StatCategory::NinjutsuOffence,
        StatCategory::NinjutsuDefence,
        StatCategory::GenjutsuOffence,
        StatCategory::GenjutsuDefence,
        StatCategory::TaijutsuOffence,
        StatCategory::TaijutsuDefence,
        StatCategory::BukijutsuOffence,
        StatCategory::BukijutsuDefence,
    ];
}

/// General attributes that gain experience when exercised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum General {
    Strength,
    Intelligence,
    Willpower,
    Speed,
}

impl General {
    pub const ALL: [General; 4] = [
        General::Strength,
        General::Intelligence,
        General::Willpower,
        General::Speed,
    ];
}

/// State of a single participant in a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID (unique within the battle)
    pub user_id: String,
    /// User controlling this participant (clones and summons share it)
    pub controller_id: String,
    pub username: String,
    pub level: u32,
    /// Faction used to split teams in multi-participant battles
    pub village_id: Option<String>,
    pub location: Location,
    pub cur_health: f64,
    pub max_health: f64,
    pub cur_chakra: f64,
    pub max_chakra: f64,
    pub cur_stamina: f64,
    pub max_stamina: f64,
    /// Remaining action points this round, in percent of a full round
    pub action_points: f64,
    pub fled_battle: bool,
    pub left_battle: bool,
    /// Counts towards team composition (not a clone or summon)
    pub is_original: bool,
    pub is_ai: bool,
    pub is_summon: bool,
    pub experience: f64,
    pub money: i64,
    /// Money held when the battle started
    pub original_money: i64,
    pub used_stats: Vec<StatCategory>,
    pub used_generals: Vec<General>,
    /// Time of the participant's last action
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a participant at full resources for its level
    pub fn new(user_id: &str, level: u32, now: DateTime<Utc>) -> Self {
        let max_health = calc_hp(level);
        let max_chakra = calc_cp(level);
        let max_stamina = calc_sp(level);
        Self {
            user_id: user_id.to_string(),
            controller_id: user_id.to_string(),
            username: user_id.to_string(),
            level,
            village_id: None,
            location: Location::new(0, 0),
            cur_health: max_health,
            max_health,
            cur_chakra: max_chakra,
            max_chakra,
            cur_stamina: max_stamina,
            max_stamina,
            action_points: 100.0,
            fled_battle: false,
            left_battle: false,
            is_original: true,
            is_ai: false,
            is_summon: false,
            experience: 0.0,
            money: 0,
            original_money: 0,
            used_stats: Vec::new(),
            used_generals: Vec::new(),
            updated_at: now,
        }
    }

    /// Set the faction
    pub fn with_village(mut self, village_id: &str) -> Self {
        self.village_id = Some(village_id.to_string());
        self
    }

    /// Place the participant on the arena
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Set money held, recording it as the battle-start balance as well
    pub fn with_money(mut self, money: i64) -> Self {
        self.money = money;
        self.original_money = money;
        self
    }

    pub fn with_experience(mut self, experience: f64) -> Self {
        self.experience = experience;
        self
    }

    /// Mark as AI controlled
    pub fn as_ai(mut self) -> Self {
        self.is_ai = true;
        self
    }

    /// Turn into a summon controlled by `controller_id`
    pub fn summoned_by(mut self, controller_id: &str) -> Self {
        self.controller_id = controller_id.to_string();
        self.is_summon = true;
        self.is_original = false;
        self
    }

    /// Maximum value of a pool
    pub fn max_pool(&self, pool: Pool) -> f64 {
        match pool {
            Pool::Health => self.max_health,
            Pool::Chakra => self.max_chakra,
            Pool::Stamina => self.max_stamina,
        }
    }

    /// Check if participant is dead
    pub fn is_dead(&self) -> bool {
        self.cur_health <= 0.0
    }

    /// Alive and still on the field
    pub fn is_fighting(&self) -> bool {
        !self.is_dead() && !self.fled_battle
    }
}

/// Battle snapshot handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub round_length_ms: i64,
    /// Multiplier applied to rating and experience rewards
    pub reward_scaling: f64,
    #[serde(default)]
    pub grid: ArenaGrid,
    pub users_state: Vec<Participant>,
    #[serde(default)]
    pub users_effects: Vec<Effect>,
    #[serde(default)]
    pub ground_effects: Vec<Effect>,
}

impl Battle {
    /// Create an empty battle using the configured round length and scaling
    pub fn new(id: &str, created_at: DateTime<Utc>, config: &Config) -> Self {
        Self {
            id: id.to_string(),
            created_at,
            round_length_ms: config.round_length_ms,
            reward_scaling: config.reward_scaling,
            grid: ArenaGrid::default(),
            users_state: Vec::new(),
            users_effects: Vec::new(),
            ground_effects: Vec::new(),
        }
    }

    /// Add a participant
    pub fn with_user(mut self, user: Participant) -> Self {
        self.users_state.push(user);
        self
    }

    /// Round clock for this battle
    pub fn clock(&self) -> Result<RoundClock, BattleError> {
        RoundClock::new(self.created_at, self.round_length_ms)
    }

    /// Round containing `at`
    pub fn round_at(&self, at: DateTime<Utc>, skew_ms: i64) -> Result<BattleRound, BattleError> {
        Ok(self.clock()?.round_at(at, skew_ms))
    }

    /// Get a participant by ID
    pub fn user(&self, user_id: &str) -> Option<&Participant> {
        self.users_state.iter().find(|u| u.user_id == user_id)
    }

    /// Get a mutable participant by ID
    pub fn user_mut(&mut self, user_id: &str) -> Option<&mut Participant> {
        self.users_state.iter_mut().find(|u| u.user_id == user_id)
    }

    /// Live participant standing on a location
    pub fn find_user(&self, location: Location) -> Option<&Participant> {
        if !self.grid.contains(location) {
            return None;
        }
        self.users_state
            .iter()
            .find(|u| u.location == location && u.is_fighting())
    }

    /// Barrier occupying a location
    pub fn find_barrier(&self, location: Location) -> Option<&Effect> {
        self.ground_effects
            .iter()
            .find(|e| e.kind == EffectKind::Barrier && e.location() == Some(location))
    }

    /// Participant effects still active at `now`, in their stored order
    pub fn active_user_effects(
        &self,
        now: DateTime<Utc>,
        skew_ms: i64,
    ) -> Result<Vec<Effect>, BattleError> {
        let mut active = Vec::new();
        for effect in &self.users_effects {
            if is_effect_still_active(effect, self, now, skew_ms)? {
                active.push(effect.clone());
            }
        }
        Ok(active)
    }

    /// Drop effects by ID from both effect lists, returning how many were removed
    pub fn remove_effects(&mut self, ids: &[EffectId]) -> usize {
        let before = self.users_effects.len() + self.ground_effects.len();
        self.users_effects.retain(|e| !ids.contains(&e.id));
        self.ground_effects.retain(|e| !ids.contains(&e.id));
        before - self.users_effects.len() - self.ground_effects.len()
    }
}
