//! Per-viewer battle projection
//!
//! Participants controlled by the viewer are returned in full. Everyone
//! else is reduced to the public fields, so resource pools, action
//! points, money and training progress of opponents never leak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::effects::Effect;
use super::state::{ArenaGrid, Battle, Location, Participant};

/// Fields of a participant visible to every viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicParticipant {
    pub user_id: String,
    pub controller_id: String,
    pub username: String,
    pub level: u32,
    pub village_id: Option<String>,
    pub location: Location,
    pub cur_health: f64,
    pub max_health: f64,
    pub fled_battle: bool,
    pub left_battle: bool,
    pub is_original: bool,
    pub is_ai: bool,
    pub is_summon: bool,
}

impl From<&Participant> for PublicParticipant {
    fn from(user: &Participant) -> Self {
        Self {
            user_id: user.user_id.clone(),
            controller_id: user.controller_id.clone(),
            username: user.username.clone(),
            level: user.level,
            village_id: user.village_id.clone(),
            location: user.location,
            cur_health: user.cur_health,
            max_health: user.max_health,
            fled_battle: user.fled_battle,
            left_battle: user.left_battle,
            is_original: user.is_original,
            is_ai: user.is_ai,
            is_summon: user.is_summon,
        }
    }
}

/// A participant as seen by one viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ParticipantView {
    /// Controlled by the viewer
    Owner(Participant),
    /// Controlled by someone else
    Public(PublicParticipant),
}

impl ParticipantView {
    pub fn user_id(&self) -> &str {
        match self {
            ParticipantView::Owner(user) => &user.user_id,
            ParticipantView::Public(user) => &user.user_id,
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, ParticipantView::Owner(_))
    }
}

/// Battle as returned to a specific viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedBattle {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub round_length_ms: i64,
    pub reward_scaling: f64,
    pub grid: ArenaGrid,
    pub users_state: Vec<ParticipantView>,
    pub users_effects: Vec<Effect>,
    pub ground_effects: Vec<Effect>,
}

/// Project a battle for `viewer_id`
pub fn mask_battle(battle: &Battle, viewer_id: &str) -> MaskedBattle {
    let users_state = battle
        .users_state
        .iter()
        .map(|user| {
            if user.controller_id == viewer_id {
                ParticipantView::Owner(user.clone())
            } else {
                ParticipantView::Public(PublicParticipant::from(user))
            }
        })
        .collect();

    MaskedBattle {
        id: battle.id.clone(),
        created_at: battle.created_at,
        round_length_ms: battle.round_length_ms,
        reward_scaling: battle.reward_scaling,
        grid: battle.grid,
        users_state,
        users_effects: battle.users_effects.clone(),
        ground_effects: battle.ground_effects.clone(),
    }
}
