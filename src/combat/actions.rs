//! Action catalog boundary
//!
//! Actions and the choice between them belong to the caller. The engine
//! only needs their costs and which of them are currently available.

use serde::{Deserialize, Serialize};

use super::state::Battle;

/// ID of the no-op action every participant can take
pub const WAIT_ACTION_ID: &str = "wait";

/// ID of the plain movement action
pub const MOVE_ACTION_ID: &str = "move";

/// A combat action as seen by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatAction {
    pub id: String,
    pub name: String,
    /// Health cost in percent of the user's max health
    #[serde(default)]
    pub health_cost_perc: f64,
    /// Chakra cost in percent of the user's max chakra
    #[serde(default)]
    pub chakra_cost_perc: f64,
    /// Stamina cost in percent of the user's max stamina
    #[serde(default)]
    pub stamina_cost_perc: f64,
    /// Action points required, in percent of a full round
    pub action_cost_perc: f64,
}

impl CombatAction {
    pub fn new(id: &str, action_cost_perc: f64) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            health_cost_perc: 0.0,
            chakra_cost_perc: 0.0,
            stamina_cost_perc: 0.0,
            action_cost_perc,
        }
    }

    /// Set pool costs in percent
    pub fn with_pool_costs(mut self, health: f64, chakra: f64, stamina: f64) -> Self {
        self.health_cost_perc = health;
        self.chakra_cost_perc = chakra;
        self.stamina_cost_perc = stamina;
        self
    }

    pub fn is_wait(&self) -> bool {
        self.id == WAIT_ACTION_ID
    }

    pub fn is_move(&self) -> bool {
        self.id == MOVE_ACTION_ID
    }
}

/// Source of the actions available to a participant
pub trait ActionCatalog {
    /// Actions `user_id` could take right now
    fn available_actions(&self, battle: &Battle, user_id: &str) -> Vec<CombatAction>;

    /// Find an available action by ID
    fn find_action(&self, battle: &Battle, user_id: &str, action_id: &str) -> Option<CombatAction> {
        self.available_actions(battle, user_id)
            .into_iter()
            .find(|a| a.id == action_id)
    }
}

/// Catalog offering the same actions to every live participant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    actions: Vec<CombatAction>,
}

impl StaticCatalog {
    pub fn new(actions: Vec<CombatAction>) -> Self {
        Self { actions }
    }
}

impl ActionCatalog for StaticCatalog {
    fn available_actions(&self, battle: &Battle, user_id: &str) -> Vec<CombatAction> {
        match battle.user(user_id) {
            Some(user) if user.is_fighting() && !user.left_battle => self.actions.clone(),
            _ => Vec::new(),
        }
    }
}
