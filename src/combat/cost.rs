//! Pool costs of actions
//!
//! An action costs a percentage of each of the user's pool maxima.
//! Active pool cost adjustments on the user then raise or lower it.

use serde::{Deserialize, Serialize};

use super::actions::CombatAction;
use super::effects::{Calculation, Effect, EffectKind};
use super::state::{Participant, Pool};

/// Health, chakra and stamina cost of an action
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolCost {
    pub hp_cost: f64,
    pub cp_cost: f64,
    pub sp_cost: f64,
}

impl PoolCost {
    fn get_mut(&mut self, pool: Pool) -> &mut f64 {
        match pool {
            Pool::Health => &mut self.hp_cost,
            Pool::Chakra => &mut self.cp_cost,
            Pool::Stamina => &mut self.sp_cost,
        }
    }
}

/// Calculate the pool cost of `action` for `target`.
///
/// `effects` should hold the active user effects. Adjustments apply in
/// iteration order and stack. Costs are not clamped.
pub fn calc_pool_cost(action: &CombatAction, effects: &[Effect], target: &Participant) -> PoolCost {
    let mut cost = PoolCost {
        hp_cost: action.health_cost_perc * target.max_pool(Pool::Health) / 100.0,
        cp_cost: action.chakra_cost_perc * target.max_pool(Pool::Chakra) / 100.0,
        sp_cost: action.stamina_cost_perc * target.max_pool(Pool::Stamina) / 100.0,
    };

    let adjustments = effects
        .iter()
        .filter(|e| e.kind == EffectKind::PoolCostAdjust)
        .filter(|e| e.target_id() == Some(target.user_id.as_str()));

    for effect in adjustments {
        for pool in &effect.pools_affected {
            let value = cost.get_mut(*pool);
            *value = match effect.calculation {
                Calculation::Static => *value + effect.power,
                Calculation::Percentage => (*value * (100.0 + effect.power)) / 100.0,
            };
        }
    }

    cost
}
