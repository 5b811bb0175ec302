//! Combat resolution module
//!
//! Resolves turn-based battles over a snapshot:
//! - Round timing from battle creation time
//! - Effect lifetime, recurrence and resolution order
//! - Action pool costs
//! - Per-target consequence aggregation
//! - Per-viewer masking of participant state
//! - Battle exit, rating and rewards
//! - Fast-forwarding idle rounds

mod actions;
mod clock;
mod consequence;
mod cost;
mod effects;
mod error;
mod fastforward;
mod mask;
mod ordering;
mod outcome;
mod resolve;
mod state;

pub use actions::{ActionCatalog, CombatAction, StaticCatalog, MOVE_ACTION_ID, WAIT_ACTION_ID};
pub use clock::{BattleRound, RoundClock};
pub use consequence::{collapse_consequences, Consequence};
pub use cost::{calc_pool_cost, PoolCost};
pub use effects::{
    is_effect_still_active, should_apply_effect_times, Calculation, Effect, EffectId, EffectKind,
    EffectTarget, EffectTimers,
};
pub use error::BattleError;
pub use fastforward::{action_points_in_round, do_fast_forward, FULL_ACTION_POINTS};
pub use mask::{mask_battle, MaskedBattle, ParticipantView, PublicParticipant};
pub use ordering::{resolution_order, sort_effects, ResolutionPhase};
pub use outcome::{
    battle_sides, calc_battle_result, calc_elo_change, floor2, max_rating_gain, CombatResult, Sides,
};
pub use resolve::{resolve_effects, EffectExecutor, Resolution};
pub use state::{ArenaGrid, Battle, General, Location, Participant, Pool, StatCategory};
