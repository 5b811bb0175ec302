//! Engine errors
//!
//! Only configuration defects are errors. Missing participants, actions
//! and effects are reported as `None` by the lookups instead.

use thiserror::Error;

/// Errors raised by the battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("invalid round length ({0} ms), must be positive")]
    InvalidRoundLength(i64),
}
