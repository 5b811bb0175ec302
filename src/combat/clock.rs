//! Round clock
//!
//! Battles advance in fixed-length rounds counted from the moment the
//! battle was created. The round index is always derived from timestamps
//! and never stored, so it cannot drift from the battle's creation time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::BattleError;

/// A round index together with the wall-clock time it began
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRound {
    /// Rounds elapsed since battle creation (round 0 starts at creation)
    pub round: u64,
    /// When the round began
    pub round_started_at: DateTime<Utc>,
}

/// Converts timestamps into battle rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundClock {
    created_at: DateTime<Utc>,
    round_length_ms: i64,
}

impl RoundClock {
    /// Create a clock for a battle created at `created_at`.
    ///
    /// Fails if the round length is not positive, since every timing rule
    /// in the engine is expressed in rounds.
    pub fn new(created_at: DateTime<Utc>, round_length_ms: i64) -> Result<Self, BattleError> {
        if round_length_ms <= 0 {
            return Err(BattleError::InvalidRoundLength(round_length_ms));
        }
        Ok(Self {
            created_at,
            round_length_ms,
        })
    }

    /// Length of one round
    pub fn round_length(&self) -> Duration {
        Duration::milliseconds(self.round_length_ms)
    }

    /// Round containing `at`, after subtracting `skew_ms` from it.
    ///
    /// Queries before the battle started clamp to round 0.
    pub fn round_at(&self, at: DateTime<Utc>, skew_ms: i64) -> BattleRound {
        let query = at - Duration::milliseconds(skew_ms);
        let elapsed = (query - self.created_at).num_milliseconds();
        if elapsed <= 0 {
            return BattleRound {
                round: 0,
                round_started_at: self.created_at,
            };
        }

        let round = elapsed / self.round_length_ms;
        BattleRound {
            round: round as u64,
            round_started_at: self.created_at + Duration::milliseconds(round * self.round_length_ms),
        }
    }
}
