//! Brewing countdown clock model

use serde::{Deserialize, Serialize};

use super::entity::LocalId;

/// A running infusion countdown tied to one brewing session.
///
/// Clocks are persisted locally only and never uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    /// Local identifier of the owning session
    #[serde(rename = "offline_id")]
    pub local_id: LocalId,
    /// Countdown start (Unix ms)
    pub starting_time: i64,
}

impl Clock {
    /// Start a countdown for the given session now
    #[must_use]
    pub fn start(local_id: LocalId) -> Self {
        Self {
            local_id,
            starting_time: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Instant (Unix ms) the countdown of `countdown` length ends.
    pub fn ends_at(&self, countdown: chrono::Duration) -> i64 {
        self.starting_time
            .saturating_add(countdown.num_milliseconds())
    }
}
