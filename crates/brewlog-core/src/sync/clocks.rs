//! Brewing clocks: persistence and expiry sweep

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::models::{Clock, Entity, LocalId};
use crate::store::{load_list, save_list, LocalStore, CLOCKS_KEY};

/// Result of sweeping the persisted clocks against a session collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockSweep {
    /// Clocks still counting down, or whose session is unknown
    pub retained: Vec<Clock>,
    /// Sessions whose countdown finished
    pub expired: HashSet<LocalId>,
}

/// Split `clocks` into those still running and the sessions they finished.
///
/// A clock whose session is not in `sessions`, or whose session has no
/// usable brewing time, is retained untouched.
pub fn sweep_clocks<E: Entity>(clocks: &[Clock], sessions: &[E], now_ms: i64) -> ClockSweep {
    let mut sweep = ClockSweep::default();
    for clock in clocks {
        let countdown = sessions
            .iter()
            .find(|session| session.local_id() == Some(clock.local_id))
            .and_then(Entity::infusion_countdown);
        match countdown {
            Some(countdown) if now_ms >= clock.ends_at(countdown) => {
                sweep.expired.insert(clock.local_id);
            }
            _ => sweep.retained.push(*clock),
        }
    }
    sweep
}

/// Sweep the persisted clocks and write back the ones still running.
pub(crate) async fn sweep_persisted_clocks<E, S>(
    store: &S,
    sessions: &[E],
    now_ms: i64,
) -> Result<ClockSweep>
where
    E: Entity,
    S: LocalStore,
{
    let Some(clocks) = load_list::<Clock, _>(store, CLOCKS_KEY).await? else {
        return Ok(ClockSweep::default());
    };
    let sweep = sweep_clocks(&clocks, sessions, now_ms);
    if !sweep.expired.is_empty() {
        debug!(expired = sweep.expired.len(), "Brewing clocks finished");
        save_list(store, CLOCKS_KEY, &sweep.retained).await?;
    }
    Ok(sweep)
}

/// Persisted clocks, empty when none were ever started.
pub async fn load_clocks<S: LocalStore>(store: &S) -> Result<Vec<Clock>> {
    Ok(load_list(store, CLOCKS_KEY).await?.unwrap_or_default())
}

/// Start (or restart) the countdown of session `local_id` at `starting_time`.
pub async fn start_clock<S: LocalStore>(
    store: &S,
    local_id: LocalId,
    starting_time: i64,
) -> Result<Clock> {
    let mut clocks = load_clocks(store).await?;
    clocks.retain(|clock| clock.local_id != local_id);
    let clock = Clock {
        local_id,
        starting_time,
    };
    clocks.push(clock);
    save_list(store, CLOCKS_KEY, &clocks).await?;
    Ok(clock)
}

/// Stop the countdown of session `local_id`. Returns whether one was running.
pub async fn cancel_clock<S: LocalStore>(store: &S, local_id: LocalId) -> Result<bool> {
    let mut clocks = load_clocks(store).await?;
    let before = clocks.len();
    clocks.retain(|clock| clock.local_id != local_id);
    if clocks.len() == before {
        return Ok(false);
    }
    save_list(store, CLOCKS_KEY, &clocks).await?;
    Ok(true)
}
