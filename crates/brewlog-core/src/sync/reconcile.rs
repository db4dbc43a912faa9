//! Reconciliation of local state with the remote collection

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::gateway::{endpoint_for, Method, RemoteGateway};
use crate::models::{Entity, LocalId};
use crate::store::{load_list, save_list, LocalStore};

use super::clocks::sweep_persisted_clocks;
use super::identity::next_local_id_after;
use super::reducer::{Action, Dispatch};

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries shown before the network round trip
    pub local: usize,
    /// Entries received from the server, `None` when it was unreachable
    pub remote: Option<usize>,
    /// Sessions whose brewing clock finished during this pass
    pub expired_clocks: usize,
    /// Set when a newer sync of the same collection superseded this one
    pub superseded: bool,
}

impl SyncReport {
    pub const fn reached_server(&self) -> bool {
        self.remote.is_some()
    }
}

struct LocalState<E> {
    offline: Vec<E>,
    /// Confirmed cache minus entries superseded by a pending copy
    cached: Vec<E>,
}

async fn read_local_state<E, S>(store: &S) -> Result<LocalState<E>>
where
    E: Entity,
    S: LocalStore,
{
    let kind = E::KIND;
    let offline: Vec<E> = load_list(store, kind.offline_key())
        .await?
        .unwrap_or_default();
    let offline_ids: HashSet<LocalId> = offline.iter().filter_map(Entity::local_id).collect();

    let mut cached: Vec<E> = load_list(store, kind.cache_key())
        .await?
        .unwrap_or_default();
    cached.retain(|entity| {
        entity
            .local_id()
            .is_none_or(|local_id| !offline_ids.contains(&local_id))
    });

    Ok(LocalState { offline, cached })
}

/// Best local state of kind `E` without contacting the server.
///
/// Pending entries come first, followed by the confirmed cache.
pub async fn local_view<E, S>(store: &S) -> Result<Vec<E>>
where
    E: Entity,
    S: LocalStore,
{
    let LocalState { offline, cached } = read_local_state::<E, _>(store).await?;
    Ok(offline.into_iter().chain(cached).collect())
}

/// Reconcile the collection of kind `E` with the server.
///
/// Dispatches the cached state right away (pending entries first), then
/// fetches the remote collection, merges it and dispatches the result.
/// Pending entries win over their server copies and remote entities keep the
/// local id of the local entry with the same server id. The merged remote
/// set replaces the confirmed cache.
///
/// For sessions the persisted brewing clocks are swept first and finished
/// countdowns advance their session's infusion counter.
///
/// An unreachable server is not an error: the cached state stays displayed
/// and the report's `remote` is `None`.
pub async fn sync_instances<E, S, G, D>(store: &S, gateway: &G, dispatch: &D) -> Result<SyncReport>
where
    E: Entity,
    S: LocalStore,
    G: RemoteGateway,
    D: Dispatch<E>,
{
    let kind = E::KIND;
    let LocalState {
        mut offline,
        mut cached,
    } = read_local_state::<E, _>(store).await?;

    let mut expired = HashSet::new();
    if kind.has_clocks() {
        let candidates: Vec<E> = offline.iter().chain(cached.iter()).cloned().collect();
        let now_ms = crate::util::unix_millis_now();
        expired = sweep_persisted_clocks(store, &candidates, now_ms)
            .await?
            .expired;
        for entity in offline.iter_mut().chain(cached.iter_mut()) {
            if entity.local_id().is_some_and(|id| expired.contains(&id)) {
                entity.advance_infusion();
            }
        }
    }

    let locals: Vec<E> = offline.iter().chain(cached.iter()).cloned().collect();
    let mut report = SyncReport {
        local: locals.len(),
        expired_clocks: expired.len(),
        ..SyncReport::default()
    };
    dispatch.dispatch(Action::Set(locals.clone()));

    let response = match gateway
        .request(&endpoint_for(kind, None), Method::Get, None)
        .await
    {
        Ok(response) => response,
        Err(error) => {
            warn!(%kind, error = %error, "Sync failed, showing cached state");
            return Ok(report);
        }
    };
    let remote: Vec<E> = response.json::<Option<Vec<E>>>()?.unwrap_or_default();
    report.remote = Some(remote.len());

    let offline_server_ids: HashSet<&str> =
        offline.iter().filter_map(Entity::server_id).collect();
    let mut online: Vec<E> = Vec::with_capacity(remote.len());

    for mut entity in remote {
        if entity
            .server_id()
            .is_some_and(|id| offline_server_ids.contains(id))
        {
            debug!(%kind, server_id = ?entity.server_id(), "Pending edit supersedes remote entry");
            continue;
        }

        let carried = entity.server_id().and_then(|server_id| {
            locals
                .iter()
                .find(|local| local.server_id() == Some(server_id))
                .and_then(Entity::local_id)
        });
        let local_id = carried.unwrap_or_else(|| {
            next_local_id_after(
                locals
                    .iter()
                    .chain(online.iter())
                    .filter_map(Entity::local_id),
            )
        });
        entity.set_local_id(local_id);
        if expired.contains(&local_id) {
            entity.advance_infusion();
        }
        online.push(entity);
    }

    if !dispatch.is_current() {
        debug!(%kind, "Sync superseded, discarding merged result");
        report.superseded = true;
        return Ok(report);
    }

    let merged: Vec<E> = offline.iter().chain(online.iter()).cloned().collect();
    dispatch.dispatch(Action::Set(merged));
    save_list(store, kind.cache_key(), &online).await?;

    info!(
        %kind,
        pending = offline.len(),
        remote = online.len(),
        "Collection synced"
    );
    Ok(report)
}
