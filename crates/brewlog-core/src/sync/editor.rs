//! Saving and deleting entities from edit flows

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gateway::{endpoint_for, Method, RemoteGateway};
use crate::models::{Entity, LocalId};
use crate::store::{load_list, save_list, LocalStore};

use super::clocks::cancel_clock;
use super::collection::Collection;
use super::identity::next_local_id_after;
use super::reducer::{Action, Dispatch};
use super::upload::{confirmed_entity, get_offline, remove_pending, upload_instance, upsert_confirmed};

/// How a save ended when the entity was kept.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<E> {
    /// The server accepted the entity
    Synced(E),
    /// The server could not be reached, the entity waits in the pending list
    SavedLocally { entity: E, reason: String },
}

impl<E> SaveOutcome<E> {
    pub const fn entity(&self) -> &E {
        match self {
            Self::Synced(entity) | Self::SavedLocally { entity, .. } => entity,
        }
    }

    pub fn into_entity(self) -> E {
        match self {
            Self::Synced(entity) | Self::SavedLocally { entity, .. } => entity,
        }
    }

    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

/// Create (`local_id` `None`) or edit an entity.
///
/// The collection is updated optimistically and the entity is queued in the
/// pending list before the upload is attempted. On success the queued copy
/// is replaced by the server's copy, which also enters the confirmed cache.
/// When the server is unreachable the entity stays queued.
///
/// # Errors
///
/// [`Error::Rejected`] when the server refused the entity; it is dropped from
/// the pending list but stays in the collection for the user to fix. Store
/// failures are returned as-is.
pub async fn save_instance<E, S, G>(
    store: &S,
    gateway: &G,
    collection: &Collection<E>,
    mut entity: E,
    local_id: Option<LocalId>,
) -> Result<SaveOutcome<E>>
where
    E: Entity,
    S: LocalStore,
    G: RemoteGateway,
{
    let kind = E::KIND;
    let mut pending = get_offline::<E, _>(store).await?;

    let local_id = if let Some(local_id) = local_id {
        entity.set_local_id(local_id);
        if entity.server_id().is_none() {
            let known = collection
                .find(local_id)
                .and_then(|existing| existing.server_id().map(str::to_owned));
            if let Some(server_id) = known {
                entity.set_server_id(server_id);
            }
        }
        collection.dispatch(Action::Edit(entity.clone()));
        local_id
    } else {
        let cached = load_list::<E, _>(store, kind.cache_key())
            .await?
            .unwrap_or_default();
        let local_id = next_local_id_after(
            collection
                .snapshot()
                .iter()
                .chain(pending.iter())
                .chain(cached.iter())
                .filter_map(Entity::local_id),
        );
        entity.set_local_id(local_id);
        collection.dispatch(Action::Add(entity.clone()));
        local_id
    };

    pending.retain(|queued| queued.local_id() != Some(local_id));
    pending.push(entity.clone());
    save_list(store, kind.offline_key(), &pending).await?;

    match upload_instance(gateway, &entity, entity.server_id()).await {
        Ok(response) => {
            let confirmed = confirmed_entity(&entity, &response).unwrap_or_else(|| {
                warn!(%kind, %local_id, "Upload response unreadable, keeping local copy");
                entity.clone()
            });
            collection.dispatch(Action::Edit(confirmed.clone()));
            remove_pending::<E, _>(store, local_id).await?;
            upsert_confirmed(store, std::slice::from_ref(&confirmed)).await?;
            info!(%kind, %local_id, "Entity saved");
            Ok(SaveOutcome::Synced(confirmed))
        }
        Err(Error::Rejected { status, detail }) => {
            warn!(%kind, %local_id, %detail, "Entity rejected by server");
            remove_pending::<E, _>(store, local_id).await?;
            Err(Error::Rejected { status, detail })
        }
        Err(error) => {
            info!(%kind, %local_id, error = %error, "Entity saved locally");
            Ok(SaveOutcome::SavedLocally {
                entity,
                reason: error.to_string(),
            })
        }
    }
}

/// Delete an entity everywhere it is known.
///
/// Entities with a server id are deleted remotely first; a failed remote
/// delete leaves local state untouched. Pending copies, cached copies and
/// brewing clocks are then dropped and the collection is updated.
pub async fn delete_instance<E, S, G>(
    store: &S,
    gateway: &G,
    collection: &Collection<E>,
    entity: &E,
) -> Result<()>
where
    E: Entity,
    S: LocalStore,
    G: RemoteGateway,
{
    let kind = E::KIND;
    if let Some(server_id) = entity.server_id() {
        gateway
            .request(&endpoint_for(kind, Some(server_id)), Method::Delete, None)
            .await?;
        debug!(%kind, server_id, "Deleted remote entity");

        let key = kind.cache_key();
        if let Some(mut cached) = load_list::<E, _>(store, key).await? {
            cached.retain(|item| item.server_id() != Some(server_id));
            save_list(store, key, &cached).await?;
        }
    }

    if let Some(local_id) = entity.local_id() {
        remove_pending::<E, _>(store, local_id).await?;
        if kind.has_clocks() {
            cancel_clock(store, local_id).await?;
        }
    }

    collection.dispatch(Action::Delete(entity.clone()));
    info!(%kind, local_id = ?entity.local_id(), "Entity deleted");
    Ok(())
}
