//! Uploading entities and draining the pending lists

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gateway::{endpoint_for, GatewayResponse, Method, RemoteGateway};
use crate::models::{BrewingSession, Entity, LocalId, Tea};
use crate::store::{load_list, save_list, LocalStore};

/// Identity keys never sent to the server.
const IDENTITY_FIELDS: [&str; 2] = ["id", "offline_id"];

/// Request body for `entity`.
///
/// Identity fields are always removed. With `strip_binary` the kind's binary
/// fields are removed too, so an update never re-sends image data.
pub fn request_body<E: Entity>(entity: &E, strip_binary: bool) -> Result<String> {
    let mut value = serde_json::to_value(entity)?;
    if let Value::Object(fields) = &mut value {
        for field in IDENTITY_FIELDS {
            fields.remove(field);
        }
        if strip_binary {
            for field in E::KIND.binary_fields() {
                fields.remove(*field);
            }
        }
    }
    Ok(serde_json::to_string(&value)?)
}

/// Send one entity to the server.
///
/// With a `server_id` this is an update (`PUT /<kind>/<id>/`, binary fields
/// stripped), otherwise a creation (`POST /<kind>/`). Gateway failures are
/// returned as [`Error::Rejected`] or [`Error::Unreachable`].
pub async fn upload_instance<E, G>(
    gateway: &G,
    entity: &E,
    server_id: Option<&str>,
) -> Result<GatewayResponse>
where
    E: Entity,
    G: RemoteGateway,
{
    let (endpoint, method, body) = match server_id {
        Some(id) => (
            endpoint_for(E::KIND, Some(id)),
            Method::Put,
            request_body(entity, true)?,
        ),
        None => (
            endpoint_for(E::KIND, None),
            Method::Post,
            request_body(entity, false)?,
        ),
    };
    debug!(kind = %E::KIND, %method, endpoint = %endpoint, "Uploading entity");
    Ok(gateway.request(&endpoint, method, Some(body)).await?)
}

/// Outcome of a pending-list drain that left nothing queued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfflineUploadReport {
    /// Entries the server accepted
    pub uploaded: usize,
    /// Entries the server rejected, dropped from the queue
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub local_id: Option<LocalId>,
    pub detail: String,
}

/// Upload every pending entry of kind `E`.
///
/// All uploads run concurrently and every one is allowed to settle. Entries
/// the server accepted or rejected leave the pending list; entries that hit a
/// network failure stay queued. Accepted entries are recorded in the
/// confirmed cache under their local id.
///
/// # Errors
///
/// [`Error::UploadIncomplete`] when anything is still queued afterwards, or
/// the store error when the pending list could not be read or written.
pub async fn upload_offline<E, S, G>(store: &S, gateway: &G) -> Result<OfflineUploadReport>
where
    E: Entity,
    S: LocalStore,
    G: RemoteGateway,
{
    let kind = E::KIND;
    let Some(pending) = load_list::<E, _>(store, kind.offline_key()).await? else {
        debug!(%kind, "No pending list");
        return Ok(OfflineUploadReport::default());
    };

    let attempts = pending.iter().map(|entity| async move {
        let outcome = upload_instance(gateway, entity, entity.server_id()).await;
        (entity, outcome)
    });
    let settled = join_all(attempts).await;

    let mut report = OfflineUploadReport::default();
    let mut still_pending = Vec::new();
    let mut confirmed = Vec::new();
    let mut last_failure = None;

    for (entity, outcome) in settled {
        match outcome {
            Ok(response) => {
                report.uploaded += 1;
                if let Some(entity) = confirmed_entity(entity, &response) {
                    confirmed.push(entity);
                }
            }
            Err(Error::Rejected { detail, .. }) => {
                warn!(%kind, local_id = ?entity.local_id(), %detail, "Pending entry rejected, dropping it");
                last_failure = Some(detail.clone());
                report.rejected.push(Rejection {
                    local_id: entity.local_id(),
                    detail,
                });
            }
            Err(error) => {
                debug!(%kind, local_id = ?entity.local_id(), error = %error, "Pending entry kept for retry");
                last_failure = Some(error.to_string());
                still_pending.push(entity.clone());
            }
        }
    }

    save_list(store, kind.offline_key(), &still_pending).await?;

    if let Err(error) = upsert_confirmed(store, &confirmed).await {
        warn!(%kind, error = %error, "Failed to record uploaded entries in cache");
    }

    if still_pending.is_empty() {
        info!(%kind, uploaded = report.uploaded, rejected = report.rejected.len(), "Pending list drained");
        Ok(report)
    } else {
        Err(Error::UploadIncomplete {
            kind,
            pending: still_pending.len(),
            reason: last_failure.unwrap_or_default(),
        })
    }
}

/// Server's copy of an uploaded entity, carrying over the local id.
pub(crate) fn confirmed_entity<E: Entity>(sent: &E, response: &GatewayResponse) -> Option<E> {
    match response.json::<E>() {
        Ok(mut confirmed) => {
            if let Some(local_id) = sent.local_id() {
                confirmed.set_local_id(local_id);
            }
            Some(confirmed)
        }
        Err(error) => {
            debug!(kind = %E::KIND, error = %error, "Upload response carried no entity");
            None
        }
    }
}

/// Insert or replace entries of the confirmed cache, matched by local id.
pub(crate) async fn upsert_confirmed<E, S>(store: &S, entities: &[E]) -> Result<()>
where
    E: Entity,
    S: LocalStore,
{
    if entities.is_empty() {
        return Ok(());
    }
    let key = E::KIND.cache_key();
    let mut cached = load_list::<E, _>(store, key).await?.unwrap_or_default();
    for entity in entities {
        let slot = cached.iter_mut().find(|item| {
            item.local_id().is_some() && item.local_id() == entity.local_id()
        });
        match slot {
            Some(slot) => *slot = entity.clone(),
            None => cached.push(entity.clone()),
        }
    }
    save_list(store, key, &cached).await
}

/// Remove the pending entry with `local_id`, reading the list fresh.
pub(crate) async fn remove_pending<E, S>(store: &S, local_id: LocalId) -> Result<()>
where
    E: Entity,
    S: LocalStore,
{
    let key = E::KIND.offline_key();
    let Some(mut pending) = load_list::<E, _>(store, key).await? else {
        return Ok(());
    };
    let before = pending.len();
    pending.retain(|entity| entity.local_id() != Some(local_id));
    if pending.len() != before {
        save_list(store, key, &pending).await?;
    }
    Ok(())
}

/// Pending entries of kind `E`.
///
/// An absent key is initialized to an empty list.
pub async fn get_offline<E, S>(store: &S) -> Result<Vec<E>>
where
    E: Entity,
    S: LocalStore,
{
    let key = E::KIND.offline_key();
    if let Some(pending) = load_list(store, key).await? {
        return Ok(pending);
    }
    save_list::<E, _>(store, key, &[]).await?;
    Ok(Vec::new())
}

pub async fn get_offline_teas<S: LocalStore>(store: &S) -> Result<Vec<Tea>> {
    get_offline(store).await
}

pub async fn get_offline_sessions<S: LocalStore>(store: &S) -> Result<Vec<BrewingSession>> {
    get_offline(store).await
}
