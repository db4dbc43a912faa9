//! Catalogue service tying the collections, the store and the gateway together.

use std::sync::{Mutex, PoisonError};

use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::gateway::RemoteGateway;
use crate::models::{
    BrewingSession, Category, Clock, Entity, EntityKind, LocalId, Subcategory, Tea, Vendor,
};
use crate::state::SyncState;
use crate::store::LocalStore;
use crate::sync::{
    self, Action, Collection, Dispatch, OfflineUploadReport, Rejection, SaveOutcome, SyncReport,
};
use crate::util::unix_millis_now;

/// Outcome of a full sync across every collection.
#[derive(Debug, Default)]
pub struct SyncAllReport {
    /// Pending entries the server accepted
    pub uploaded: usize,
    /// Pending entries the server rejected and that were dropped
    pub rejected: Vec<(EntityKind, Rejection)>,
    /// Entries still queued per collection
    pub still_pending: Vec<(EntityKind, usize)>,
    pub synced: Vec<(EntityKind, SyncReport)>,
    /// Collections whose sync failed locally
    pub failures: Vec<(EntityKind, String)>,
    /// Number of categories known after the refresh
    pub categories: Option<usize>,
}

impl SyncAllReport {
    /// State a client should display after this sync.
    pub fn state(&self) -> SyncState {
        if !self.failures.is_empty() {
            SyncState::Error
        } else if !self.still_pending.is_empty()
            || self.synced.iter().any(|(_, report)| !report.reached_server())
        {
            SyncState::Offline
        } else {
            SyncState::Synced
        }
    }
}

/// Thread-safe entry point for clients.
pub struct CatalogService<S, G> {
    store: S,
    gateway: G,
    teas: Collection<Tea>,
    sessions: Collection<BrewingSession>,
    vendors: Collection<Vendor>,
    subcategories: Collection<Subcategory>,
    state: Mutex<SyncState>,
}

impl<S, G> CatalogService<S, G>
where
    S: LocalStore,
    G: RemoteGateway,
{
    pub fn new(store: S, gateway: G) -> Self {
        Self {
            store,
            gateway,
            teas: Collection::new(),
            sessions: Collection::new(),
            vendors: Collection::new(),
            subcategories: Collection::new(),
            state: Mutex::new(SyncState::default()),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    pub const fn teas(&self) -> &Collection<Tea> {
        &self.teas
    }

    pub const fn sessions(&self) -> &Collection<BrewingSession> {
        &self.sessions
    }

    pub const fn vendors(&self) -> &Collection<Vendor> {
        &self.vendors
    }

    pub const fn subcategories(&self) -> &Collection<Subcategory> {
        &self.subcategories
    }

    /// Current sync state.
    pub fn sync_state(&self) -> SyncState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_sync_state(&self, state: SyncState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Reconcile one collection with the server.
    pub async fn sync(&self, kind: EntityKind) -> Result<SyncReport> {
        match kind {
            EntityKind::Tea => self.sync_collection(&self.teas).await,
            EntityKind::Session => self.sync_collection(&self.sessions).await,
            EntityKind::Vendor => self.sync_collection(&self.vendors).await,
            EntityKind::Subcategory => self.sync_collection(&self.subcategories).await,
        }
    }

    async fn sync_collection<E: Entity>(&self, collection: &Collection<E>) -> Result<SyncReport> {
        let ticket = collection.begin_sync();
        sync::sync_instances::<E, _, _, _>(&self.store, &self.gateway, &ticket).await
    }

    /// Fill one collection from the store alone.
    pub async fn load_local(&self, kind: EntityKind) -> Result<usize> {
        match kind {
            EntityKind::Tea => self.load_local_into(&self.teas).await,
            EntityKind::Session => self.load_local_into(&self.sessions).await,
            EntityKind::Vendor => self.load_local_into(&self.vendors).await,
            EntityKind::Subcategory => self.load_local_into(&self.subcategories).await,
        }
    }

    async fn load_local_into<E: Entity>(&self, collection: &Collection<E>) -> Result<usize> {
        let items = sync::local_view::<E, _>(&self.store).await?;
        let count = items.len();
        collection.dispatch(Action::Set(items));
        Ok(count)
    }

    /// Upload the pending entries of one collection.
    pub async fn upload(&self, kind: EntityKind) -> Result<OfflineUploadReport> {
        match kind {
            EntityKind::Tea => sync::upload_offline::<Tea, _, _>(&self.store, &self.gateway).await,
            EntityKind::Session => {
                sync::upload_offline::<BrewingSession, _, _>(&self.store, &self.gateway).await
            }
            EntityKind::Vendor => {
                sync::upload_offline::<Vendor, _, _>(&self.store, &self.gateway).await
            }
            EntityKind::Subcategory => {
                sync::upload_offline::<Subcategory, _, _>(&self.store, &self.gateway).await
            }
        }
    }

    /// Number of pending entries of one collection.
    pub async fn pending_count(&self, kind: EntityKind) -> Result<usize> {
        Ok(match kind {
            EntityKind::Tea => sync::get_offline::<Tea, _>(&self.store).await?.len(),
            EntityKind::Session => sync::get_offline::<BrewingSession, _>(&self.store).await?.len(),
            EntityKind::Vendor => sync::get_offline::<Vendor, _>(&self.store).await?.len(),
            EntityKind::Subcategory => sync::get_offline::<Subcategory, _>(&self.store).await?.len(),
        })
    }

    /// Upload every pending list, then refresh every collection and the categories.
    ///
    /// Each collection is handled independently; a failure in one is recorded
    /// in the report and never stops the others.
    pub async fn sync_all(&self) -> SyncAllReport {
        self.set_sync_state(SyncState::Syncing);
        let mut report = SyncAllReport::default();

        for kind in EntityKind::ALL {
            match self.upload(kind).await {
                Ok(upload) => {
                    report.uploaded += upload.uploaded;
                    report
                        .rejected
                        .extend(upload.rejected.into_iter().map(|rejection| (kind, rejection)));
                }
                Err(Error::UploadIncomplete { pending, .. }) => {
                    report.still_pending.push((kind, pending));
                }
                Err(error) => {
                    error!(%kind, error = %error, "Upload of pending entries failed");
                    report.failures.push((kind, error.to_string()));
                }
            }
        }

        for kind in EntityKind::ALL {
            match self.sync(kind).await {
                Ok(synced) => report.synced.push((kind, synced)),
                Err(error) => {
                    error!(%kind, error = %error, "Sync failed");
                    report.failures.push((kind, error.to_string()));
                }
            }
        }

        match sync::refresh_categories(&self.store, &self.gateway).await {
            Ok(categories) => report.categories = Some(categories.len()),
            Err(error) => warn!(error = %error, "Category refresh failed"),
        }

        let state = report.state();
        self.set_sync_state(state);
        info!(
            %state,
            uploaded = report.uploaded,
            rejected = report.rejected.len(),
            "Full sync finished"
        );
        report
    }

    async fn save_in<E: Entity>(
        &self,
        collection: &Collection<E>,
        entity: E,
        local_id: Option<LocalId>,
    ) -> Result<SaveOutcome<E>> {
        let outcome =
            sync::save_instance(&self.store, &self.gateway, collection, entity, local_id).await;
        match &outcome {
            Ok(SaveOutcome::Synced(_)) => self.set_sync_state(SyncState::Synced),
            Ok(SaveOutcome::SavedLocally { .. }) => self.set_sync_state(SyncState::Offline),
            Err(Error::Rejected { .. }) => {}
            Err(_) => self.set_sync_state(SyncState::Error),
        }
        outcome
    }

    /// Create a tea, or edit the one with `local_id`.
    pub async fn save_tea(&self, tea: Tea, local_id: Option<LocalId>) -> Result<SaveOutcome<Tea>> {
        self.save_in(&self.teas, tea, local_id).await
    }

    pub async fn save_session(
        &self,
        session: BrewingSession,
        local_id: Option<LocalId>,
    ) -> Result<SaveOutcome<BrewingSession>> {
        self.save_in(&self.sessions, session, local_id).await
    }

    pub async fn save_vendor(
        &self,
        vendor: Vendor,
        local_id: Option<LocalId>,
    ) -> Result<SaveOutcome<Vendor>> {
        self.save_in(&self.vendors, vendor, local_id).await
    }

    pub async fn save_subcategory(
        &self,
        subcategory: Subcategory,
        local_id: Option<LocalId>,
    ) -> Result<SaveOutcome<Subcategory>> {
        self.save_in(&self.subcategories, subcategory, local_id).await
    }

    async fn delete_in<E: Entity>(&self, collection: &Collection<E>, local_id: LocalId) -> Result<()> {
        let entity = collection
            .find(local_id)
            .ok_or_else(|| Error::NotFound(format!("{} {local_id}", E::KIND)))?;
        sync::delete_instance(&self.store, &self.gateway, collection, &entity).await
    }

    /// Delete the entity with `local_id` from one collection.
    pub async fn delete(&self, kind: EntityKind, local_id: LocalId) -> Result<()> {
        match kind {
            EntityKind::Tea => self.delete_in(&self.teas, local_id).await,
            EntityKind::Session => self.delete_in(&self.sessions, local_id).await,
            EntityKind::Vendor => self.delete_in(&self.vendors, local_id).await,
            EntityKind::Subcategory => self.delete_in(&self.subcategories, local_id).await,
        }
    }

    /// Start the infusion countdown of a known session.
    pub async fn start_clock(&self, local_id: LocalId) -> Result<Clock> {
        if self.sessions.find(local_id).is_none() {
            return Err(Error::NotFound(format!("session {local_id}")));
        }
        sync::start_clock(&self.store, local_id, unix_millis_now()).await
    }

    pub async fn cancel_clock(&self, local_id: LocalId) -> Result<bool> {
        sync::cancel_clock(&self.store, local_id).await
    }

    pub async fn clocks(&self) -> Result<Vec<Clock>> {
        sync::load_clocks(&self.store).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        sync::load_categories(&self.store, &self.gateway).await
    }
}
