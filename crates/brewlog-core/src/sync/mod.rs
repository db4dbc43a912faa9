//! Offline-first synchronization of the catalogue collections.
//!
//! Every collection lives in three places: the in-memory [`Collection`] the
//! UI renders, the confirmed cache (last state the server agreed to) and the
//! pending list (entries created or edited while the server was
//! unreachable). Entities are identified on this device by a [`LocalId`]
//! that survives refreshes, independently of the server identifier.
//!
//! [`LocalId`]: crate::models::LocalId

mod categories;
mod clocks;
mod collection;
mod editor;
mod identity;
mod reconcile;
mod reducer;
mod upload;

pub use categories::{load_categories, refresh_categories};
pub use clocks::{cancel_clock, load_clocks, start_clock, sweep_clocks, ClockSweep};
pub use collection::{Collection, SyncTicket};
pub use editor::{delete_instance, save_instance, SaveOutcome};
pub use identity::{next_local_id, next_local_id_after};
pub use reconcile::{local_view, sync_instances, SyncReport};
pub use reducer::{reduce, Action, Dispatch};
pub use upload::{
    get_offline, get_offline_sessions, get_offline_teas, request_body, upload_instance,
    upload_offline, OfflineUploadReport, Rejection,
};
