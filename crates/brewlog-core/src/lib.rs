//! brewlog-core - Core library for Brewlog
//!
//! This crate contains the catalogue models, the local store, the remote API
//! gateway and the offline-first sync logic used by every Brewlog interface.

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Entity, EntityKind, LocalId};
pub use services::CatalogService;
pub use state::SyncState;
