//! Services shared across clients.

mod catalog;

pub use catalog::{CatalogService, SyncAllReport};
