//! Local persistent store used by the sync core.
//!
//! The core only needs async get/set of JSON values by string key. Keys:
//! `offline-<kind>s` (pending entries), `<kind>s` (confirmed cache) and
//! `clocks`. See [`crate::models::EntityKind`] for the exact spellings.

mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

pub use memory::MemoryStore;

/// Store key holding running brewing clocks
pub const CLOCKS_KEY: &str = "clocks";

/// Store key holding the read-only category list
pub const CATEGORIES_KEY: &str = "categories";

/// Trait for key/value persistence (async)
#[allow(async_fn_in_trait)]
pub trait LocalStore {
    /// Read the value stored under `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`, returning it
    async fn set(&self, key: &str, value: Value) -> Result<Value>;
}

/// Load a typed list stored under `key`, `None` when the key is absent.
///
/// A stored `null` counts as absent.
pub async fn load_list<T, S>(store: &S, key: &str) -> Result<Option<Vec<T>>>
where
    T: DeserializeOwned,
    S: LocalStore,
{
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Replace the list stored under `key`.
pub async fn save_list<T, S>(store: &S, key: &str, items: &[T]) -> Result<()>
where
    T: Serialize,
    S: LocalStore,
{
    store.set(key, serde_json::to_value(items)?).await?;
    Ok(())
}
