//! libSQL-backed local store

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use super::Database;
use crate::error::Result;
use crate::store::LocalStore;

/// Durable `LocalStore` persisting JSON documents in the `kv` table.
#[derive(Clone)]
pub struct LibSqlStore {
    db: Arc<Mutex<Database>>,
}

impl LibSqlStore {
    /// Open (or create) the store at the given filesystem path.
    pub async fn open_path(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Opening local store at {}", db_path.display());
        Ok(Self::from_database(Database::open(db_path).await?))
    }

    /// Open an in-memory store (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory().await?))
    }

    fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }
}

impl LocalStore for LibSqlStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let db = self.db.lock().await;
        let mut rows = db
            .connection()
            .query("SELECT value FROM kv WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let raw: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&raw)?))
        } else {
            Ok(None)
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<Value> {
        let raw = serde_json::to_string(&value)?;
        let now = chrono::Utc::now().timestamp_millis();
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, ?)",
                libsql::params![key, raw, now],
            )
            .await?;
        Ok(value)
    }
}
