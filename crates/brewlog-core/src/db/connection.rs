//! Local database connection management

use crate::error::Result;
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::Path;

use super::migrations;

/// Database wrapper for the libSQL file backing the local store
pub struct Database {
    _db: LibSqlDatabase,
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let db = Builder::new_local(&path_str).build().await?;
        let conn = db.connect()?;

        let database = Self { _db: db, conn };
        database.configure().await?;
        database.migrate().await?;
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        let database = Self { _db: db, conn };
        database.configure().await?;
        database.migrate().await?;
        Ok(database)
    }

    async fn configure(&self) -> Result<()> {
        // WAL is unavailable for in-memory databases
        self.conn
            .execute("PRAGMA journal_mode = WAL;", ())
            .await
            .ok();
        self.conn
            .execute("PRAGMA synchronous = NORMAL;", ())
            .await
            .ok();
        Ok(())
    }

    async fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn).await
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
