//! Connection ownership and user rows.

use crate::error::{StorageError, StorageResult};
use crate::schema;
use lexis_types::UserId;
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// SQLite-backed entity store.
///
/// Cloning shares the underlying connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened entity store");
        Self::from_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Runs `f` against the connection outside any explicit transaction.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Runs `f` in a transaction. Commits on `Ok`; an `Err` drops the
    /// transaction, which rolls it back.
    pub fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    // ── Users ────────────────────────────────────────────────────

    /// Inserts a user and returns its id.
    pub fn create_user(&self, email: &str, name: &str) -> StorageResult<UserId> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (email, name) VALUES (?1, ?2)",
            params![email, name],
        )?;
        let id = UserId::new(conn.last_insert_rowid())
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;
        debug!(user = %id, "Created user");
        Ok(id)
    }

    /// Counts rows in one of the entity tables.
    pub fn count_rows(&self, table: &str) -> StorageResult<u64> {
        if !matches!(table, "users" | "vocabulary" | "resource_class" | "property") {
            return Err(StorageError::InvalidQuery(format!("unknown table '{table}'")));
        }
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(count as u64)
    }
}
