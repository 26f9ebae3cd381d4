use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel::connection::SimpleConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use thiserror::Error;

use super::transaction::{Database, StoreTransaction};

/// Type alias for SQLite connection pool
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Type alias for pooled connection
pub type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Schema migrations compiled into the binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    ConnectionPoolError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Pending order not found: {0}")]
    RowNotFound(i64),

    #[error("Corrupt stored value: {0}")]
    CorruptValue(String),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

/// Per-connection SQLite settings applied whenever the pool hands out a connection
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// SQLite-backed store for pending orders and completed orders
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Wrap an existing pool. The schema is expected to be migrated already.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> Result<SqlitePooledConnection, DatabaseError> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::ConnectionPoolError(e.to_string()))
    }
}

impl Database for SqliteDatabase {
    fn transaction<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T, DatabaseError>,
    {
        let mut conn = self.get_conn()?;

        // IMMEDIATE takes the write lock up front so a second writer waits on
        // busy_timeout instead of failing at its first write
        conn.immediate_transaction(|conn| {
            let mut tx = SqliteTransaction { conn };
            f(&mut tx)
        })
    }
}

/// Open transaction on one pooled SQLite connection.
///
/// Repository implementations for this type live next to their traits in
/// `database::repositories`.
pub struct SqliteTransaction<'a> {
    pub(crate) conn: &'a mut SqliteConnection,
}

/// Establish the connection pool and bring the schema up to date
///
/// # Arguments
/// * `database_url` - SQLite file path, or `:memory:`
/// * `pool_size` - Maximum number of pooled connections (forced to 1 for `:memory:`)
/// * `connection_timeout` - How long to wait for a pooled connection or a locked database
///
/// # Returns
/// * `Result<SqliteDatabase, DatabaseError>` - Ready-to-use store or error
pub fn establish_connection_pool(
    database_url: &str,
    pool_size: u32,
    connection_timeout: Duration,
) -> Result<SqliteDatabase, DatabaseError> {
    tracing::info!("Establishing database connection pool for {}", database_url);

    // Every connection to :memory: is a separate database, so the pool has to
    // keep exactly one connection alive for the whole process
    let in_memory = database_url == ":memory:";
    let pool_size = if in_memory { 1 } else { pool_size.max(1) };

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = r2d2::Pool::builder()
        .max_size(pool_size)
        .connection_timeout(connection_timeout)
        .connection_customizer(Box::new(SqlitePragmas {
            busy_timeout: connection_timeout,
        }));
    if in_memory {
        builder = builder.min_idle(Some(1)).idle_timeout(None).max_lifetime(None);
    }

    let pool = builder
        .build(manager)
        .map_err(|e| DatabaseError::ConnectionPoolError(e.to_string()))?;

    tracing::info!("Database pool created with max size: {}", pool_size);

    let mut conn = pool
        .get()
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    tracing::info!("Database schema ready ({} migrations applied)", applied.len());

    Ok(SqliteDatabase::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::PendingOrderStore;
    use crate::models::NewOrder;
    use rust_decimal_macros::dec;

    #[test]
    fn test_in_memory_pool_keeps_schema() {
        let db = establish_connection_pool(":memory:", 8, Duration::from_secs(5)).unwrap();

        let id = db
            .transaction(|tx| tx.insert(&NewOrder::buy(dec!(1), dec!(1))))
            .unwrap();
        assert_eq!(id, 1);

        // Second checkout must see the same database
        let orders = db.transaction(|tx| tx.list_all_orders()).unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn test_file_pool_runs_migrations_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.db");
        let url = path.to_str().unwrap();

        let first = establish_connection_pool(url, 2, Duration::from_secs(5)).unwrap();
        first
            .transaction(|tx| tx.insert(&NewOrder::sell(dec!(2), dec!(3))))
            .unwrap();
        drop(first);

        // Reopening an existing file must not re-run or fail migrations
        let second = establish_connection_pool(url, 2, Duration::from_secs(5)).unwrap();
        let orders = second.transaction(|tx| tx.list_all_orders()).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].seller_qty, dec!(2));
    }
}
