//! Bounded SQLite connection pool.
//!
//! # Responsibility
//! - Build an `r2d2` pool whose connections share the bootstrap settings of
//!   `open_db`.
//! - Run schema migrations once, before the pool is handed to callers.
//!
//! # Invariants
//! - Checkouts wait at most `RegistryConfig::checkout_timeout`.
//! - In-memory pools hold exactly one connection that is never recycled;
//!   recycling it would discard the database.

use super::migrations::ensure_schema;
use super::open::configure_connection;
use super::DbResult;
use crate::config::{RegistryConfig, StorageLocation};
use log::{error, info};
use r2d2_sqlite::SqliteConnectionManager;
use std::time::Instant;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Builds a configured, migrated connection pool.
///
/// # Side effects
/// - Opens `effective_pool_size()` connections eagerly.
/// - Emits `pool_open` logging events with duration and status.
///
/// # Errors
/// - Returns `DbError::Pool` when connections cannot be established in time.
/// - Returns schema errors from `ensure_schema`.
pub fn create_pool(config: &RegistryConfig) -> DbResult<DbPool> {
    let started_at = Instant::now();
    let (manager, file_backed, mode) = match &config.storage {
        StorageLocation::File(path) => (SqliteConnectionManager::file(path), true, "file"),
        StorageLocation::Memory => (SqliteConnectionManager::memory(), false, "memory"),
    };
    let pool_size = config.effective_pool_size();
    info!("event=pool_open module=db status=start mode={mode} size={pool_size}");

    let manager = manager.with_init(move |conn| configure_connection(conn, file_backed));
    let mut builder = r2d2::Pool::builder()
        .max_size(pool_size)
        .connection_timeout(config.checkout_timeout);
    if !file_backed {
        builder = builder.max_lifetime(None).idle_timeout(None);
    }

    match build_migrated_pool(builder, manager) {
        Ok(pool) => {
            info!(
                "event=pool_open module=db status=ok mode={} size={} duration_ms={}",
                mode,
                pool_size,
                started_at.elapsed().as_millis()
            );
            Ok(pool)
        }
        Err(err) => {
            error!(
                "event=pool_open module=db status=error mode={} duration_ms={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn build_migrated_pool(
    builder: r2d2::Builder<SqliteConnectionManager>,
    manager: SqliteConnectionManager,
) -> DbResult<DbPool> {
    let pool = builder.build(manager)?;
    let mut conn = pool.get()?;
    ensure_schema(&mut conn)?;
    drop(conn);
    Ok(pool)
}
