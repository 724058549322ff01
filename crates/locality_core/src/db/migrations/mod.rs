//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Migration DDL is `IF NOT EXISTS`, so re-applying over a database created
//!   without version tracking is harmless.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_locality.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Returns the schema version recorded in the database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Creates the locality tables and indexes when absent.
///
/// Safe to call on every startup. A failure here leaves the registry
/// unusable and must abort startup.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    match apply_migrations(conn) {
        Ok(version) => {
            info!("event=schema_ensure module=db status=ok version={version}");
            Ok(())
        }
        Err(err) => {
            error!("event=schema_ensure module=db status=error error={err}");
            Err(err)
        }
    }
}

fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let latest = latest_version();
    if current_version(conn)? == latest {
        return Ok(latest);
    }

    // Re-read under the write lock: another connection may have migrated
    // between the check above and this transaction.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = current_version(&tx)?;
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(latest)
}
