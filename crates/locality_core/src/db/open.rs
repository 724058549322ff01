//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and collations required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have `LOCALITY_NOCASE` registered.
//! - Returned connections have migrations fully applied.

use super::migrations::ensure_schema;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::cmp::Ordering;
use std::path::Path;
use std::time::{Duration, Instant};

/// Collation used for every user-facing name ordering.
pub const LOCALITY_COLLATION: &str = "LOCALITY_NOCASE";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let mut conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(&mut conn, true, "file", started_at)?;
    Ok(conn)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// Each in-memory connection is a private database; data does not outlive
/// the returned handle.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let mut conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(&mut conn, false, "memory", started_at)?;
    Ok(conn)
}

/// Orders two names by Unicode lower-case form, then by raw bytes.
///
/// SQLite's built-in `NOCASE` only folds ASCII, which would separate
/// `Étoudi` from `étoudi` whenever another accented name sorts between them.
pub fn compare_locality_names(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
        .then_with(|| left.cmp(right))
}

/// Applies per-connection settings. Runs for direct opens and for every
/// connection the pool creates.
pub(crate) fn configure_connection(conn: &Connection, file_backed: bool) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.create_collation(LOCALITY_COLLATION, compare_locality_names)?;
    if file_backed {
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    }
    Ok(())
}

fn finish_open(
    conn: &mut Connection,
    file_backed: bool,
    mode: &str,
    started_at: Instant,
) -> DbResult<()> {
    match bootstrap_connection(conn, file_backed) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, file_backed: bool) -> DbResult<()> {
    configure_connection(conn, file_backed)?;
    ensure_schema(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{compare_locality_names, open_db_in_memory};
    use std::cmp::Ordering;

    #[test]
    fn comparison_folds_non_ascii_case() {
        assert_eq!(compare_locality_names("Étoudi", "étoudi"), Ordering::Less);
        assert_eq!(compare_locality_names("étoudi", "Ñkol"), Ordering::Less);
        assert_eq!(compare_locality_names("Bastos", "akwa"), Ordering::Greater);
        assert_eq!(compare_locality_names("Akwa", "Akwa"), Ordering::Equal);
    }

    #[test]
    fn in_memory_connection_enables_foreign_keys() {
        let conn = open_db_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
