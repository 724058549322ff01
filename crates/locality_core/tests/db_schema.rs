use locality_core::db::migrations::{current_version, latest_version};
use locality_core::db::{ensure_schema, open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_tables_and_indexes() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_object_exists(&conn, "table", "city");
    assert_object_exists(&conn, "table", "neighborhood");
    assert_object_exists(&conn, "index", "idx_city_name");
    assert_object_exists(&conn, "index", "idx_neighborhood_city");
    assert_object_exists(&conn, "index", "idx_neighborhood_arrondissement");
}

#[test]
fn ensure_schema_is_idempotent_on_same_connection() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO city (name, region, population) VALUES ('Douala', 'Littoral', 1);",
        [],
    )
    .unwrap();

    ensure_schema(&mut conn).unwrap();
    ensure_schema(&mut conn).unwrap();

    let cities: i64 = conn
        .query_row("SELECT COUNT(*) FROM city;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(cities, 1);
}

#[test]
fn ensure_schema_adopts_unversioned_database_with_existing_tables() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE city (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            region TEXT,
            population INTEGER DEFAULT 0
        );
        INSERT INTO city (name) VALUES ('Yaoundé');",
    )
    .unwrap();

    ensure_schema(&mut conn).unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_object_exists(&conn, "table", "neighborhood");
    let cities: i64 = conn
        .query_row("SELECT COUNT(*) FROM city;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(cities, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("villes.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(current_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_version(&conn_second).unwrap(), latest_version());
    assert_object_exists(&conn_second, "table", "city");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_connections_use_write_ahead_log() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("wal.db")).unwrap();

    let mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_ascii_lowercase(), "wal");
}

#[test]
fn deleting_city_row_cascades_to_neighborhoods() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO city (id, name) VALUES (1, 'Douala');
         INSERT INTO neighborhood (city_id, name, arrondissement) VALUES (1, 'Akwa', 'Douala I');
         INSERT INTO neighborhood (city_id, name, arrondissement) VALUES (1, 'Bali', 'Douala VII');
         DELETE FROM city WHERE id = 1;",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM neighborhood;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

fn assert_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
