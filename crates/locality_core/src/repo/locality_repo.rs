//! Locality repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide idempotent upserts for cities and neighborhoods.
//! - Provide the ordered neighborhood lookup used by location pickers.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - `upsert_city` is insert-or-ignore followed by select-by-name; the id is
//!   always read back from storage, never assumed from the insert.
//! - `upsert_neighborhoods` writes one batch in a single immediate
//!   transaction; any failure rolls the whole batch back.
//! - Name ordering uses `LOCALITY_NOCASE`.
//! - Write paths validate inputs before SQL mutations.

use crate::db::migrations::{current_version, latest_version};
use crate::db::{compare_locality_names, DbError, LOCALITY_COLLATION};
use crate::model::locality::{
    validate_city, City, CityId, LocalityCounts, LocalityValidationError, Neighborhood,
    NeighborhoodId, NeighborhoodSeed,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CITY_SELECT_SQL: &str = "SELECT id, name, region, population FROM city";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for locality persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(LocalityValidationError),
    Db(DbError),
    /// No city row carries this name.
    CityNotFound(String),
    /// No city row carries this id.
    CityIdNotFound(CityId),
    /// Insert-or-ignore succeeded but the follow-up select found no row.
    CityNotResolved(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Cascade deletes require `PRAGMA foreign_keys=ON`.
    ForeignKeysDisabled,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CityNotFound(name) => write!(f, "city not found: {name}"),
            Self::CityIdNotFound(id) => write!(f, "city id not found: {id}"),
            Self::CityNotResolved(name) => {
                write!(f, "city `{name}` was not readable after upsert")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::ForeignKeysDisabled => write!(f, "connection has foreign keys disabled"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LocalityValidationError> for RepoError {
    fn from(value: LocalityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for locality reference data.
pub trait LocalityRepository {
    /// Inserts the city when its name is new and returns the stored id.
    ///
    /// Existing rows are left untouched, including region and population.
    fn upsert_city(
        &self,
        name: &str,
        region: Option<&str>,
        population: Option<i64>,
    ) -> RepoResult<CityId>;
    /// Inserts every `(city_id, name)` pair not stored yet.
    ///
    /// Returns the number of rows actually inserted.
    fn upsert_neighborhoods(
        &mut self,
        city_id: CityId,
        neighborhoods: &[NeighborhoodSeed<'_>],
    ) -> RepoResult<usize>;
    fn find_city(&self, name: &str) -> RepoResult<Option<City>>;
    /// Lists all cities ordered by name.
    fn list_cities(&self) -> RepoResult<Vec<City>>;
    /// Lists neighborhood names of the city with exactly this name, ordered
    /// case-insensitively.
    ///
    /// Returns `None` when no city carries this name. City and names are
    /// read by one statement.
    fn lookup_neighborhood_names(&self, city_name: &str) -> RepoResult<Option<Vec<String>>>;
    /// Lists full neighborhood rows of one city, ordered like
    /// `lookup_neighborhood_names`.
    fn list_neighborhoods(&self, city_id: CityId) -> RepoResult<Vec<Neighborhood>>;
    /// Deletes a city and, by cascade, its neighborhoods.
    fn delete_city(&self, name: &str) -> RepoResult<()>;
    fn counts(&self) -> RepoResult<LocalityCounts>;
}

/// SQLite-backed locality repository.
pub struct SqliteLocalityRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteLocalityRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Registers `LOCALITY_NOCASE` on the connection when missing.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_locality_connection_ready(conn)?;
        conn.create_collation(LOCALITY_COLLATION, compare_locality_names)?;
        Ok(Self { conn })
    }

    /// Wraps a pooled connection without readiness checks.
    ///
    /// Pool connections are configured by `configure_connection` and the
    /// pool is migrated before it is handed out.
    pub(crate) fn from_pooled(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl LocalityRepository for SqliteLocalityRepository<'_> {
    fn upsert_city(
        &self,
        name: &str,
        region: Option<&str>,
        population: Option<i64>,
    ) -> RepoResult<CityId> {
        validate_city(name, population)?;

        self.conn.execute(
            "INSERT OR IGNORE INTO city (name, region, population) VALUES (?1, ?2, ?3);",
            params![name, region, population.unwrap_or(0)],
        )?;

        let id = self
            .conn
            .query_row("SELECT id FROM city WHERE name = ?1;", [name], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;

        id.map(CityId)
            .ok_or_else(|| RepoError::CityNotResolved(name.to_string()))
    }

    fn upsert_neighborhoods(
        &mut self,
        city_id: CityId,
        neighborhoods: &[NeighborhoodSeed<'_>],
    ) -> RepoResult<usize> {
        for neighborhood in neighborhoods {
            neighborhood.validate()?;
        }
        if neighborhoods.is_empty() {
            return Ok(0);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !city_exists_in_tx(&tx, city_id)? {
            return Err(RepoError::CityIdNotFound(city_id));
        }

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO neighborhood (city_id, name, arrondissement)
                 VALUES (?1, ?2, ?3);",
            )?;
            for neighborhood in neighborhoods {
                inserted += stmt.execute(params![
                    city_id.0,
                    neighborhood.name,
                    neighborhood.stored_arrondissement(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn find_city(&self, name: &str) -> RepoResult<Option<City>> {
        let city = self
            .conn
            .query_row(
                &format!("{CITY_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_city_row,
            )
            .optional()?;
        Ok(city)
    }

    fn list_cities(&self) -> RepoResult<Vec<City>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CITY_SELECT_SQL} ORDER BY name COLLATE {LOCALITY_COLLATION} ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut cities = Vec::new();
        while let Some(row) = rows.next()? {
            cities.push(parse_city_row(row)?);
        }
        Ok(cities)
    }

    fn lookup_neighborhood_names(&self, city_name: &str) -> RepoResult<Option<Vec<String>>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT c.id, n.name
             FROM city c
             LEFT JOIN neighborhood n ON n.city_id = c.id
             WHERE c.name = ?1
             ORDER BY n.name COLLATE {LOCALITY_COLLATION} ASC;"
        ))?;
        let mut rows = stmt.query([city_name])?;
        let mut found = false;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            found = true;
            // A city without neighborhoods yields one row with a NULL name.
            if let Some(name) = row.get::<_, Option<String>>(1)? {
                names.push(name);
            }
        }
        Ok(found.then_some(names))
    }

    fn list_neighborhoods(&self, city_id: CityId) -> RepoResult<Vec<Neighborhood>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, city_id, name, arrondissement
             FROM neighborhood
             WHERE city_id = ?1
             ORDER BY name COLLATE {LOCALITY_COLLATION} ASC;"
        ))?;
        let mut rows = stmt.query([city_id.0])?;
        let mut neighborhoods = Vec::new();
        while let Some(row) = rows.next()? {
            neighborhoods.push(Neighborhood {
                id: NeighborhoodId(row.get("id")?),
                city_id: CityId(row.get("city_id")?),
                name: row.get("name")?,
                arrondissement: row.get("arrondissement")?,
            });
        }
        Ok(neighborhoods)
    }

    fn delete_city(&self, name: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM city WHERE name = ?1;", [name])?;
        if changed == 0 {
            return Err(RepoError::CityNotFound(name.to_string()));
        }
        Ok(())
    }

    fn counts(&self) -> RepoResult<LocalityCounts> {
        Ok(LocalityCounts {
            cities: count_rows(&*self.conn, "city")?,
            neighborhoods: count_rows(&*self.conn, "neighborhood")?,
        })
    }
}

fn parse_city_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: CityId(row.get("id")?),
        name: row.get("name")?,
        region: row.get("region")?,
        population: row.get::<_, Option<i64>>("population")?.unwrap_or(0),
    })
}

fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        let count: i64 = row.get(0)?;
        u64::try_from(count).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, count))
    })?;
    Ok(count)
}

fn city_exists_in_tx(tx: &Transaction<'_>, city_id: CityId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM city WHERE id = ?1);",
        [city_id.0],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_locality_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["city", "neighborhood"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
