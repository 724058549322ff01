//! Locality registry: the pooled entry point used by application code.
//!
//! # Responsibility
//! - Own the connection pool of one registry instance from `open` to `close`.
//! - Run every operation on one checked-out connection and return it to the
//!   pool when the operation completes.
//!
//! # Invariants
//! - Any call after `close()` fails with `RegistryError::Closed`, including a
//!   second `close()`.
//! - `list_neighborhoods` degrades storage and checkout failures to an empty
//!   list but never hides lifecycle misuse.
//! - Dropping an open registry releases its pool.

use crate::config::{ConfigError, RegistryConfig};
use crate::db::{create_pool, ensure_schema, DbError, DbPool, PooledConnection};
use crate::model::locality::{City, CityId, LocalityCounts, Neighborhood, NeighborhoodSeed};
use crate::repo::locality_repo::{RepoError, RepoResult, SqliteLocalityRepository};
use crate::seed::{CitySeed, SeedReport, REFERENCE_CATALOGUE};
use crate::service::locality_service::{LocalityService, NeighborhoodLookup};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug)]
pub enum RegistryError {
    /// The registry was closed; no further operations are accepted.
    Closed,
    Config(ConfigError),
    Db(DbError),
    Repo(RepoError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "locality registry is closed"),
            Self::Config(err) => write!(f, "invalid registry configuration: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Closed => None,
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for RegistryError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for RegistryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for RegistryError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Pooled city/neighborhood registry.
///
/// Construct once at startup, share by reference, and `close()` on every
/// exit path.
pub struct LocalityRegistry {
    pool: Option<DbPool>,
    config: RegistryConfig,
}

impl LocalityRegistry {
    /// Opens the pool described by `config` and ensures the schema.
    ///
    /// # Errors
    /// - Returns `RegistryError::Db` when storage cannot be opened or the
    ///   schema cannot be created. Both are fatal for startup.
    pub fn open(config: RegistryConfig) -> RegistryResult<Self> {
        let pool = create_pool(&config)?;
        info!(
            "event=registry_open module=registry status=ok storage={:?}",
            config.storage
        );
        Ok(Self {
            pool: Some(pool),
            config,
        })
    }

    /// Opens a registry configured from `LOCALITY_*` environment variables.
    pub fn open_from_env() -> RegistryResult<Self> {
        let config = RegistryConfig::from_env()?;
        Self::open(config)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_none()
    }

    /// Checks one connection out of the pool.
    ///
    /// The connection returns to the pool when dropped. Waits at most the
    /// configured checkout timeout.
    pub fn checkout(&self) -> RegistryResult<PooledConnection> {
        let pool = self.pool.as_ref().ok_or(RegistryError::Closed)?;
        let conn = pool.get().map_err(DbError::from)?;
        Ok(conn)
    }

    /// Creates tables and indexes when absent. Already run by `open`.
    pub fn ensure_schema(&self) -> RegistryResult<()> {
        let mut conn = self.checkout()?;
        ensure_schema(&mut conn)?;
        Ok(())
    }

    pub fn upsert_city(
        &self,
        name: &str,
        region: Option<&str>,
        population: Option<i64>,
    ) -> RegistryResult<CityId> {
        self.with_service(|service| service.upsert_city(name, region, population))
            .inspect_err(|err| {
                error!("event=city_upsert module=registry status=error error={err}");
            })
    }

    /// Inserts the neighborhoods of `city_id` not stored yet.
    ///
    /// Returns the number of rows inserted. A failure rolls back the batch.
    pub fn upsert_neighborhoods(
        &self,
        city_id: CityId,
        neighborhoods: &[NeighborhoodSeed<'_>],
    ) -> RegistryResult<usize> {
        self.with_service(|service| service.upsert_neighborhoods(city_id, neighborhoods))
            .inspect_err(|err| {
                error!(
                    "event=neighborhood_upsert module=registry status=error city_id={city_id} error={err}"
                );
            })
    }

    /// Seeds the built-in Yaoundé/Douala catalogue. Safe on every start.
    pub fn seed_reference_data(&self) -> RegistryResult<SeedReport> {
        self.seed(REFERENCE_CATALOGUE)
    }

    pub fn seed(&self, catalogue: &[CitySeed]) -> RegistryResult<SeedReport> {
        self.with_service(|service| service.seed(catalogue))
    }

    /// Lists neighborhood names of `city_name` for pickers.
    ///
    /// Unknown cities, empty cities and storage failures all yield an empty
    /// list; failures are logged.
    ///
    /// # Errors
    /// - Returns `RegistryError::Closed` after `close()`.
    pub fn list_neighborhoods(&self, city_name: &str) -> RegistryResult<Vec<String>> {
        match self.with_service(|service| Ok(service.list_neighborhoods(city_name))) {
            Err(RegistryError::Closed) => Err(RegistryError::Closed),
            Err(err) => {
                error!(
                    "event=neighborhood_list module=registry status=error error_code=checkout_failed error={}",
                    err
                );
                Ok(Vec::new())
            }
            names => names,
        }
    }

    /// Strict lookup keeping unknown city, empty city and failure apart.
    pub fn lookup_neighborhoods(&self, city_name: &str) -> RegistryResult<NeighborhoodLookup> {
        self.with_service(|service| service.lookup_neighborhoods(city_name))
    }

    pub fn find_city(&self, name: &str) -> RegistryResult<Option<City>> {
        self.with_service(|service| service.find_city(name))
    }

    pub fn list_cities(&self) -> RegistryResult<Vec<City>> {
        self.with_service(|service| service.list_cities())
    }

    /// Full neighborhood rows of one city, including arrondissements.
    pub fn neighborhoods_of(&self, city_id: CityId) -> RegistryResult<Vec<Neighborhood>> {
        self.with_service(|service| service.neighborhoods_of(city_id))
    }

    /// Administrative delete of a city and its neighborhoods.
    pub fn delete_city(&self, name: &str) -> RegistryResult<()> {
        self.with_service(|service| service.delete_city(name))?;
        info!("event=city_delete module=registry status=ok");
        Ok(())
    }

    pub fn counts(&self) -> RegistryResult<LocalityCounts> {
        self.with_service(|service| service.counts())
    }

    /// Releases the pool.
    ///
    /// Connections still checked out through `checkout()` close when their
    /// guards drop.
    ///
    /// # Errors
    /// - Returns `RegistryError::Closed` when already closed.
    pub fn close(&mut self) -> RegistryResult<()> {
        match self.pool.take() {
            Some(pool) => {
                drop(pool);
                info!("event=registry_close module=registry status=ok");
                Ok(())
            }
            None => {
                warn!("event=registry_close module=registry status=error error_code=already_closed");
                Err(RegistryError::Closed)
            }
        }
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&mut LocalityService<SqliteLocalityRepository<'_>>) -> RepoResult<T>,
    ) -> RegistryResult<T> {
        let mut conn = self.checkout()?;
        let repo = SqliteLocalityRepository::from_pooled(&mut conn);
        let mut service = LocalityService::new(repo);
        Ok(f(&mut service)?)
    }
}

impl Drop for LocalityRegistry {
    fn drop(&mut self) {
        if self.pool.is_some() {
            warn!("event=registry_drop module=registry status=ok closed_explicitly=false");
        }
    }
}
