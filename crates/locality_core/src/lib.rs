//! Geographic locality registry for Cameroonian cities and neighborhoods.
//! This crate is the single source of truth for locality reference data.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod registry;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{ConfigError, RegistryConfig, StorageLocation};
pub use logging::{default_log_level, init_logging, logging_status, resolve_log_level};
pub use model::locality::{
    City, CityId, LocalityCounts, LocalityValidationError, Neighborhood, NeighborhoodId,
    NeighborhoodSeed,
};
pub use registry::{LocalityRegistry, RegistryError, RegistryResult};
pub use repo::locality_repo::{
    LocalityRepository, RepoError, RepoResult, SqliteLocalityRepository,
};
pub use seed::{seed_catalogue, ArrondissementSeed, CitySeed, SeedReport, REFERENCE_CATALOGUE};
pub use service::locality_service::{LocalityService, NeighborhoodLookup};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
