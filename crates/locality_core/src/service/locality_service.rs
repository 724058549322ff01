//! Locality use-case service.
//!
//! # Responsibility
//! - Answer "neighborhoods of city X" for location pickers.
//! - Route seeding and admin calls to the repository.
//!
//! # Invariants
//! - `list_neighborhoods` never returns an error; failures are logged and
//!   reported as an empty list.
//! - `lookup_neighborhoods` keeps unknown city, empty city and storage
//!   failure apart.
//! - Service layer remains storage-agnostic.

use crate::model::locality::{City, CityId, LocalityCounts, Neighborhood, NeighborhoodSeed};
use crate::repo::locality_repo::{LocalityRepository, RepoResult};
use crate::seed::{seed_catalogue, CitySeed, SeedReport};
use log::{debug, error};
use serde::Serialize;

/// Result of a strict neighborhood lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "neighborhoods", rename_all = "snake_case")]
pub enum NeighborhoodLookup {
    /// The city exists. The list is empty when it has no neighborhoods.
    Found(Vec<String>),
    UnknownCity,
}

impl NeighborhoodLookup {
    /// Collapses the outcome to the picker shape: names or nothing.
    pub fn into_names(self) -> Vec<String> {
        match self {
            Self::Found(names) => names,
            Self::UnknownCity => Vec::new(),
        }
    }
}

/// Use-case service wrapper for locality operations.
pub struct LocalityService<R: LocalityRepository> {
    repo: R,
}

impl<R: LocalityRepository> LocalityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists neighborhood names of `city_name`, ordered case-insensitively.
    ///
    /// Unknown cities and storage errors both yield an empty list.
    pub fn list_neighborhoods(&self, city_name: &str) -> Vec<String> {
        match self.lookup_neighborhoods(city_name) {
            Ok(lookup) => lookup.into_names(),
            Err(err) => {
                error!(
                    "event=neighborhood_list module=service status=error error_code=lookup_failed error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Lists neighborhood names of `city_name` with distinct outcomes.
    pub fn lookup_neighborhoods(&self, city_name: &str) -> RepoResult<NeighborhoodLookup> {
        match self.repo.lookup_neighborhood_names(city_name)? {
            Some(names) => {
                debug!(
                    "event=neighborhood_list module=service status=ok outcome=found count={}",
                    names.len()
                );
                Ok(NeighborhoodLookup::Found(names))
            }
            None => {
                debug!("event=neighborhood_list module=service status=ok outcome=unknown_city");
                Ok(NeighborhoodLookup::UnknownCity)
            }
        }
    }

    pub fn find_city(&self, name: &str) -> RepoResult<Option<City>> {
        self.repo.find_city(name)
    }

    pub fn list_cities(&self) -> RepoResult<Vec<City>> {
        self.repo.list_cities()
    }

    /// Full neighborhood rows of one city, including arrondissements.
    pub fn neighborhoods_of(&self, city_id: CityId) -> RepoResult<Vec<Neighborhood>> {
        self.repo.list_neighborhoods(city_id)
    }

    pub fn upsert_city(
        &self,
        name: &str,
        region: Option<&str>,
        population: Option<i64>,
    ) -> RepoResult<CityId> {
        self.repo.upsert_city(name, region, population)
    }

    pub fn upsert_neighborhoods(
        &mut self,
        city_id: CityId,
        neighborhoods: &[NeighborhoodSeed<'_>],
    ) -> RepoResult<usize> {
        self.repo.upsert_neighborhoods(city_id, neighborhoods)
    }

    /// Seeds every city of `catalogue`.
    pub fn seed(&mut self, catalogue: &[CitySeed]) -> RepoResult<SeedReport> {
        seed_catalogue(&mut self.repo, catalogue)
    }

    /// Administrative delete; cascades to the city's neighborhoods.
    pub fn delete_city(&self, name: &str) -> RepoResult<()> {
        self.repo.delete_city(name)
    }

    pub fn counts(&self) -> RepoResult<LocalityCounts> {
        self.repo.counts()
    }
}
