//! Idempotent bulk loading of locality reference data.
//!
//! # Responsibility
//! - Describe the static catalogue shape (city -> arrondissement -> names).
//! - Drive repository upserts for a whole catalogue.
//!
//! # Invariants
//! - Re-running a seed never adds rows and never errors.
//! - The first failing city aborts the run; the failure is logged here and
//!   returned to the caller.

pub mod catalogue;

use crate::model::locality::NeighborhoodSeed;
use crate::repo::locality_repo::{LocalityRepository, RepoResult};
use log::{error, info};
use serde::Serialize;
use std::time::Instant;

pub use catalogue::REFERENCE_CATALOGUE;

/// One city of a static catalogue.
#[derive(Debug, Clone, Copy)]
pub struct CitySeed {
    pub name: &'static str,
    pub region: &'static str,
    pub population: i64,
    pub arrondissements: &'static [ArrondissementSeed],
}

/// Neighborhood names sharing one arrondissement label.
#[derive(Debug, Clone, Copy)]
pub struct ArrondissementSeed {
    pub name: &'static str,
    pub neighborhoods: &'static [&'static str],
}

impl CitySeed {
    /// Flattens arrondissement groups in declaration order.
    pub fn neighborhood_seeds(&self) -> Vec<NeighborhoodSeed<'static>> {
        self.arrondissements
            .iter()
            .flat_map(|arrondissement| {
                arrondissement
                    .neighborhoods
                    .iter()
                    .map(move |name| NeighborhoodSeed::new(*name, arrondissement.name))
            })
            .collect()
    }
}

/// Outcome of one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Cities processed (inserted or already present).
    pub cities: usize,
    /// Neighborhood rows newly inserted by this run.
    pub neighborhoods_inserted: usize,
}

/// Upserts every city of `catalogue` and its neighborhoods.
pub fn seed_catalogue<R: LocalityRepository>(
    repo: &mut R,
    catalogue: &[CitySeed],
) -> RepoResult<SeedReport> {
    let started_at = Instant::now();
    info!(
        "event=seed module=seed status=start cities={}",
        catalogue.len()
    );

    let mut report = SeedReport::default();
    for city in catalogue {
        match seed_city(repo, city) {
            Ok(inserted) => {
                report.cities += 1;
                report.neighborhoods_inserted += inserted;
            }
            Err(err) => {
                error!(
                    "event=seed module=seed status=error city={} duration_ms={} error={}",
                    city.name,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        }
    }

    info!(
        "event=seed module=seed status=ok cities={} inserted={} duration_ms={}",
        report.cities,
        report.neighborhoods_inserted,
        started_at.elapsed().as_millis()
    );
    Ok(report)
}

fn seed_city<R: LocalityRepository>(repo: &mut R, city: &CitySeed) -> RepoResult<usize> {
    let city_id = repo.upsert_city(city.name, Some(city.region), Some(city.population))?;
    repo.upsert_neighborhoods(city_id, &city.neighborhood_seeds())
}

#[cfg(test)]
mod tests {
    use super::REFERENCE_CATALOGUE;
    use std::collections::HashSet;

    #[test]
    fn catalogue_holds_yaounde_and_douala() {
        let names: Vec<_> = REFERENCE_CATALOGUE.iter().map(|city| city.name).collect();
        assert_eq!(names, vec!["Yaoundé", "Douala"]);
    }

    #[test]
    fn every_city_has_seven_arrondissements_and_repeated_names() {
        for city in REFERENCE_CATALOGUE {
            assert_eq!(city.arrondissements.len(), 7, "{}", city.name);

            let seeds = city.neighborhood_seeds();
            let distinct: HashSet<_> = seeds.iter().map(|seed| seed.name).collect();
            assert_eq!(seeds.len(), 62, "{}", city.name);
            assert_eq!(distinct.len(), 55, "{}", city.name);
        }
    }

    #[test]
    fn flattened_seeds_keep_arrondissement_labels() {
        let seeds = REFERENCE_CATALOGUE[0].neighborhood_seeds();
        let bastos = seeds.iter().find(|seed| seed.name == "Bastos").unwrap();
        assert_eq!(bastos.arrondissement, Some("Yaoundé V"));
    }
}
