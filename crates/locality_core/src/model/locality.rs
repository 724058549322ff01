//! City and neighborhood records.
//!
//! # Responsibility
//! - Define the persisted shapes of `city` and `neighborhood` rows.
//! - Define borrowed seed inputs used by bulk loading.
//!
//! # Invariants
//! - Names are non-blank.
//! - `population` is never negative; absent input is stored as `0`.
//! - A blank arrondissement label is treated as no label.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate key of a `city` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub i64);

/// Surrogate key of a `neighborhood` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeighborhoodId(pub i64);

impl Display for CityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for NeighborhoodId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub region: Option<String>,
    pub population: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: NeighborhoodId,
    /// Owning city. Deleting the city deletes this row.
    pub city_id: CityId,
    pub name: String,
    /// Administrative subdivision label, e.g. `Yaoundé V`.
    pub arrondissement: Option<String>,
}

/// One neighborhood to insert for a known city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborhoodSeed<'a> {
    pub name: &'a str,
    pub arrondissement: Option<&'a str>,
}

impl<'a> NeighborhoodSeed<'a> {
    pub const fn new(name: &'a str, arrondissement: &'a str) -> Self {
        Self {
            name,
            arrondissement: Some(arrondissement),
        }
    }

    pub const fn unassigned(name: &'a str) -> Self {
        Self {
            name,
            arrondissement: None,
        }
    }

    /// Arrondissement label as stored: trimmed, `None` when blank.
    pub fn stored_arrondissement(&self) -> Option<&'a str> {
        self.arrondissement
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    pub fn validate(&self) -> Result<(), LocalityValidationError> {
        if self.name.trim().is_empty() {
            return Err(LocalityValidationError::BlankNeighborhoodName);
        }
        Ok(())
    }
}

/// Row counts of both locality tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityCounts {
    pub cities: u64,
    pub neighborhoods: u64,
}

/// Validation errors raised before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalityValidationError {
    BlankCityName,
    NegativePopulation(i64),
    BlankNeighborhoodName,
}

impl Display for LocalityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCityName => write!(f, "city name must not be blank"),
            Self::NegativePopulation(value) => {
                write!(f, "population must not be negative, got {value}")
            }
            Self::BlankNeighborhoodName => write!(f, "neighborhood name must not be blank"),
        }
    }
}

impl Error for LocalityValidationError {}

/// Validates `upsert_city` inputs.
pub fn validate_city(name: &str, population: Option<i64>) -> Result<(), LocalityValidationError> {
    if name.trim().is_empty() {
        return Err(LocalityValidationError::BlankCityName);
    }
    if let Some(value) = population.filter(|value| *value < 0) {
        return Err(LocalityValidationError::NegativePopulation(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_city, LocalityValidationError, NeighborhoodSeed};

    #[test]
    fn blank_arrondissement_is_stored_as_none() {
        assert_eq!(NeighborhoodSeed::new("Akwa", "  ").stored_arrondissement(), None);
        assert_eq!(
            NeighborhoodSeed::new("Akwa", " Douala I ").stored_arrondissement(),
            Some("Douala I")
        );
        assert_eq!(NeighborhoodSeed::unassigned("Akwa").stored_arrondissement(), None);
    }

    #[test]
    fn city_validation_rejects_blank_name_and_negative_population() {
        assert_eq!(
            validate_city(" ", None),
            Err(LocalityValidationError::BlankCityName)
        );
        assert_eq!(
            validate_city("Douala", Some(-1)),
            Err(LocalityValidationError::NegativePopulation(-1))
        );
        assert!(validate_city("Douala", None).is_ok());
    }

    #[test]
    fn neighborhood_validation_rejects_blank_name() {
        assert_eq!(
            NeighborhoodSeed::unassigned("").validate(),
            Err(LocalityValidationError::BlankNeighborhoodName)
        );
    }
}
