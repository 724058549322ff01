//! Domain model for the locality reference data.
//!
//! # Responsibility
//! - Define cities, neighborhoods and the seed records that populate them.
//! - Validate inputs before they reach storage.
//!
//! # Invariants
//! - A city name is unique; a neighborhood name is unique within its city.
//! - Neighborhoods never outlive their owning city.

pub mod locality;
