//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate inputs before persistence.
//! - Repository APIs return semantic errors (`CityNotFound`) in addition to
//!   DB transport errors.

pub mod locality_repo;
