//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep registry/CLI layers decoupled from storage details.

pub mod locality_service;
