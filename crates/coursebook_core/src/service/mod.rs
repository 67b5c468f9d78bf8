//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.

pub mod catalog_service;
pub mod enrollment_service;
