//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each table. Repositories encapsulate SQL queries and
//! work in row types only; translation to domain types happens in
//! [`crate::adapters`].
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries (`sqlx::query_as`) over `FromRow` row structs
//! - Read-modify-write expressed as a single guarded `UPDATE ... RETURNING`
//! - Constraint violations surfaced as typed `DatabaseError` variants

pub mod claims;
pub mod venues;
pub mod relationships;
pub mod reconciliation;

pub use claims::ClaimsRepository;
pub use venues::VenueRepository;
pub use relationships::RelationshipRepository;
pub use reconciliation::ReconciliationRepository;
