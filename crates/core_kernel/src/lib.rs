//! Core Kernel - Foundational types shared by the venue claims workspace
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for claims, venues, users and audit records
//! - The port error type every adapter reports through
//! - Marker and health-check traits for ports and adapters

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{
    ClaimId, VenueId, UserId, AdminId, RelationshipId, ReconciliationId,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
