//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! venue claim test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for venues, claimants and evidence
//! - `builders`: Builder patterns for claim submissions and venues
//! - `fakes`: Recording and in-memory port implementations
//! - `harness`: A claim workflow wired entirely to in-memory adapters
//! - `database`: Database test helpers and container management
//! - `assertions`: Invariant checks over venues, claims and relationships
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod fakes;
pub mod harness;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use fakes::*;
pub use harness::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
