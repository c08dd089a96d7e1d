//! Venue Domain Adapters
//!
//! In-memory implementations of the venue ports, used by tests and by local
//! development runs without a database.

pub mod memory;

pub use memory::{InMemoryVenueStore, InMemoryRelationshipStore};
