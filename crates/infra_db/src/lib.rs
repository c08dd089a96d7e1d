//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the venue claim workflow using SQLx.
//!
//! # Architecture
//!
//! - [`repositories`] hold the SQL and work in row types
//! - [`adapters`] implement the domain ports (`ClaimPort`, `VenuePort`,
//!   `RelationshipPort`, `ReconciliationSink`) over the repositories
//!
//! Concurrency guarantees live in the schema: the claim transition is a
//! conditional `UPDATE ... WHERE status = 'pending'`, a partial unique index
//! allows one active claim per claimant and venue, and another allows a
//! single owner relationship per venue.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/venue_claims")).await?;
//! run_migrations(&pool).await?;
//! let claims = PostgresClaimAdapter::new(pool.clone());
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{
    PostgresClaimAdapter, PostgresReconciliationAdapter, PostgresRelationshipAdapter,
    PostgresVenueAdapter,
};
