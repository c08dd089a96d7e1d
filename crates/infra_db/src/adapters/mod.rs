//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements one domain port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//! - Reports database errors as `PortError` (see [`crate::error`])
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimAdapter;
//! use domain_claims::ClaimPort;
//!
//! let adapter = PostgresClaimAdapter::new(pool);
//! let claim = adapter.get(claim_id).await?;
//! ```

pub mod claims;
pub mod venues;
pub mod reconciliation;

pub use claims::PostgresClaimAdapter;
pub use venues::{PostgresRelationshipAdapter, PostgresVenueAdapter};
pub use reconciliation::PostgresReconciliationAdapter;

use std::time::Instant;

use core_kernel::HealthCheckResult;
use sqlx::PgPool;

/// Runs `SELECT 1` and reports the result under `adapter_id`
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}
