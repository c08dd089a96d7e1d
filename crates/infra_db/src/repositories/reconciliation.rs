//! Reconciliation queue repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::claims::ClaimStatus;

const ENTRY_COLUMNS: &str = r#"
    reconciliation_id, claim_id, venue_id, claimant_id, claim_status,
    failed_step, error, recorded_at, resolved_at
"#;

/// Repository for `claim_reconciliation_queue`
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    pool: PgPool,
}

impl ReconciliationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &ReconciliationRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claim_reconciliation_queue (
                reconciliation_id, claim_id, venue_id, claimant_id, claim_status,
                failed_step, error, recorded_at, resolved_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.reconciliation_id)
        .bind(entry.claim_id)
        .bind(entry.venue_id)
        .bind(entry.claimant_id)
        .bind(entry.claim_status)
        .bind(entry.failed_step)
        .bind(&entry.error)
        .bind(entry.recorded_at)
        .bind(entry.resolved_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, reconciliation_id: Uuid) -> Result<ReconciliationRow, DatabaseError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM claim_reconciliation_queue WHERE reconciliation_id = $1"
        );
        sqlx::query_as::<_, ReconciliationRow>(&sql)
            .bind(reconciliation_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("PartialTransition", reconciliation_id))
    }

    /// Unresolved entries, oldest first
    pub async fn find_unresolved(&self) -> Result<Vec<ReconciliationRow>, DatabaseError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM claim_reconciliation_queue WHERE resolved_at IS NULL ORDER BY recorded_at"
        );
        let rows = sqlx::query_as::<_, ReconciliationRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Stamps `resolved_at` once; later calls return the row unchanged
    pub async fn mark_resolved(&self, reconciliation_id: Uuid) -> Result<ReconciliationRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE claim_reconciliation_queue
            SET resolved_at = COALESCE(resolved_at, $2)
            WHERE reconciliation_id = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        );
        sqlx::query_as::<_, ReconciliationRow>(&sql)
            .bind(reconciliation_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("PartialTransition", reconciliation_id))
    }
}

/// Transition step enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transition_step", rename_all = "snake_case")]
pub enum TransitionStep {
    PendingCounter,
    VenueResolution,
    RelationshipCreation,
}

/// Database row for a reconciliation entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReconciliationRow {
    pub reconciliation_id: Uuid,
    pub claim_id: Uuid,
    pub venue_id: Uuid,
    pub claimant_id: Uuid,
    pub claim_status: ClaimStatus,
    pub failed_step: TransitionStep,
    pub error: String,
    pub recorded_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
