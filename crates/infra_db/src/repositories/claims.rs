//! Claims repository implementation
//!
//! This module provides database access for venue claims: insertion of new
//! pending claims, the read projections used by the review screens, and the
//! single guarded transition out of `pending`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = r#"
    claim_id, venue_id, claimant_id, claimant_name, claimant_email,
    venue_name, venue_category, business_name, business_email, business_phone,
    business_role, claim_reason, additional_info, evidence_documents, status,
    submitted_at, processed_at, processed_by, admin_notes, rejection_reason
"#;

/// Repository for managing claim records
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new claim
    ///
    /// A second live claim for the same claimant and venue violates the
    /// `venue_claims_active_claimant_venue` index and is returned as
    /// `DatabaseError::DuplicateEntry`.
    pub async fn insert(&self, claim: &ClaimRow) -> Result<ClaimRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO venue_claims (
                claim_id, venue_id, claimant_id, claimant_name, claimant_email,
                venue_name, venue_category, business_name, business_email, business_phone,
                business_role, claim_reason, additional_info, evidence_documents, status,
                submitted_at, processed_at, processed_by, admin_notes, rejection_reason
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            RETURNING {CLAIM_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim.claim_id)
            .bind(claim.venue_id)
            .bind(claim.claimant_id)
            .bind(&claim.claimant_name)
            .bind(&claim.claimant_email)
            .bind(&claim.venue_name)
            .bind(&claim.venue_category)
            .bind(&claim.business_name)
            .bind(&claim.business_email)
            .bind(&claim.business_phone)
            .bind(claim.business_role)
            .bind(&claim.claim_reason)
            .bind(&claim.additional_info)
            .bind(&claim.evidence_documents)
            .bind(claim.status)
            .bind(claim.submitted_at)
            .bind(claim.processed_at)
            .bind(claim.processed_by)
            .bind(&claim.admin_notes)
            .bind(&claim.rejection_reason)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    /// Retrieves a claim by its identifier
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM venue_claims WHERE claim_id = $1");
        sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Claims in a status, newest first, at most `limit`
    pub async fn find_by_status(
        &self,
        status: ClaimStatus,
        limit: i64,
    ) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "SELECT {CLAIM_COLUMNS} FROM venue_claims WHERE status = $1 ORDER BY submitted_at DESC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(status)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Every claim for a venue, newest first
    pub async fn find_by_venue(&self, venue_id: Uuid) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "SELECT {CLAIM_COLUMNS} FROM venue_claims WHERE venue_id = $1 ORDER BY submitted_at DESC"
        );
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Every claim by a claimant, newest first
    pub async fn find_by_claimant(&self, claimant_id: Uuid) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "SELECT {CLAIM_COLUMNS} FROM venue_claims WHERE claimant_id = $1 ORDER BY submitted_at DESC"
        );
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claimant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Moves a pending claim to a terminal status
    ///
    /// The `status = 'pending'` predicate makes concurrent decisions race on
    /// the row: exactly one wins, the others get `DatabaseError::Conflict`.
    pub async fn transition_to_terminal(
        &self,
        claim_id: Uuid,
        status: ClaimStatus,
        admin_id: Uuid,
        notes: Option<&str>,
    ) -> Result<ClaimRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE venue_claims SET
                status = $2,
                processed_at = $3,
                processed_by = $4,
                admin_notes = $5,
                rejection_reason = CASE WHEN $2 = 'rejected'::claim_status THEN $5 ELSE NULL END
            WHERE claim_id = $1 AND status = 'pending'
            RETURNING {CLAIM_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .bind(status)
            .bind(Utc::now())
            .bind(admin_id)
            .bind(notes)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(row) => Ok(row),
            None => {
                let current = self.get_by_id(claim_id).await?;
                Err(DatabaseError::Conflict(format!(
                    "claim {} is {:?}, not pending",
                    claim_id, current.status
                )))
            }
        }
    }

    /// Verifies connectivity
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

/// Claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

/// Business role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "business_role", rename_all = "snake_case")]
pub enum BusinessRole {
    Owner,
    Manager,
    AuthorizedRepresentative,
}

/// Evidence entry stored in the `evidence_documents` JSONB column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceDocumentRow {
    pub name: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub venue_id: Uuid,
    pub claimant_id: Uuid,
    pub claimant_name: String,
    pub claimant_email: String,
    pub venue_name: String,
    pub venue_category: String,
    pub business_name: String,
    pub business_email: String,
    pub business_phone: String,
    pub business_role: BusinessRole,
    pub claim_reason: String,
    pub additional_info: Option<String>,
    pub evidence_documents: Json<Vec<EvidenceDocumentRow>>,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
}
