//! Venue ownership repository
//!
//! Every counter change is a single `UPDATE` whose new values are computed
//! from the row being updated, so concurrent submissions and decisions for
//! the same venue never lose an increment or decrement.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

const VENUE_COLUMNS: &str = r#"
    venue_id, name, category, claim_status, pending_claims_count,
    verified_owner_id, is_business_verified, verification_date, verification_method,
    business_legal_name, business_email, business_phone, updated_at
"#;

/// Repository for the ownership slice of venues
#[derive(Debug, Clone)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a venue row
    pub async fn insert(&self, venue: &VenueRow) -> Result<VenueRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO venues (
                venue_id, name, category, claim_status, pending_claims_count,
                verified_owner_id, is_business_verified, verification_date, verification_method,
                business_legal_name, business_email, business_phone, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {VENUE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue.venue_id)
            .bind(&venue.name)
            .bind(&venue.category)
            .bind(venue.claim_status)
            .bind(venue.pending_claims_count)
            .bind(venue.verified_owner_id)
            .bind(venue.is_business_verified)
            .bind(venue.verification_date)
            .bind(venue.verification_method)
            .bind(&venue.business_legal_name)
            .bind(&venue.business_email)
            .bind(&venue.business_phone)
            .bind(venue.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Retrieves a venue by its identifier
    pub async fn get_by_id(&self, venue_id: Uuid) -> Result<VenueRow, DatabaseError> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE venue_id = $1");
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Venue", venue_id))
    }

    /// Adds one pending claim; an unclaimed venue becomes `pending_claim`
    pub async fn increment_pending(&self, venue_id: Uuid) -> Result<VenueRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE venues SET
                pending_claims_count = pending_claims_count + 1,
                claim_status = CASE
                    WHEN claim_status = 'unclaimed' THEN 'pending_claim'::venue_claim_status
                    ELSE claim_status
                END,
                updated_at = $2
            WHERE venue_id = $1
            RETURNING {VENUE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Venue", venue_id))
    }

    /// Removes one pending claim and records the approved claimant as owner
    ///
    /// Fails with `DatabaseError::Conflict` when a different owner is already
    /// verified; the row is left untouched in that case.
    pub async fn resolve_approved(
        &self,
        venue_id: Uuid,
        owner_id: Uuid,
        details: &BusinessDetailsRow,
    ) -> Result<VenueRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE venues SET
                pending_claims_count = GREATEST(pending_claims_count - 1, 0),
                claim_status = 'verified',
                verified_owner_id = $2,
                is_business_verified = TRUE,
                verification_date = $3,
                verification_method = 'admin_approval',
                business_legal_name = $4,
                business_email = $5,
                business_phone = $6,
                updated_at = $3
            WHERE venue_id = $1
              AND (verified_owner_id IS NULL OR verified_owner_id = $2)
            RETURNING {VENUE_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue_id)
            .bind(owner_id)
            .bind(Utc::now())
            .bind(&details.legal_name)
            .bind(&details.email)
            .bind(&details.phone)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(row) => Ok(row),
            None => Err(self.owner_conflict(venue_id).await),
        }
    }

    /// Records the verified owner, leaving `pending_claims_count` as it is
    ///
    /// Re-running it for the current owner keeps the original verification
    /// date. A different verified owner is a `DatabaseError::Conflict`.
    pub async fn set_owner(
        &self,
        venue_id: Uuid,
        owner_id: Uuid,
        details: &BusinessDetailsRow,
    ) -> Result<VenueRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE venues SET
                claim_status = 'verified',
                verified_owner_id = $2,
                is_business_verified = TRUE,
                verification_date = COALESCE(verification_date, $3),
                verification_method = 'admin_approval',
                business_legal_name = $4,
                business_email = $5,
                business_phone = $6,
                updated_at = $3
            WHERE venue_id = $1
              AND (verified_owner_id IS NULL OR verified_owner_id = $2)
            RETURNING {VENUE_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue_id)
            .bind(owner_id)
            .bind(Utc::now())
            .bind(&details.legal_name)
            .bind(&details.email)
            .bind(&details.phone)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(row) => Ok(row),
            None => Err(self.owner_conflict(venue_id).await),
        }
    }

    /// Explains why an owner-guarded `UPDATE` matched nothing
    async fn owner_conflict(&self, venue_id: Uuid) -> DatabaseError {
        match self.get_by_id(venue_id).await {
            Ok(current) => DatabaseError::Conflict(format!(
                "venue {} is already owned by {}",
                venue_id,
                current
                    .verified_owner_id
                    .map(|id| id.to_string())
                    .unwrap_or_default()
            )),
            Err(e) => e,
        }
    }

    /// Removes one pending claim after a rejection
    ///
    /// A verified venue stays verified; otherwise the venue stays
    /// `pending_claim` while other claims remain and becomes `unclaimed`
    /// when none do.
    pub async fn resolve_rejected(&self, venue_id: Uuid) -> Result<VenueRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE venues SET
                pending_claims_count = GREATEST(pending_claims_count - 1, 0),
                claim_status = CASE
                    WHEN claim_status = 'verified' THEN claim_status
                    WHEN pending_claims_count - 1 > 0 THEN 'pending_claim'::venue_claim_status
                    ELSE 'unclaimed'::venue_claim_status
                END,
                updated_at = $2
            WHERE venue_id = $1
            RETURNING {VENUE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Venue", venue_id))
    }

    /// Overwrites the pending counter with a recomputed value
    pub async fn set_pending_count(&self, venue_id: Uuid, count: i32) -> Result<VenueRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE venues SET
                pending_claims_count = $2,
                claim_status = CASE
                    WHEN claim_status = 'verified' THEN claim_status
                    WHEN $2 > 0 THEN 'pending_claim'::venue_claim_status
                    ELSE 'unclaimed'::venue_claim_status
                END,
                updated_at = $3
            WHERE venue_id = $1
            RETURNING {VENUE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(venue_id)
            .bind(count)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Venue", venue_id))
    }
}

/// Venue claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "venue_claim_status", rename_all = "snake_case")]
pub enum VenueClaimStatus {
    Unclaimed,
    PendingClaim,
    Verified,
}

/// Verification method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "verification_method", rename_all = "snake_case")]
pub enum VerificationMethod {
    AdminApproval,
}

/// Business contact details written on approval
#[derive(Debug, Clone)]
pub struct BusinessDetailsRow {
    pub legal_name: String,
    pub email: String,
    pub phone: String,
}

/// Database row for a venue
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueRow {
    pub venue_id: Uuid,
    pub name: String,
    pub category: String,
    pub claim_status: VenueClaimStatus,
    pub pending_claims_count: i32,
    pub verified_owner_id: Option<Uuid>,
    pub is_business_verified: bool,
    pub verification_date: Option<DateTime<Utc>>,
    pub verification_method: Option<VerificationMethod>,
    pub business_legal_name: Option<String>,
    pub business_email: Option<String>,
    pub business_phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}
