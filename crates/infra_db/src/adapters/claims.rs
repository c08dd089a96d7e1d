//! PostgreSQL Claim Adapter
//!
//! Implements [`ClaimPort`] on top of [`ClaimsRepository`]. The partial
//! unique index on `(claimant_id, venue_id)` turns a racing duplicate
//! submission into `PortError::Conflict`, which the workflow reports as a
//! duplicate claim.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdminId, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId, VenueId,
};
use domain_claims::{BusinessRole, Claim, ClaimPort, ClaimStatus, EvidenceDocument};

use crate::repositories::claims::{
    BusinessRole as DbBusinessRole, ClaimRow, ClaimStatus as DbClaimStatus, ClaimsRepository,
    EvidenceDocumentRow,
};

/// PostgreSQL-backed implementation of the ClaimPort trait
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-claim-adapter").await
    }
}

#[async_trait]
impl ClaimPort for PostgresClaimAdapter {
    #[instrument(skip_all, fields(claim_id = %claim.id, venue_id = %claim.venue_id))]
    async fn create(&self, claim: Claim) -> Result<ClaimId, PortError> {
        let row = claim_to_row(&claim);
        let inserted = self.repository.insert(&row).await?;
        debug!("Claim row inserted");
        Ok(ClaimId::from_uuid(inserted.claim_id))
    }

    async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
        let row = self
            .repository
            .get_by_id(*id.as_uuid())
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => PortError::not_found("Claim", id),
                other => other.into(),
            })?;
        Ok(row_to_claim(row))
    }

    async fn list_by_status(&self, status: ClaimStatus, limit: u32) -> Result<Vec<Claim>, PortError> {
        let rows = self
            .repository
            .find_by_status(status_to_db(status), i64::from(limit))
            .await?;
        Ok(rows.into_iter().map(row_to_claim).collect())
    }

    async fn list_by_venue(&self, venue_id: VenueId) -> Result<Vec<Claim>, PortError> {
        let rows = self.repository.find_by_venue(*venue_id.as_uuid()).await?;
        Ok(rows.into_iter().map(row_to_claim).collect())
    }

    async fn list_by_claimant(&self, claimant_id: UserId) -> Result<Vec<Claim>, PortError> {
        let rows = self.repository.find_by_claimant(*claimant_id.as_uuid()).await?;
        Ok(rows.into_iter().map(row_to_claim).collect())
    }

    #[instrument(skip(self, notes), fields(claim_id = %id, status = %status))]
    async fn transition_to_terminal(
        &self,
        id: ClaimId,
        status: ClaimStatus,
        admin_id: AdminId,
        notes: Option<String>,
    ) -> Result<Claim, PortError> {
        if !status.is_terminal() {
            return Err(PortError::validation_field(
                format!("{} is not a terminal status", status),
                "status",
            ));
        }
        let row = self
            .repository
            .transition_to_terminal(*id.as_uuid(), status_to_db(status), *admin_id.as_uuid(), notes.as_deref())
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => PortError::not_found("Claim", id),
                other => other.into(),
            })?;
        Ok(row_to_claim(row))
    }
}

pub(crate) fn status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Pending => DbClaimStatus::Pending,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

pub(crate) fn status_from_db(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Pending => ClaimStatus::Pending,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}

fn role_to_db(role: BusinessRole) -> DbBusinessRole {
    match role {
        BusinessRole::Owner => DbBusinessRole::Owner,
        BusinessRole::Manager => DbBusinessRole::Manager,
        BusinessRole::AuthorizedRepresentative => DbBusinessRole::AuthorizedRepresentative,
    }
}

fn role_from_db(role: DbBusinessRole) -> BusinessRole {
    match role {
        DbBusinessRole::Owner => BusinessRole::Owner,
        DbBusinessRole::Manager => BusinessRole::Manager,
        DbBusinessRole::AuthorizedRepresentative => BusinessRole::AuthorizedRepresentative,
    }
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: *claim.id.as_uuid(),
        venue_id: *claim.venue_id.as_uuid(),
        claimant_id: *claim.claimant_id.as_uuid(),
        claimant_name: claim.claimant_name.clone(),
        claimant_email: claim.claimant_email.clone(),
        venue_name: claim.venue_name.clone(),
        venue_category: claim.venue_category.clone(),
        business_name: claim.business_name.clone(),
        business_email: claim.business_email.clone(),
        business_phone: claim.business_phone.clone(),
        business_role: role_to_db(claim.business_role),
        claim_reason: claim.claim_reason.clone(),
        additional_info: claim.additional_info.clone(),
        evidence_documents: Json(
            claim
                .evidence_documents
                .iter()
                .map(|d| EvidenceDocumentRow {
                    name: d.name.clone(),
                    url: d.url.clone(),
                    uploaded_at: d.uploaded_at,
                })
                .collect(),
        ),
        status: status_to_db(claim.status),
        submitted_at: claim.submitted_at,
        processed_at: claim.processed_at,
        processed_by: claim.processed_by.map(|id| *id.as_uuid()),
        admin_notes: claim.admin_notes.clone(),
        rejection_reason: claim.rejection_reason.clone(),
    }
}

fn row_to_claim(row: ClaimRow) -> Claim {
    Claim {
        id: ClaimId::from_uuid(row.claim_id),
        venue_id: VenueId::from_uuid(row.venue_id),
        claimant_id: UserId::from_uuid(row.claimant_id),
        claimant_name: row.claimant_name,
        claimant_email: row.claimant_email,
        venue_name: row.venue_name,
        venue_category: row.venue_category,
        business_name: row.business_name,
        business_email: row.business_email,
        business_phone: row.business_phone,
        business_role: role_from_db(row.business_role),
        claim_reason: row.claim_reason,
        additional_info: row.additional_info,
        evidence_documents: row
            .evidence_documents
            .0
            .into_iter()
            .map(|d| EvidenceDocument {
                name: d.name,
                url: d.url,
                uploaded_at: d.uploaded_at,
            })
            .collect(),
        status: status_from_db(row.status),
        submitted_at: row.submitted_at,
        processed_at: row.processed_at,
        processed_by: row.processed_by.map(AdminId::from_uuid),
        admin_notes: row.admin_notes,
        rejection_reason: row.rejection_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::{ClaimDetails, ClaimantProfile};
    use domain_venue::Venue;

    #[test]
    fn test_claim_row_round_trip_preserves_fields() {
        let venue = Venue::new(VenueId::new(), "The Brown Bag", "cafe");
        let mut claim = Claim::submitted(
            ClaimId::new_v7(),
            &venue,
            ClaimantProfile {
                id: UserId::new(),
                name: "Casey".to_string(),
                email: "casey@example.test".to_string(),
            },
            ClaimDetails {
                business_name: "Brown Bag LLC".to_string(),
                business_email: "owner@brownbag.test".to_string(),
                business_phone: "555-0100".to_string(),
                business_role: BusinessRole::AuthorizedRepresentative,
                claim_reason: "I manage the lease".to_string(),
                additional_info: Some("since 2019".to_string()),
            },
            vec![EvidenceDocument {
                name: "license.pdf".to_string(),
                url: "https://files.example/claims/x/license.pdf".to_string(),
                uploaded_at: chrono::Utc::now(),
            }],
        );
        claim
            .transition_to_terminal(ClaimStatus::Rejected, AdminId::new(), Some("expired".to_string()))
            .unwrap();

        let back = row_to_claim(claim_to_row(&claim));

        assert_eq!(back.id, claim.id);
        assert_eq!(back.business_role, BusinessRole::AuthorizedRepresentative);
        assert_eq!(back.status, ClaimStatus::Rejected);
        assert_eq!(back.processed_by, claim.processed_by);
        assert_eq!(back.rejection_reason.as_deref(), Some("expired"));
        assert_eq!(back.evidence_documents, claim.evidence_documents);
    }
}
