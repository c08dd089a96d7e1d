//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::{BusinessRole, Claim, ClaimStatus, EvidenceDocument};

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitClaimResponse {
    pub claim_id: Uuid,
    pub status: ClaimStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceDocumentResponse {
    pub name: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<EvidenceDocument> for EvidenceDocumentResponse {
    fn from(doc: EvidenceDocument) -> Self {
        Self {
            name: doc.name,
            url: doc.url,
            uploaded_at: doc.uploaded_at,
        }
    }
}

/// Full claim as shown to its claimant and to reviewers
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub reference: String,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub venue_category: String,
    pub claimant_id: Uuid,
    pub claimant_name: String,
    pub claimant_email: String,
    pub business_name: String,
    pub business_email: String,
    pub business_phone: String,
    pub business_role: BusinessRole,
    pub claim_reason: String,
    pub additional_info: Option<String>,
    pub evidence_documents: Vec<EvidenceDocumentResponse>,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: *claim.id.as_uuid(),
            reference: claim.id.to_string(),
            venue_id: *claim.venue_id.as_uuid(),
            venue_name: claim.venue_name,
            venue_category: claim.venue_category,
            claimant_id: *claim.claimant_id.as_uuid(),
            claimant_name: claim.claimant_name,
            claimant_email: claim.claimant_email,
            business_name: claim.business_name,
            business_email: claim.business_email,
            business_phone: claim.business_phone,
            business_role: claim.business_role,
            claim_reason: claim.claim_reason,
            additional_info: claim.additional_info,
            evidence_documents: claim.evidence_documents.into_iter().map(Into::into).collect(),
            status: claim.status,
            submitted_at: claim.submitted_at,
            processed_at: claim.processed_at,
            processed_by: claim.processed_by.map(|id| *id.as_uuid()),
            admin_notes: claim.admin_notes,
            rejection_reason: claim.rejection_reason,
        }
    }
}

/// Compact row for lists
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub claimant_name: String,
    pub business_role: BusinessRole,
    pub status: ClaimStatus,
    pub evidence_count: usize,
    pub submitted_at: DateTime<Utc>,
}

impl From<Claim> for ClaimSummary {
    fn from(claim: Claim) -> Self {
        Self {
            id: *claim.id.as_uuid(),
            venue_id: *claim.venue_id.as_uuid(),
            venue_name: claim.venue_name,
            claimant_name: claim.claimant_name,
            business_role: claim.business_role,
            status: claim.status,
            evidence_count: claim.evidence_documents.len(),
            submitted_at: claim.submitted_at,
        }
    }
}
