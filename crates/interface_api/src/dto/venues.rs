//! Venue ownership DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_venue::{OwnershipRelationship, RelationshipType, Venue, VenueClaimStatus, VerificationMethod};

#[derive(Debug, Serialize, Deserialize)]
pub struct RelationshipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub relationship_type: RelationshipType,
    pub created_at: DateTime<Utc>,
}

impl From<OwnershipRelationship> for RelationshipResponse {
    fn from(rel: OwnershipRelationship) -> Self {
        Self {
            id: *rel.id.as_uuid(),
            user_id: *rel.user_id.as_uuid(),
            venue_id: *rel.venue_id.as_uuid(),
            relationship_type: rel.relationship_type,
            created_at: rel.created_at,
        }
    }
}

/// Ownership read model of a venue
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnershipResponse {
    pub venue_id: Uuid,
    pub name: String,
    pub category: String,
    pub claim_status: VenueClaimStatus,
    pub pending_claims_count: u32,
    pub verified_owner_id: Option<Uuid>,
    pub is_business_verified: bool,
    pub verification_date: Option<DateTime<Utc>>,
    pub verification_method: Option<VerificationMethod>,
    pub business_legal_name: Option<String>,
    pub owner: Option<RelationshipResponse>,
}

impl OwnershipResponse {
    pub fn new(venue: Venue, owner: Option<OwnershipRelationship>) -> Self {
        Self {
            venue_id: *venue.id.as_uuid(),
            name: venue.name,
            category: venue.category,
            claim_status: venue.claim_status,
            pending_claims_count: venue.pending_claims_count,
            verified_owner_id: venue.verified_owner_id.map(|id| *id.as_uuid()),
            is_business_verified: venue.is_business_verified,
            verification_date: venue.verification_date,
            verification_method: venue.verification_method,
            business_legal_name: venue.business_details.map(|d| d.legal_name),
            owner: owner.map(Into::into),
        }
    }
}
