//! PostgreSQL Venue and Relationship Adapters

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, PortError, RelationshipId, UserId, VenueId,
};
use domain_venue::{
    BusinessDetails, ClaimResolution, OwnershipRelationship, RelationshipPort, RelationshipType,
    Venue, VenueClaimStatus, VenuePort, VerificationMethod,
};

use crate::repositories::relationships::{
    RelationshipRepository, RelationshipRow, RelationshipType as DbRelationshipType,
};
use crate::repositories::venues::{
    BusinessDetailsRow, VenueClaimStatus as DbVenueClaimStatus, VenueRepository, VenueRow,
    VerificationMethod as DbVerificationMethod,
};

/// PostgreSQL-backed implementation of the VenuePort trait
#[derive(Debug, Clone)]
pub struct PostgresVenueAdapter {
    repository: VenueRepository,
    pool: PgPool,
}

impl PostgresVenueAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VenueRepository::new(pool.clone()),
            pool,
        }
    }

    /// Stores a venue; used to seed the ownership slice
    pub async fn insert(&self, venue: &Venue) -> Result<Venue, PortError> {
        let row = self.repository.insert(&venue_to_row(venue)).await?;
        Ok(row_to_venue(row))
    }

    fn not_found(id: VenueId) -> impl FnOnce(crate::DatabaseError) -> PortError {
        move |e| {
            if e.is_not_found() {
                PortError::not_found("Venue", id)
            } else {
                e.into()
            }
        }
    }
}

impl DomainPort for PostgresVenueAdapter {}

#[async_trait]
impl HealthCheckable for PostgresVenueAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-venue-adapter").await
    }
}

#[async_trait]
impl VenuePort for PostgresVenueAdapter {
    async fn get(&self, id: VenueId) -> Result<Venue, PortError> {
        let row = self
            .repository
            .get_by_id(*id.as_uuid())
            .await
            .map_err(Self::not_found(id))?;
        Ok(row_to_venue(row))
    }

    #[instrument(skip(self), fields(venue_id = %id))]
    async fn mark_pending_claim(&self, id: VenueId) -> Result<Venue, PortError> {
        let row = self
            .repository
            .increment_pending(*id.as_uuid())
            .await
            .map_err(Self::not_found(id))?;
        Ok(row_to_venue(row))
    }

    #[instrument(skip(self, resolution), fields(venue_id = %id))]
    async fn resolve_claim(&self, id: VenueId, resolution: ClaimResolution) -> Result<Venue, PortError> {
        let row = match resolution {
            ClaimResolution::Approved {
                owner_id,
                business_details,
            } => {
                let details = details_row(business_details);
                self.repository
                    .resolve_approved(*id.as_uuid(), *owner_id.as_uuid(), &details)
                    .await
            }
            ClaimResolution::Rejected => self.repository.resolve_rejected(*id.as_uuid()).await,
        }
        .map_err(Self::not_found(id))?;
        Ok(row_to_venue(row))
    }

    #[instrument(skip(self, business_details), fields(venue_id = %id, owner_id = %owner_id))]
    async fn set_verified_owner(
        &self,
        id: VenueId,
        owner_id: UserId,
        business_details: BusinessDetails,
    ) -> Result<Venue, PortError> {
        let details = details_row(business_details);
        let row = self
            .repository
            .set_owner(*id.as_uuid(), *owner_id.as_uuid(), &details)
            .await
            .map_err(Self::not_found(id))?;
        Ok(row_to_venue(row))
    }

    #[instrument(skip(self), fields(venue_id = %id))]
    async fn set_pending_claims_count(&self, id: VenueId, count: u32) -> Result<Venue, PortError> {
        let count = i32::try_from(count)
            .map_err(|_| PortError::validation_field("pending count out of range", "count"))?;
        let row = self
            .repository
            .set_pending_count(*id.as_uuid(), count)
            .await
            .map_err(Self::not_found(id))?;
        Ok(row_to_venue(row))
    }
}

/// PostgreSQL-backed implementation of the RelationshipPort trait
#[derive(Debug, Clone)]
pub struct PostgresRelationshipAdapter {
    repository: RelationshipRepository,
    pool: PgPool,
}

impl PostgresRelationshipAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RelationshipRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresRelationshipAdapter {}

#[async_trait]
impl HealthCheckable for PostgresRelationshipAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-relationship-adapter").await
    }
}

#[async_trait]
impl RelationshipPort for PostgresRelationshipAdapter {
    #[instrument(skip_all, fields(venue_id = %relationship.venue_id, user_id = %relationship.user_id))]
    async fn create(&self, relationship: OwnershipRelationship) -> Result<OwnershipRelationship, PortError> {
        let row = RelationshipRow {
            relationship_id: *relationship.id.as_uuid(),
            user_id: *relationship.user_id.as_uuid(),
            venue_id: *relationship.venue_id.as_uuid(),
            relationship_type: match relationship.relationship_type {
                RelationshipType::Owner => DbRelationshipType::Owner,
            },
            created_at: relationship.created_at,
        };
        let inserted = self.repository.insert(&row).await?;
        Ok(row_to_relationship(inserted))
    }

    async fn find_owner(&self, venue_id: VenueId) -> Result<Option<OwnershipRelationship>, PortError> {
        let row = self.repository.find_owner(*venue_id.as_uuid()).await?;
        Ok(row.map(row_to_relationship))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OwnershipRelationship>, PortError> {
        let rows = self.repository.find_by_user(*user_id.as_uuid()).await?;
        Ok(rows.into_iter().map(row_to_relationship).collect())
    }
}

fn row_to_relationship(row: RelationshipRow) -> OwnershipRelationship {
    OwnershipRelationship {
        id: RelationshipId::from_uuid(row.relationship_id),
        user_id: UserId::from_uuid(row.user_id),
        venue_id: VenueId::from_uuid(row.venue_id),
        relationship_type: match row.relationship_type {
            DbRelationshipType::Owner => RelationshipType::Owner,
        },
        created_at: row.created_at,
    }
}

fn details_row(details: BusinessDetails) -> BusinessDetailsRow {
    BusinessDetailsRow {
        legal_name: details.legal_name,
        email: details.email,
        phone: details.phone,
    }
}

fn venue_to_row(venue: &Venue) -> VenueRow {
    VenueRow {
        venue_id: *venue.id.as_uuid(),
        name: venue.name.clone(),
        category: venue.category.clone(),
        claim_status: match venue.claim_status {
            VenueClaimStatus::Unclaimed => DbVenueClaimStatus::Unclaimed,
            VenueClaimStatus::PendingClaim => DbVenueClaimStatus::PendingClaim,
            VenueClaimStatus::Verified => DbVenueClaimStatus::Verified,
        },
        pending_claims_count: i32::try_from(venue.pending_claims_count).unwrap_or(i32::MAX),
        verified_owner_id: venue.verified_owner_id.map(|id| *id.as_uuid()),
        is_business_verified: venue.is_business_verified,
        verification_date: venue.verification_date,
        verification_method: venue.verification_method.map(|m| match m {
            VerificationMethod::AdminApproval => DbVerificationMethod::AdminApproval,
        }),
        business_legal_name: venue.business_details.as_ref().map(|d| d.legal_name.clone()),
        business_email: venue.business_details.as_ref().map(|d| d.email.clone()),
        business_phone: venue.business_details.as_ref().map(|d| d.phone.clone()),
        updated_at: venue.updated_at,
    }
}

fn row_to_venue(row: VenueRow) -> Venue {
    let business_details = match (row.business_legal_name, row.business_email, row.business_phone) {
        (Some(legal_name), Some(email), Some(phone)) => Some(BusinessDetails {
            legal_name,
            email,
            phone,
        }),
        _ => None,
    };

    Venue {
        id: VenueId::from_uuid(row.venue_id),
        name: row.name,
        category: row.category,
        claim_status: match row.claim_status {
            DbVenueClaimStatus::Unclaimed => VenueClaimStatus::Unclaimed,
            DbVenueClaimStatus::PendingClaim => VenueClaimStatus::PendingClaim,
            DbVenueClaimStatus::Verified => VenueClaimStatus::Verified,
        },
        // The column carries a CHECK (>= 0)
        pending_claims_count: u32::try_from(row.pending_claims_count).unwrap_or(0),
        verified_owner_id: row.verified_owner_id.map(UserId::from_uuid),
        is_business_verified: row.is_business_verified,
        verification_date: row.verification_date,
        verification_method: row.verification_method.map(|m| match m {
            DbVerificationMethod::AdminApproval => VerificationMethod::AdminApproval,
        }),
        business_details,
        updated_at: row.updated_at,
    }
}
