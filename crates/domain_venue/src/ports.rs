//! Venue Domain Ports
//!
//! Storage interfaces for the ownership slice of a venue and for ownership
//! relationships. Implementations live in `infra_db` (PostgreSQL) and in
//! [`crate::adapters`] (in-memory).
//!
//! # Atomicity
//!
//! `mark_pending_claim` and `resolve_claim` are read-modify-write operations on
//! a shared counter. Implementations must apply each call atomically against
//! the stored row (a single `UPDATE`, or a write lock held across the change)
//! and must never compute the new value from a copy the caller read earlier.

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, UserId, VenueId};

use crate::relationship::OwnershipRelationship;
use crate::venue::{BusinessDetails, ClaimResolution, Venue};

/// Persistence for the venue ownership slice
#[async_trait]
pub trait VenuePort: DomainPort {
    /// Retrieves a venue, or `PortError::NotFound`
    async fn get(&self, id: VenueId) -> Result<Venue, PortError>;

    /// Increments the pending counter and flags an unclaimed venue `pending_claim`
    async fn mark_pending_claim(&self, id: VenueId) -> Result<Venue, PortError>;

    /// Decrements the pending counter (floored at zero) and applies the outcome
    ///
    /// Returns `PortError::Conflict` when an approval names a different owner
    /// than the one already verified; nothing is written in that case.
    async fn resolve_claim(
        &self,
        id: VenueId,
        resolution: ClaimResolution,
    ) -> Result<Venue, PortError>;

    /// Records a verified owner without changing the pending counter
    ///
    /// Idempotent for the current owner. Returns `PortError::Conflict` when
    /// a different owner is already verified.
    async fn set_verified_owner(
        &self,
        id: VenueId,
        owner_id: UserId,
        business_details: BusinessDetails,
    ) -> Result<Venue, PortError>;

    /// Overwrites the pending counter with a value recomputed from claims
    async fn set_pending_claims_count(&self, id: VenueId, count: u32) -> Result<Venue, PortError>;
}

/// Persistence for ownership relationships
#[async_trait]
pub trait RelationshipPort: DomainPort {
    /// Stores a new relationship
    ///
    /// Returns `PortError::Conflict` if the venue already has an owner.
    async fn create(
        &self,
        relationship: OwnershipRelationship,
    ) -> Result<OwnershipRelationship, PortError>;

    /// The owner edge for a venue, if one exists
    async fn find_owner(&self, venue_id: VenueId) -> Result<Option<OwnershipRelationship>, PortError>;

    /// All relationships held by a user
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OwnershipRelationship>, PortError>;
}
