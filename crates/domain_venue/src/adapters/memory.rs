//! In-memory venue and relationship stores
//!
//! State is held in maps guarded by a `tokio::sync::RwLock`. Every mutating
//! call takes the write lock for the whole read-modify-write, which gives the
//! same atomicity the PostgreSQL adapter gets from a single `UPDATE`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{DomainPort, PortError, UserId, VenueId};

use crate::error::VenueError;
use crate::ports::{RelationshipPort, VenuePort};
use crate::relationship::{OwnershipRelationship, RelationshipType};
use crate::venue::{BusinessDetails, ClaimResolution, Venue};

/// In-memory venue store
#[derive(Debug, Default)]
pub struct InMemoryVenueStore {
    venues: RwLock<HashMap<VenueId, Venue>>,
}

impl InMemoryVenueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a venue
    pub async fn insert(&self, venue: Venue) {
        self.venues.write().await.insert(venue.id, venue);
    }

    /// Snapshot of every stored venue
    pub async fn all(&self) -> Vec<Venue> {
        self.venues.read().await.values().cloned().collect()
    }
}

impl DomainPort for InMemoryVenueStore {}

#[async_trait]
impl VenuePort for InMemoryVenueStore {
    async fn get(&self, id: VenueId) -> Result<Venue, PortError> {
        self.venues
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Venue", id))
    }

    async fn mark_pending_claim(&self, id: VenueId) -> Result<Venue, PortError> {
        let mut venues = self.venues.write().await;
        let venue = venues
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Venue", id))?;
        venue.mark_pending_claim();
        Ok(venue.clone())
    }

    async fn resolve_claim(
        &self,
        id: VenueId,
        resolution: ClaimResolution,
    ) -> Result<Venue, PortError> {
        let mut venues = self.venues.write().await;
        let venue = venues
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Venue", id))?;
        venue.resolve_claim(&resolution).map_err(|e| match e {
            VenueError::OwnershipConflict { .. } => PortError::conflict(e.to_string()),
            other => PortError::internal(other.to_string()),
        })?;
        debug!(venue_id = %id, status = %venue.claim_status, pending = venue.pending_claims_count, "Venue resolved");
        Ok(venue.clone())
    }

    async fn set_verified_owner(
        &self,
        id: VenueId,
        owner_id: UserId,
        business_details: BusinessDetails,
    ) -> Result<Venue, PortError> {
        let mut venues = self.venues.write().await;
        let venue = venues
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Venue", id))?;
        venue
            .verify_owner(owner_id, &business_details)
            .map_err(|e| PortError::conflict(e.to_string()))?;
        Ok(venue.clone())
    }

    async fn set_pending_claims_count(&self, id: VenueId, count: u32) -> Result<Venue, PortError> {
        let mut venues = self.venues.write().await;
        let venue = venues
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Venue", id))?;
        venue.reset_pending_claims(count);
        Ok(venue.clone())
    }
}

/// In-memory relationship store enforcing one owner per venue
#[derive(Debug, Default)]
pub struct InMemoryRelationshipStore {
    relationships: RwLock<Vec<OwnershipRelationship>>,
}

impl InMemoryRelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored relationship
    pub async fn all(&self) -> Vec<OwnershipRelationship> {
        self.relationships.read().await.clone()
    }
}

impl DomainPort for InMemoryRelationshipStore {}

#[async_trait]
impl RelationshipPort for InMemoryRelationshipStore {
    async fn create(
        &self,
        relationship: OwnershipRelationship,
    ) -> Result<OwnershipRelationship, PortError> {
        let mut relationships = self.relationships.write().await;
        let owner_exists = relationships.iter().any(|r| {
            r.venue_id == relationship.venue_id && r.relationship_type == RelationshipType::Owner
        });
        if owner_exists && relationship.relationship_type == RelationshipType::Owner {
            return Err(PortError::conflict(format!(
                "venue {} already has an owner",
                relationship.venue_id
            )));
        }
        relationships.push(relationship.clone());
        Ok(relationship)
    }

    async fn find_owner(&self, venue_id: VenueId) -> Result<Option<OwnershipRelationship>, PortError> {
        Ok(self
            .relationships
            .read()
            .await
            .iter()
            .find(|r| r.venue_id == venue_id && r.relationship_type == RelationshipType::Owner)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OwnershipRelationship>, PortError> {
        Ok(self
            .relationships
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}
