//! Ownership relationship edge
//!
//! Created exactly once when a claim is approved. The record is an edge between
//! a user and a venue; it is never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{RelationshipId, UserId, VenueId};

/// Kind of link between a user and a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Owner,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Owner => "owner",
        }
    }
}

/// A persisted user-to-venue ownership link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRelationship {
    pub id: RelationshipId,
    pub user_id: UserId,
    pub venue_id: VenueId,
    pub relationship_type: RelationshipType,
    pub created_at: DateTime<Utc>,
}

impl OwnershipRelationship {
    /// Creates an `owner` edge stamped with the current time
    pub fn owner(user_id: UserId, venue_id: VenueId) -> Self {
        Self {
            id: RelationshipId::new_v7(),
            user_id,
            venue_id,
            relationship_type: RelationshipType::Owner,
            created_at: Utc::now(),
        }
    }
}
