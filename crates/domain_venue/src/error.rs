//! Venue domain errors

use thiserror::Error;

use core_kernel::{UserId, VenueId};

/// Errors that can occur in the venue ownership domain
#[derive(Debug, Error)]
pub enum VenueError {
    #[error("Venue {venue_id} is already verified to {owner_id}")]
    OwnershipConflict { venue_id: VenueId, owner_id: UserId },

    #[error("Venue invariant violated: {0}")]
    InvariantViolation(String),
}
