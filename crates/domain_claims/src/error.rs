//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, PortError, ReconciliationId, UserId, VenueId};
use crate::claim::ClaimStatus;
use crate::reconciliation::TransitionStep;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Venue not found: {0}")]
    VenueNotFound(VenueId),

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("User {claimant_id} already has an active claim for venue {venue_id}")]
    DuplicateClaim { claimant_id: UserId, venue_id: VenueId },

    #[error("Evidence upload failed for '{file_name}': {source}")]
    EvidenceUpload {
        file_name: String,
        #[source]
        source: PortError,
    },

    #[error("Storage error: {0}")]
    Storage(#[source] PortError),

    #[error("Claim {claim_id} was already processed (status: {status})")]
    AlreadyProcessed { claim_id: ClaimId, status: ClaimStatus },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Venue {venue_id} already has a verified owner ({owner_id})")]
    OwnershipConflict { venue_id: VenueId, owner_id: UserId },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    #[error("Claim {claim_id} left partially applied at step {step}: {source}")]
    PartialTransition {
        claim_id: ClaimId,
        /// Queue entry for reconciliation tooling, if it could be recorded
        reconciliation_id: Option<ReconciliationId>,
        step: TransitionStep,
        #[source]
        source: PortError,
    },

    #[error("Reconciliation entry not found: {0}")]
    ReconciliationNotFound(ReconciliationId),
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }

    /// Storage failures are the only errors worth retrying by the caller
    pub fn is_retryable(&self) -> bool {
        match self {
            ClaimError::Storage(_) => true,
            ClaimError::EvidenceUpload { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Errors that leave nothing changed and will fail the same way on retry
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimError::DuplicateClaim { .. }
                | ClaimError::AlreadyProcessed { .. }
                | ClaimError::Validation(_)
                | ClaimError::VenueNotFound(_)
                | ClaimError::ClaimNotFound(_)
                | ClaimError::OwnershipConflict { .. }
                | ClaimError::InvalidStatusTransition { .. }
        )
    }
}
