//! Reconciliation of partially applied transitions
//!
//! A claim write and the venue/relationship writes that follow it live in
//! different stores. When a later step fails, the workflow records a
//! [`PartialTransition`] naming the step that did not apply, and the
//! [`Reconciler`] repairs that step (and anything after it) on operator
//! request. A failed write may still have committed, so repairs only use
//! idempotent writes: the pending counter is recomputed from the stored
//! claims, and an approval sets the owner without touching the counter.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use core_kernel::{ClaimId, CoreError, PortError, ReconciliationId, UserId, VenueId};
use domain_venue::{OwnershipRelationship, RelationshipPort, Venue, VenuePort};

use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::ports::{ClaimPort, ReconciliationSink};

/// The write that failed after the claim itself was stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStep {
    /// Submission: venue counter increment
    PendingCounter,
    /// Decision: venue counter decrement and claim-state update
    VenueResolution,
    /// Decision: ownership relationship insert
    RelationshipCreation,
}

impl TransitionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStep::PendingCounter => "pending_counter",
            TransitionStep::VenueResolution => "venue_resolution",
            TransitionStep::RelationshipCreation => "relationship_creation",
        }
    }
}

impl fmt::Display for TransitionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_counter" => Ok(TransitionStep::PendingCounter),
            "venue_resolution" => Ok(TransitionStep::VenueResolution),
            "relationship_creation" => Ok(TransitionStep::RelationshipCreation),
            other => Err(CoreError::unknown_variant("transition step", other)),
        }
    }
}

/// A claim whose dependent writes did not all apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialTransition {
    pub id: ReconciliationId,
    pub claim_id: ClaimId,
    pub venue_id: VenueId,
    pub claimant_id: UserId,
    /// Status the claim was stored with
    pub claim_status: ClaimStatus,
    pub failed_step: TransitionStep,
    pub error: String,
    pub recorded_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl PartialTransition {
    pub fn new(claim: &Claim, failed_step: TransitionStep, error: &PortError) -> Self {
        Self {
            id: ReconciliationId::new_v7(),
            claim_id: claim.id,
            venue_id: claim.venue_id,
            claimant_id: claim.claimant_id,
            claim_status: claim.status,
            failed_step,
            error: error.to_string(),
            recorded_at: Utc::now(),
            resolved_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// Operator tooling for the reconciliation queue
#[derive(Clone)]
pub struct Reconciler {
    claims: Arc<dyn ClaimPort>,
    venues: Arc<dyn VenuePort>,
    relationships: Arc<dyn RelationshipPort>,
    sink: Arc<dyn ReconciliationSink>,
}

impl Reconciler {
    pub fn new(
        claims: Arc<dyn ClaimPort>,
        venues: Arc<dyn VenuePort>,
        relationships: Arc<dyn RelationshipPort>,
        sink: Arc<dyn ReconciliationSink>,
    ) -> Self {
        Self {
            claims,
            venues,
            relationships,
            sink,
        }
    }

    /// Entries still awaiting reconciliation
    pub async fn unresolved(&self) -> Result<Vec<PartialTransition>, ClaimError> {
        self.sink.unresolved().await.map_err(ClaimError::Storage)
    }

    /// Re-applies the missing writes for one entry and marks it resolved
    ///
    /// Already-resolved entries are returned unchanged.
    #[instrument(skip_all, fields(reconciliation_id = %id))]
    pub async fn reconcile(&self, id: ReconciliationId) -> Result<PartialTransition, ClaimError> {
        let entry = self.sink.get(id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::ReconciliationNotFound(id)
            } else {
                ClaimError::Storage(e)
            }
        })?;
        if entry.is_resolved() {
            return Ok(entry);
        }

        let claim = self.claims.get(entry.claim_id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::ClaimNotFound(entry.claim_id)
            } else {
                ClaimError::Storage(e)
            }
        })?;

        match entry.failed_step {
            TransitionStep::PendingCounter => {
                self.recount_pending(claim.venue_id).await?;
            }
            TransitionStep::VenueResolution => match claim.status {
                ClaimStatus::Approved => {
                    self.ensure_verified_owner(&claim).await?;
                    self.recount_pending(claim.venue_id).await?;
                    self.ensure_owner_relationship(&claim).await?;
                }
                ClaimStatus::Rejected => {
                    self.recount_pending(claim.venue_id).await?;
                }
                ClaimStatus::Pending => {
                    return Err(ClaimError::InvalidStatusTransition {
                        from: ClaimStatus::Pending,
                        to: entry.claim_status,
                    })
                }
            },
            TransitionStep::RelationshipCreation => {
                self.ensure_owner_relationship(&claim).await?;
            }
        }

        let resolved = self.sink.mark_resolved(id).await.map_err(ClaimError::Storage)?;
        info!(claim_id = %claim.id, step = %entry.failed_step, "Partial transition reconciled");
        Ok(resolved)
    }

    /// Recomputes a venue's pending counter from its claims and stores it
    ///
    /// This scans every claim for the venue and is meant for repair only.
    #[instrument(skip_all, fields(venue_id = %venue_id))]
    pub async fn recount_pending(&self, venue_id: VenueId) -> Result<Venue, ClaimError> {
        let claims = self
            .claims
            .list_by_venue(venue_id)
            .await
            .map_err(ClaimError::Storage)?;
        let pending = claims
            .iter()
            .filter(|c| c.status == ClaimStatus::Pending)
            .count() as u32;

        let venue = self
            .venues
            .set_pending_claims_count(venue_id, pending)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ClaimError::VenueNotFound(venue_id)
                } else {
                    ClaimError::Storage(e)
                }
            })?;
        info!(pending_claims = pending, "Pending claim counter recomputed");
        Ok(venue)
    }

    async fn ensure_verified_owner(&self, claim: &Claim) -> Result<(), ClaimError> {
        match self
            .venues
            .set_verified_owner(claim.venue_id, claim.claimant_id, claim.business_details())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.is_conflict() => {
                let venue = self.venues.get(claim.venue_id).await.map_err(ClaimError::Storage)?;
                warn!(claim_id = %claim.id, owner_id = ?venue.verified_owner_id, "Venue verified for another user");
                Err(ClaimError::OwnershipConflict {
                    venue_id: claim.venue_id,
                    owner_id: venue.verified_owner_id.unwrap_or(claim.claimant_id),
                })
            }
            Err(e) => Err(ClaimError::Storage(e)),
        }
    }

    async fn ensure_owner_relationship(&self, claim: &Claim) -> Result<(), ClaimError> {
        let relationship = OwnershipRelationship::owner(claim.claimant_id, claim.venue_id);
        match self.relationships.create(relationship).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_conflict() => {
                let existing = self
                    .relationships
                    .find_owner(claim.venue_id)
                    .await
                    .map_err(ClaimError::Storage)?;
                match existing {
                    Some(owner) if owner.user_id == claim.claimant_id => Ok(()),
                    Some(owner) => {
                        warn!(claim_id = %claim.id, owner_id = %owner.user_id, "Venue owned by another user");
                        Err(ClaimError::OwnershipConflict {
                            venue_id: claim.venue_id,
                            owner_id: owner.user_id,
                        })
                    }
                    None => Err(ClaimError::Storage(e)),
                }
            }
            Err(e) => Err(ClaimError::Storage(e)),
        }
    }
}
