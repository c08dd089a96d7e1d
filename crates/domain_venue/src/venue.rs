//! Venue ownership slice
//!
//! Only the fields that the claim workflow reads or mutates live here. Venue
//! content (descriptions, opening hours, photos) is managed elsewhere.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CoreError, UserId, VenueId};
use crate::error::VenueError;

/// Ownership state of a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueClaimStatus {
    /// No claim awaiting a decision and no verified owner
    Unclaimed,
    /// At least one claim is awaiting a decision
    PendingClaim,
    /// An approved claim resolved the venue to a verified owner
    Verified,
}

impl VenueClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueClaimStatus::Unclaimed => "unclaimed",
            VenueClaimStatus::PendingClaim => "pending_claim",
            VenueClaimStatus::Verified => "verified",
        }
    }
}

impl fmt::Display for VenueClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueClaimStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unclaimed" => Ok(VenueClaimStatus::Unclaimed),
            "pending_claim" => Ok(VenueClaimStatus::PendingClaim),
            "verified" => Ok(VenueClaimStatus::Verified),
            other => Err(CoreError::unknown_variant("venue claim status", other)),
        }
    }
}

/// How a venue's owner was verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    AdminApproval,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::AdminApproval => "admin_approval",
        }
    }
}

impl FromStr for VerificationMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin_approval" => Ok(VerificationMethod::AdminApproval),
            other => Err(CoreError::unknown_variant("verification method", other)),
        }
    }
}

/// Legal name and verified contact details echoed from an approved claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub legal_name: String,
    pub email: String,
    pub phone: String,
}

/// The decision applied to a venue when one of its claims leaves `pending`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimResolution {
    /// The claimant becomes the verified owner
    Approved {
        owner_id: UserId,
        business_details: BusinessDetails,
    },
    Rejected,
}

/// A venue, restricted to its ownership-relevant fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub category: String,
    pub claim_status: VenueClaimStatus,
    /// Claims referencing this venue that are still `pending`
    pub pending_claims_count: u32,
    pub verified_owner_id: Option<UserId>,
    pub is_business_verified: bool,
    pub verification_date: Option<DateTime<Utc>>,
    pub verification_method: Option<VerificationMethod>,
    pub business_details: Option<BusinessDetails>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// Creates an unclaimed venue
    pub fn new(id: VenueId, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            claim_status: VenueClaimStatus::Unclaimed,
            pending_claims_count: 0,
            verified_owner_id: None,
            is_business_verified: false,
            verification_date: None,
            verification_method: None,
            business_details: None,
            updated_at: Utc::now(),
        }
    }

    /// Registers one more pending claim against the venue
    ///
    /// Only an `unclaimed` venue moves to `pending_claim`; a verified venue
    /// keeps its owner while the new claim is reviewed.
    pub fn mark_pending_claim(&mut self) {
        self.pending_claims_count = self.pending_claims_count.saturating_add(1);
        if self.claim_status == VenueClaimStatus::Unclaimed {
            self.claim_status = VenueClaimStatus::PendingClaim;
        }
        self.updated_at = Utc::now();
    }

    /// Applies the outcome of one pending claim
    ///
    /// The counter is floored at zero. A rejection leaves the venue
    /// `pending_claim` while other claims still await a decision, keeps a
    /// verified owner in place, and otherwise returns it to `unclaimed`.
    pub fn resolve_claim(&mut self, resolution: &ClaimResolution) -> Result<(), VenueError> {
        if let ClaimResolution::Approved { owner_id, .. } = resolution {
            self.ensure_owner_free(*owner_id)?;
        }

        let now = Utc::now();
        self.pending_claims_count = self.pending_claims_count.saturating_sub(1);

        match resolution {
            ClaimResolution::Approved { owner_id, business_details } => {
                self.apply_owner(*owner_id, business_details, now);
            }
            ClaimResolution::Rejected => {
                if self.claim_status != VenueClaimStatus::Verified {
                    self.claim_status = if self.pending_claims_count > 0 {
                        VenueClaimStatus::PendingClaim
                    } else {
                        VenueClaimStatus::Unclaimed
                    };
                }
            }
        }

        self.updated_at = now;
        Ok(())
    }

    /// Records `owner_id` as the verified owner without touching the counter
    ///
    /// Repeating the call for the current owner changes nothing, so the
    /// original verification date survives.
    pub fn verify_owner(
        &mut self,
        owner_id: UserId,
        business_details: &BusinessDetails,
    ) -> Result<(), VenueError> {
        self.ensure_owner_free(owner_id)?;
        if self.verified_owner_id == Some(owner_id) && self.claim_status == VenueClaimStatus::Verified {
            return Ok(());
        }
        let now = Utc::now();
        self.apply_owner(owner_id, business_details, now);
        self.updated_at = now;
        Ok(())
    }

    fn ensure_owner_free(&self, owner_id: UserId) -> Result<(), VenueError> {
        match self.verified_owner_id {
            Some(existing) if existing != owner_id => Err(VenueError::OwnershipConflict {
                venue_id: self.id,
                owner_id: existing,
            }),
            _ => Ok(()),
        }
    }

    fn apply_owner(&mut self, owner_id: UserId, business_details: &BusinessDetails, now: DateTime<Utc>) {
        self.claim_status = VenueClaimStatus::Verified;
        self.verified_owner_id = Some(owner_id);
        self.is_business_verified = true;
        self.verification_date = Some(now);
        self.verification_method = Some(VerificationMethod::AdminApproval);
        self.business_details = Some(business_details.clone());
    }

    /// Overwrites the pending counter with a recomputed value
    ///
    /// Used by reconciliation only. The claim status is re-derived so that a
    /// venue with no pending claims and no owner reads `unclaimed`.
    pub fn reset_pending_claims(&mut self, count: u32) {
        self.pending_claims_count = count;
        if self.claim_status != VenueClaimStatus::Verified {
            self.claim_status = if count > 0 {
                VenueClaimStatus::PendingClaim
            } else {
                VenueClaimStatus::Unclaimed
            };
        }
        self.updated_at = Utc::now();
    }

    /// Checks the verified-owner invariant
    pub fn check_invariants(&self) -> Result<(), VenueError> {
        if self.claim_status == VenueClaimStatus::Verified
            && (self.verified_owner_id.is_none() || !self.is_business_verified)
        {
            return Err(VenueError::InvariantViolation(format!(
                "venue {} is verified without a verified owner",
                self.id
            )));
        }
        Ok(())
    }
}
