//! Claim aggregate

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AdminId, ClaimId, CoreError, UserId, VenueId};
use domain_venue::{BusinessDetails, Venue};
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Awaiting an administrator decision
    Pending,
    /// Ownership verified
    Approved,
    /// Claim denied
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }

    /// Whether a claim in this status prevents the same claimant from
    /// claiming the same venue again
    pub fn blocks_reclaim(&self) -> bool {
        matches!(self, ClaimStatus::Pending | ClaimStatus::Approved)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(CoreError::unknown_variant("claim status", other)),
        }
    }
}

/// The claimant's asserted role in the business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessRole {
    Owner,
    Manager,
    AuthorizedRepresentative,
}

impl BusinessRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessRole::Owner => "owner",
            BusinessRole::Manager => "manager",
            BusinessRole::AuthorizedRepresentative => "authorized_representative",
        }
    }
}

impl FromStr for BusinessRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(BusinessRole::Owner),
            "manager" => Ok(BusinessRole::Manager),
            "authorized_representative" => Ok(BusinessRole::AuthorizedRepresentative),
            other => Err(CoreError::unknown_variant("business role", other)),
        }
    }
}

/// An uploaded file supporting a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceDocument {
    pub name: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Identity of the submitting user, captured at submission time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimantProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Business assertions entered by the claimant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDetails {
    pub business_name: String,
    pub business_email: String,
    pub business_phone: String,
    pub business_role: BusinessRole,
    pub claim_reason: String,
    pub additional_info: Option<String>,
}

/// A claimant's assertion of ownership over a venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    pub venue_id: VenueId,
    pub claimant_id: UserId,
    /// Claimant snapshot, never re-synced
    pub claimant_name: String,
    pub claimant_email: String,
    /// Venue snapshot, never re-synced
    pub venue_name: String,
    pub venue_category: String,
    pub business_name: String,
    pub business_email: String,
    pub business_phone: String,
    pub business_role: BusinessRole,
    pub claim_reason: String,
    pub additional_info: Option<String>,
    /// Immutable once submitted
    pub evidence_documents: Vec<EvidenceDocument>,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<AdminId>,
    pub admin_notes: Option<String>,
    /// Set only when rejected
    pub rejection_reason: Option<String>,
}

impl Claim {
    /// Creates a pending claim with claimant and venue snapshots
    pub fn submitted(
        id: ClaimId,
        venue: &Venue,
        claimant: ClaimantProfile,
        details: ClaimDetails,
        evidence_documents: Vec<EvidenceDocument>,
    ) -> Self {
        Self {
            id,
            venue_id: venue.id,
            claimant_id: claimant.id,
            claimant_name: claimant.name,
            claimant_email: claimant.email,
            venue_name: venue.name.clone(),
            venue_category: venue.category.clone(),
            business_name: details.business_name,
            business_email: details.business_email,
            business_phone: details.business_phone,
            business_role: details.business_role,
            claim_reason: details.claim_reason,
            additional_info: details.additional_info,
            evidence_documents,
            status: ClaimStatus::Pending,
            submitted_at: Utc::now(),
            processed_at: None,
            processed_by: None,
            admin_notes: None,
            rejection_reason: None,
        }
    }

    /// Moves the claim to a terminal status, stamping the audit fields once
    pub fn transition_to_terminal(
        &mut self,
        target: ClaimStatus,
        admin_id: AdminId,
        notes: Option<String>,
    ) -> Result<(), ClaimError> {
        if !self.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        self.processed_at = Some(Utc::now());
        self.processed_by = Some(admin_id);
        if target == ClaimStatus::Rejected {
            self.rejection_reason = notes.clone();
        }
        self.admin_notes = notes;
        Ok(())
    }

    /// Contact details echoed onto the venue when the claim is approved
    pub fn business_details(&self) -> BusinessDetails {
        BusinessDetails {
            legal_name: self.business_name.clone(),
            email: self.business_email.clone(),
            phone: self.business_phone.clone(),
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (Pending, Approved) |
            (Pending, Rejected)
        )
    }
}
