//! Test Data Builders
//!
//! Builder patterns for claim submissions and venues. Tests specify only
//! the fields they care about and take fixture defaults for the rest.

use core_kernel::{UserId, VenueId};
use domain_claims::{BusinessRole, ClaimDetails, ClaimSubmission, ClaimantProfile, EvidenceFile};
use domain_venue::Venue;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;

use crate::fixtures::{ClaimantFixtures, DetailsFixtures, EvidenceFixtures};

/// Builder for claim submissions
pub struct ClaimSubmissionBuilder {
    venue_id: VenueId,
    claimant: ClaimantProfile,
    details: ClaimDetails,
    evidence: Vec<EvidenceFile>,
}

impl ClaimSubmissionBuilder {
    /// A valid owner claim on `venue_id` with one business license attached
    pub fn new(venue_id: VenueId) -> Self {
        Self {
            venue_id,
            claimant: ClaimantFixtures::casey(),
            details: DetailsFixtures::owner(),
            evidence: vec![EvidenceFixtures::business_license()],
        }
    }

    /// A valid claim with generated claimant and business contact data
    pub fn random(venue_id: VenueId) -> Self {
        let name: String = Name().fake();
        Self {
            venue_id,
            claimant: ClaimantProfile {
                id: UserId::new(),
                name,
                email: SafeEmail().fake(),
            },
            details: ClaimDetails {
                business_name: CompanyName().fake(),
                business_email: SafeEmail().fake(),
                business_phone: PhoneNumber().fake(),
                business_role: BusinessRole::Owner,
                claim_reason: "I run this business".to_string(),
                additional_info: None,
            },
            evidence: vec![EvidenceFixtures::business_license()],
        }
    }

    pub fn with_claimant(mut self, claimant: ClaimantProfile) -> Self {
        self.claimant = claimant;
        self
    }

    pub fn with_details(mut self, details: ClaimDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_role(mut self, role: BusinessRole) -> Self {
        self.details.business_role = role;
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.details.additional_info = Some(info.into());
        self
    }

    /// Adds a file to the evidence list
    pub fn with_evidence(mut self, file: EvidenceFile) -> Self {
        self.evidence.push(file);
        self
    }

    /// Replaces the evidence list
    pub fn with_evidence_files(mut self, files: Vec<EvidenceFile>) -> Self {
        self.evidence = files;
        self
    }

    pub fn build(self) -> ClaimSubmission {
        ClaimSubmission {
            venue_id: self.venue_id,
            claimant: self.claimant,
            details: self.details,
            evidence: self.evidence,
        }
    }
}

/// Builder for venues in a specific starting state
pub struct VenueBuilder {
    venue: Venue,
}

impl Default for VenueBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VenueBuilder {
    pub fn new() -> Self {
        Self {
            venue: Venue::new(VenueId::new_v7(), "The Brown Bag", "cafe"),
        }
    }

    /// Marks `count` claims as pending on the venue
    pub fn with_pending_claims(mut self, count: u32) -> Self {
        for _ in 0..count {
            self.venue.mark_pending_claim();
        }
        self
    }

    pub fn build(self) -> Venue {
        self.venue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_venue::VenueClaimStatus;

    #[test]
    fn test_submission_builder_defaults() {
        let venue_id = VenueId::new();
        let submission = ClaimSubmissionBuilder::new(venue_id).build();

        assert_eq!(submission.venue_id, venue_id);
        assert_eq!(submission.evidence.len(), 1);
        assert_eq!(submission.details.business_role, BusinessRole::Owner);
    }

    #[test]
    fn test_submission_builder_overrides() {
        let submission = ClaimSubmissionBuilder::new(VenueId::new())
            .with_role(BusinessRole::AuthorizedRepresentative)
            .with_evidence(EvidenceFixtures::utility_bill())
            .with_additional_info("lease attached")
            .build();

        assert_eq!(submission.details.business_role, BusinessRole::AuthorizedRepresentative);
        assert_eq!(submission.evidence.len(), 2);
        assert_eq!(submission.details.additional_info.as_deref(), Some("lease attached"));
    }

    #[test]
    fn test_random_submission_is_complete() {
        let submission = ClaimSubmissionBuilder::random(VenueId::new()).build();
        assert!(!submission.claimant.name.is_empty());
        assert!(submission.details.business_email.contains('@'));
        assert!(!submission.details.business_phone.is_empty());
    }

    #[test]
    fn test_venue_builder_pending_claims() {
        let venue = VenueBuilder::new().with_pending_claims(2).build();
        assert_eq!(venue.pending_claims_count, 2);
        assert_eq!(venue.claim_status, VenueClaimStatus::PendingClaim);
    }
}
