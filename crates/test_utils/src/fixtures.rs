//! Pre-built Test Fixtures
//!
//! Ready-to-use venues, claimants and evidence. Values are fixed so that
//! assertions on names and emails stay readable; identifiers are fresh on
//! every call.

use core_kernel::{AdminId, UserId, VenueId};
use domain_claims::{BusinessRole, ClaimDetails, ClaimantProfile, EvidenceFile};
use domain_venue::Venue;

/// Fixture for venues
pub struct VenueFixtures;

impl VenueFixtures {
    /// An unclaimed cafe
    pub fn brown_bag() -> Venue {
        Venue::new(VenueId::new_v7(), "The Brown Bag", "cafe")
    }

    /// A second unclaimed venue for cross-venue tests
    pub fn night_owl() -> Venue {
        Venue::new(VenueId::new_v7(), "Night Owl Bar", "bar")
    }
}

/// Fixture for the people who file claims
pub struct ClaimantFixtures;

impl ClaimantFixtures {
    pub fn casey() -> ClaimantProfile {
        ClaimantProfile {
            id: UserId::new(),
            name: "Casey Morgan".to_string(),
            email: "casey@example.test".to_string(),
        }
    }

    pub fn jordan() -> ClaimantProfile {
        ClaimantProfile {
            id: UserId::new(),
            name: "Jordan Lee".to_string(),
            email: "jordan@example.test".to_string(),
        }
    }

    /// A claimant with a generated id and the given display name
    pub fn named(name: &str) -> ClaimantProfile {
        ClaimantProfile {
            id: UserId::new(),
            name: name.to_string(),
            email: format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
        }
    }
}

/// Fixture for reviewing administrators
pub struct AdminFixtures;

impl AdminFixtures {
    pub fn reviewer() -> AdminId {
        AdminId::new()
    }
}

/// Fixture for business details entered on the claim form
pub struct DetailsFixtures;

impl DetailsFixtures {
    pub fn owner() -> ClaimDetails {
        ClaimDetails {
            business_name: "Brown Bag Coffee LLC".to_string(),
            business_email: "owner@brownbag.test".to_string(),
            business_phone: "+1 555 0100".to_string(),
            business_role: BusinessRole::Owner,
            claim_reason: "I own and operate this cafe".to_string(),
            additional_info: None,
        }
    }

    pub fn manager() -> ClaimDetails {
        ClaimDetails {
            business_role: BusinessRole::Manager,
            claim_reason: "I manage day to day operations".to_string(),
            ..Self::owner()
        }
    }
}

/// Fixture for evidence uploads
pub struct EvidenceFixtures;

impl EvidenceFixtures {
    pub fn business_license() -> EvidenceFile {
        EvidenceFile::new("business-license.pdf", b"%PDF-1.7 business license".to_vec())
    }

    pub fn utility_bill() -> EvidenceFile {
        EvidenceFile::new("utility-bill.png", b"\x89PNG utility bill".to_vec())
    }
}
