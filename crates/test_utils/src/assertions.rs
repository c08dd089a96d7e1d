//! Custom Test Assertions
//!
//! Invariant checks across venues, claims and ownership relationships, with
//! failure messages that name the offending records.

use core_kernel::{AdminId, UserId};
use domain_claims::{Claim, ClaimStatus};
use domain_venue::{OwnershipRelationship, Venue, VenueClaimStatus};

/// Asserts that a venue agrees with the claims filed against it
///
/// - the venue's own invariants hold
/// - the pending counter equals the number of pending claims
/// - a verified venue is owned by the claimant of its single approved claim
///
/// # Panics
///
/// Panics with a description of the first violated rule
pub fn assert_venue_consistent(venue: &Venue, claims: &[Claim]) {
    if let Err(e) = venue.check_invariants() {
        panic!("Venue {} violates its invariants: {}", venue.id, e);
    }

    let for_venue: Vec<&Claim> = claims.iter().filter(|c| c.venue_id == venue.id).collect();
    let pending = for_venue
        .iter()
        .filter(|c| c.status == ClaimStatus::Pending)
        .count() as u32;
    assert_eq!(
        venue.pending_claims_count, pending,
        "Venue {} counts {} pending claims, store holds {}",
        venue.id, venue.pending_claims_count, pending
    );

    let approved: Vec<&&Claim> = for_venue
        .iter()
        .filter(|c| c.status == ClaimStatus::Approved)
        .collect();
    assert!(
        approved.len() <= 1,
        "Venue {} has {} approved claims",
        venue.id,
        approved.len()
    );

    match (venue.claim_status, approved.first()) {
        (VenueClaimStatus::Verified, Some(claim)) => assert_eq!(
            venue.verified_owner_id,
            Some(claim.claimant_id),
            "Venue {} owner does not match approved claim {}",
            venue.id,
            claim.id
        ),
        (VenueClaimStatus::Verified, None) => {
            panic!("Venue {} is verified without an approved claim", venue.id)
        }
        (status, Some(claim)) => panic!(
            "Venue {} is {} although claim {} was approved",
            venue.id, status, claim.id
        ),
        (_, None) => {}
    }
}

/// Asserts that `owner` holds the only owner relationship for the venue
pub fn assert_single_owner(relationships: &[OwnershipRelationship], venue: &Venue, owner: UserId) {
    let owners: Vec<&OwnershipRelationship> = relationships
        .iter()
        .filter(|r| r.venue_id == venue.id)
        .collect();
    assert_eq!(
        owners.len(),
        1,
        "Expected one owner relationship for venue {}, found {}",
        venue.id,
        owners.len()
    );
    assert_eq!(owners[0].user_id, owner, "Owner relationship points at the wrong user");
    assert_eq!(venue.verified_owner_id, Some(owner), "Venue owner does not match relationship");
}

/// Asserts that a claim reached `status` with the audit fields of `admin`
pub fn assert_processed(claim: &Claim, status: ClaimStatus, admin: AdminId) {
    assert_eq!(claim.status, status, "Claim {} has status {}", claim.id, claim.status);
    assert_eq!(claim.processed_by, Some(admin), "Claim {} processed by wrong admin", claim.id);
    assert!(claim.processed_at.is_some(), "Claim {} has no processed_at", claim.id);
}

/// Asserts that a claim is still awaiting review with no audit fields set
pub fn assert_pending(claim: &Claim) {
    assert_eq!(claim.status, ClaimStatus::Pending, "Claim {} is {}", claim.id, claim.status);
    assert!(claim.processed_at.is_none());
    assert!(claim.processed_by.is_none());
    assert!(claim.rejection_reason.is_none());
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{ClaimId, VenueId};
    use domain_venue::{BusinessDetails, ClaimResolution};

    use crate::fixtures::{ClaimantFixtures, DetailsFixtures};

    fn claim_for(venue: &Venue, claimant_id: UserId, status: ClaimStatus) -> Claim {
        let mut claimant = ClaimantFixtures::casey();
        claimant.id = claimant_id;
        let mut claim = Claim::submitted(ClaimId::new(), venue, claimant, DetailsFixtures::owner(), vec![]);
        claim.status = status;
        claim
    }

    #[test]
    fn test_consistent_pending_venue() {
        let mut venue = Venue::new(VenueId::new(), "Cafe", "cafe");
        venue.mark_pending_claim();
        let claims = vec![claim_for(&venue, UserId::new(), ClaimStatus::Pending)];

        assert_venue_consistent(&venue, &claims);
    }

    #[test]
    fn test_consistent_verified_venue() {
        let owner = UserId::new();
        let mut venue = Venue::new(VenueId::new(), "Cafe", "cafe");
        venue.mark_pending_claim();
        venue
            .resolve_claim(&ClaimResolution::Approved {
                owner_id: owner,
                business_details: BusinessDetails {
                    legal_name: "Cafe LLC".to_string(),
                    email: "a@b.test".to_string(),
                    phone: "1".to_string(),
                },
            })
            .unwrap();
        let claims = vec![claim_for(&venue, owner, ClaimStatus::Approved)];

        assert_venue_consistent(&venue, &claims);
    }

    #[test]
    #[should_panic(expected = "pending claims")]
    fn test_counter_drift_is_reported() {
        let venue = Venue::new(VenueId::new(), "Cafe", "cafe");
        let claims = vec![claim_for(&venue, UserId::new(), ClaimStatus::Pending)];

        assert_venue_consistent(&venue, &claims);
    }
}
