//! Tests for the in-memory venue and relationship adapters

use std::sync::Arc;

use core_kernel::{UserId, VenueId};
use domain_venue::adapters::{InMemoryRelationshipStore, InMemoryVenueStore};
use domain_venue::{
    BusinessDetails, ClaimResolution, OwnershipRelationship, RelationshipPort, Venue,
    VenueClaimStatus, VenuePort,
};

fn details() -> BusinessDetails {
    BusinessDetails {
        legal_name: "Brown Bag LLC".to_string(),
        email: "owner@brownbag.test".to_string(),
        phone: "555-0100".to_string(),
    }
}

async fn store_with_venue() -> (InMemoryVenueStore, VenueId) {
    let store = InMemoryVenueStore::new();
    let venue = Venue::new(VenueId::new(), "The Brown Bag", "cafe");
    let id = venue.id;
    store.insert(venue).await;
    (store, id)
}

#[tokio::test]
async fn test_get_unknown_venue_is_not_found() {
    let store = InMemoryVenueStore::new();
    let err = store.get(VenueId::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_concurrent_increments_are_not_lost() {
    let (store, id) = store_with_venue().await;
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.mark_pending_claim(id).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let venue = store.get(id).await.unwrap();
    assert_eq!(venue.pending_claims_count, 50);
    assert_eq!(venue.claim_status, VenueClaimStatus::PendingClaim);
}

#[tokio::test]
async fn test_resolve_conflicting_owner_returns_conflict() {
    let (store, id) = store_with_venue().await;
    store.mark_pending_claim(id).await.unwrap();
    store
        .resolve_claim(id, ClaimResolution::Approved { owner_id: UserId::new(), business_details: details() })
        .await
        .unwrap();
    store.mark_pending_claim(id).await.unwrap();

    let err = store
        .resolve_claim(id, ClaimResolution::Approved { owner_id: UserId::new(), business_details: details() })
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.get(id).await.unwrap().pending_claims_count, 1);
}

#[tokio::test]
async fn test_set_pending_claims_count() {
    let (store, id) = store_with_venue().await;
    let venue = store.set_pending_claims_count(id, 2).await.unwrap();
    assert_eq!(venue.pending_claims_count, 2);
    assert_eq!(venue.claim_status, VenueClaimStatus::PendingClaim);
}

#[tokio::test]
async fn test_only_one_owner_per_venue() {
    let store = InMemoryRelationshipStore::new();
    let venue_id = VenueId::new();
    let first = UserId::new();

    store.create(OwnershipRelationship::owner(first, venue_id)).await.unwrap();
    let err = store
        .create(OwnershipRelationship::owner(UserId::new(), venue_id))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let owner = store.find_owner(venue_id).await.unwrap().unwrap();
    assert_eq!(owner.user_id, first);
    assert_eq!(store.list_for_user(first).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_verified_owner_keeps_pending_counter() {
    let (store, id) = store_with_venue().await;
    store.mark_pending_claim(id).await.unwrap();
    let owner = UserId::new();

    let venue = store.set_verified_owner(id, owner, details()).await.unwrap();
    assert_eq!(venue.claim_status, VenueClaimStatus::Verified);
    assert_eq!(venue.verified_owner_id, Some(owner));
    assert_eq!(venue.pending_claims_count, 1);

    store.set_verified_owner(id, owner, details()).await.unwrap();
    let err = store
        .set_verified_owner(id, UserId::new(), details())
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.get(id).await.unwrap().verified_owner_id, Some(owner));
}

#[tokio::test]
async fn test_verified_venue_serializes_for_the_ownership_view() {
    let (store, id) = store_with_venue().await;
    let venue = store.set_verified_owner(id, UserId::new(), details()).await.unwrap();

    let json = serde_json::to_value(&venue).unwrap();
    assert_eq!(json["claim_status"], "verified");
    assert_eq!(json["verification_method"], "admin_approval");
    assert_eq!(json["business_details"]["legal_name"], "Brown Bag LLC");
    assert_eq!(json["pending_claims_count"], 0);
}
