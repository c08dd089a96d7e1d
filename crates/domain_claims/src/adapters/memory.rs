//! In-memory claim store and reconciliation queue

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use core_kernel::{AdminId, ClaimId, DomainPort, PortError, ReconciliationId, UserId, VenueId};

use crate::claim::{Claim, ClaimStatus};
use crate::ports::{ClaimPort, ReconciliationSink};
use crate::reconciliation::PartialTransition;

/// In-memory claim store
///
/// `create` checks the (claimant, venue) uniqueness rule under the write
/// lock, which matches the partial unique index used by PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    claims: RwLock<HashMap<ClaimId, Claim>>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored claim
    pub async fn all(&self) -> Vec<Claim> {
        self.claims.read().await.values().cloned().collect()
    }

    async fn filtered(&self, keep: impl Fn(&Claim) -> bool) -> Vec<Claim> {
        self.claims
            .read()
            .await
            .values()
            .filter(|c| keep(c))
            .cloned()
            .collect()
    }
}

impl DomainPort for InMemoryClaimStore {}

#[async_trait]
impl ClaimPort for InMemoryClaimStore {
    async fn create(&self, claim: Claim) -> Result<ClaimId, PortError> {
        let mut claims = self.claims.write().await;
        if claims.contains_key(&claim.id) {
            return Err(PortError::conflict(format!("claim {} already exists", claim.id)));
        }
        let blocked = claims.values().any(|c| {
            c.claimant_id == claim.claimant_id && c.venue_id == claim.venue_id && c.status.blocks_reclaim()
        });
        if blocked {
            return Err(PortError::conflict(format!(
                "claimant {} already has an active claim for venue {}",
                claim.claimant_id, claim.venue_id
            )));
        }

        let id = claim.id;
        claims.insert(id, claim);
        Ok(id)
    }

    async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
        self.claims
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Claim", id))
    }

    async fn list_by_status(&self, status: ClaimStatus, limit: u32) -> Result<Vec<Claim>, PortError> {
        let mut claims = self.filtered(|c| c.status == status).await;
        claims.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        claims.truncate(limit as usize);
        Ok(claims)
    }

    async fn list_by_venue(&self, venue_id: VenueId) -> Result<Vec<Claim>, PortError> {
        Ok(self.filtered(|c| c.venue_id == venue_id).await)
    }

    async fn list_by_claimant(&self, claimant_id: UserId) -> Result<Vec<Claim>, PortError> {
        Ok(self.filtered(|c| c.claimant_id == claimant_id).await)
    }

    async fn transition_to_terminal(
        &self,
        id: ClaimId,
        status: ClaimStatus,
        admin_id: AdminId,
        notes: Option<String>,
    ) -> Result<Claim, PortError> {
        let mut claims = self.claims.write().await;
        let claim = claims
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Claim", id))?;
        claim
            .transition_to_terminal(status, admin_id, notes)
            .map_err(|e| PortError::conflict(e.to_string()))?;
        Ok(claim.clone())
    }
}

/// In-memory reconciliation queue
#[derive(Debug, Default)]
pub struct InMemoryReconciliationQueue {
    entries: RwLock<HashMap<ReconciliationId, PartialTransition>>,
}

impl InMemoryReconciliationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry, resolved or not
    pub async fn all(&self) -> Vec<PartialTransition> {
        self.entries.read().await.values().cloned().collect()
    }
}

impl DomainPort for InMemoryReconciliationQueue {}

#[async_trait]
impl ReconciliationSink for InMemoryReconciliationQueue {
    async fn record(&self, entry: PartialTransition) -> Result<(), PortError> {
        self.entries.write().await.insert(entry.id, entry);
        Ok(())
    }

    async fn get(&self, id: ReconciliationId) -> Result<PartialTransition, PortError> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("PartialTransition", id))
    }

    async fn unresolved(&self) -> Result<Vec<PartialTransition>, PortError> {
        let mut pending: Vec<_> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| !e.is_resolved())
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        Ok(pending)
    }

    async fn mark_resolved(&self, id: ReconciliationId) -> Result<PartialTransition, PortError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("PartialTransition", id))?;
        if entry.resolved_at.is_none() {
            entry.resolved_at = Some(Utc::now());
        }
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{BusinessRole, ClaimDetails, ClaimantProfile};
    use domain_venue::Venue;

    fn claim_for(venue: &Venue, claimant: UserId) -> Claim {
        Claim::submitted(
            ClaimId::new_v7(),
            venue,
            ClaimantProfile {
                id: claimant,
                name: "Casey".to_string(),
                email: "casey@example.test".to_string(),
            },
            ClaimDetails {
                business_name: "Brown Bag LLC".to_string(),
                business_email: "hello@brownbag.test".to_string(),
                business_phone: "555-0100".to_string(),
                business_role: BusinessRole::Owner,
                claim_reason: "I run it".to_string(),
                additional_info: None,
            },
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_second_active_claim_conflicts() {
        let store = InMemoryClaimStore::new();
        let venue = Venue::new(VenueId::new(), "The Brown Bag", "cafe");
        let claimant = UserId::new();

        store.create(claim_for(&venue, claimant)).await.unwrap();
        let err = store.create(claim_for(&venue, claimant)).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_rejected_claim_does_not_block() {
        let store = InMemoryClaimStore::new();
        let venue = Venue::new(VenueId::new(), "The Brown Bag", "cafe");
        let claimant = UserId::new();

        let first = store.create(claim_for(&venue, claimant)).await.unwrap();
        store
            .transition_to_terminal(first, ClaimStatus::Rejected, AdminId::new(), Some("no proof".into()))
            .await
            .unwrap();

        assert!(store.create(claim_for(&venue, claimant)).await.is_ok());
    }

    #[tokio::test]
    async fn test_transition_only_from_pending() {
        let store = InMemoryClaimStore::new();
        let venue = Venue::new(VenueId::new(), "The Brown Bag", "cafe");
        let id = store.create(claim_for(&venue, UserId::new())).await.unwrap();

        let approved = store
            .transition_to_terminal(id, ClaimStatus::Approved, AdminId::new(), None)
            .await
            .unwrap();
        assert_eq!(approved.status, ClaimStatus::Approved);

        let err = store
            .transition_to_terminal(id, ClaimStatus::Rejected, AdminId::new(), Some("late".into()))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_list_by_status_applies_limit() {
        let store = InMemoryClaimStore::new();
        for _ in 0..5 {
            let venue = Venue::new(VenueId::new(), "Venue", "bar");
            store.create(claim_for(&venue, UserId::new())).await.unwrap();
        }

        let listed = store.list_by_status(ClaimStatus::Pending, 3).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(store.list_by_status(ClaimStatus::Approved, 10).await.unwrap().is_empty());
    }
}
