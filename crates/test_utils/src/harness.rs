//! In-memory workflow harness
//!
//! Wires a [`ClaimWorkflowEngine`] and a [`Reconciler`] to the in-memory
//! adapters so that workflow and API tests run without a database.

use std::sync::Arc;

use core_kernel::VenueId;
use domain_claims::adapters::{InMemoryClaimStore, InMemoryReconciliationQueue};
use domain_claims::{ClaimWorkflowEngine, Reconciler, WorkflowConfig, WorkflowPorts};
use domain_venue::adapters::memory::{InMemoryRelationshipStore, InMemoryVenueStore};
use domain_venue::Venue;

use crate::fakes::{MemoryEvidenceStore, RecordingDispatcher};

/// A fully wired in-memory claim workflow
pub struct InMemoryWorkflow {
    pub engine: ClaimWorkflowEngine,
    pub reconciler: Reconciler,
    pub claims: Arc<InMemoryClaimStore>,
    pub venues: Arc<InMemoryVenueStore>,
    pub relationships: Arc<InMemoryRelationshipStore>,
    pub queue: Arc<InMemoryReconciliationQueue>,
    pub evidence: Arc<MemoryEvidenceStore>,
    pub notifications: Arc<RecordingDispatcher>,
}

impl InMemoryWorkflow {
    pub fn new() -> Self {
        Self::with_config(WorkflowConfig::default())
    }

    pub fn with_config(config: WorkflowConfig) -> Self {
        let claims = Arc::new(InMemoryClaimStore::new());
        let venues = Arc::new(InMemoryVenueStore::new());
        let relationships = Arc::new(InMemoryRelationshipStore::new());
        let queue = Arc::new(InMemoryReconciliationQueue::new());
        let evidence = Arc::new(MemoryEvidenceStore::new());
        let notifications = Arc::new(RecordingDispatcher::new());

        let engine = ClaimWorkflowEngine::new(
            WorkflowPorts {
                claims: claims.clone(),
                venues: venues.clone(),
                relationships: relationships.clone(),
                evidence: evidence.clone(),
                notifier: notifications.clone(),
                reconciliation: queue.clone(),
            },
            config,
        );
        let reconciler = Reconciler::new(
            claims.clone(),
            venues.clone(),
            relationships.clone(),
            queue.clone(),
        );

        Self {
            engine,
            reconciler,
            claims,
            venues,
            relationships,
            queue,
            evidence,
            notifications,
        }
    }

    /// Stores a venue and returns its id
    pub async fn seed_venue(&self, venue: Venue) -> VenueId {
        let id = venue.id;
        self.venues.insert(venue).await;
        id
    }
}

impl Default for InMemoryWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
