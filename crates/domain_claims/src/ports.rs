//! Claims Domain Ports
//!
//! This module defines the interfaces the claim workflow needs from the
//! outside world: claim persistence, evidence storage, notification delivery
//! and the reconciliation queue.
//!
//! # Architecture
//!
//! - **Internal adapters**: PostgreSQL implementations in `infra_db`
//! - **Local adapters**: in-memory stores and a filesystem evidence store in
//!   [`crate::adapters`]
//! - **Transport**: notification delivery is an external concern; the
//!   workflow only ever talks to [`NotificationDispatcher`]
//!
//! # Usage
//!
//! ```rust,ignore
//! let engine = ClaimWorkflowEngine::new(
//!     WorkflowPorts {
//!         claims: Arc::new(PostgresClaimAdapter::new(pool.clone())),
//!         venues: Arc::new(PostgresVenueAdapter::new(pool.clone())),
//!         relationships: Arc::new(PostgresRelationshipAdapter::new(pool.clone())),
//!         evidence: Arc::new(LocalEvidenceStore::new(root, base_url)),
//!         notifier: Arc::new(outbox),
//!         reconciliation: Arc::new(PostgresReconciliationAdapter::new(pool)),
//!     },
//!     WorkflowConfig::default(),
//! );
//! ```

use async_trait::async_trait;

use core_kernel::{AdminId, ClaimId, DomainPort, PortError, ReconciliationId, UserId, VenueId};

use crate::claim::{Claim, ClaimStatus};
use crate::notification::Notification;
use crate::reconciliation::PartialTransition;

/// Persistence for claim records
///
/// Implementations must enforce uniqueness of (claimant, venue) among claims
/// whose status is `pending` or `approved`, and report a violation from
/// [`ClaimPort::create`] as `PortError::Conflict`.
#[async_trait]
pub trait ClaimPort: DomainPort {
    /// Inserts a new pending claim and returns its id
    async fn create(&self, claim: Claim) -> Result<ClaimId, PortError>;

    /// Retrieves a claim by ID, or `PortError::NotFound`
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Claims currently in `status`, at most `limit`
    async fn list_by_status(&self, status: ClaimStatus, limit: u32) -> Result<Vec<Claim>, PortError>;

    /// Every claim referencing a venue
    async fn list_by_venue(&self, venue_id: VenueId) -> Result<Vec<Claim>, PortError>;

    /// Every claim submitted by a user
    async fn list_by_claimant(&self, claimant_id: UserId) -> Result<Vec<Claim>, PortError>;

    /// Moves a pending claim to `status`, stamping processed_at/by and notes
    ///
    /// This is the only mutation after creation. Returns `PortError::Conflict`
    /// when the claim is no longer pending.
    async fn transition_to_terminal(
        &self,
        id: ClaimId,
        status: ClaimStatus,
        admin_id: AdminId,
        notes: Option<String>,
    ) -> Result<Claim, PortError>;
}

/// Durable binary storage for evidence documents
#[async_trait]
pub trait EvidenceStore: DomainPort {
    /// Stores one file under the claim's scope and returns a stable URL
    ///
    /// Keys must not collide within a claim scope.
    async fn put(&self, claim_id: ClaimId, bytes: &[u8], file_name: &str) -> Result<String, PortError>;
}

/// Delivery of claim-lifecycle messages
///
/// Callers treat every failure as non-fatal.
#[async_trait]
pub trait NotificationDispatcher: DomainPort {
    async fn send(&self, notification: &Notification) -> Result<(), PortError>;
}

/// Queue of partially applied transitions awaiting reconciliation
#[async_trait]
pub trait ReconciliationSink: DomainPort {
    /// Records an entry; the entry carries its own id
    async fn record(&self, entry: PartialTransition) -> Result<(), PortError>;

    /// Retrieves one entry, or `PortError::NotFound`
    async fn get(&self, id: ReconciliationId) -> Result<PartialTransition, PortError>;

    /// Entries not yet resolved, oldest first
    async fn unresolved(&self) -> Result<Vec<PartialTransition>, PortError>;

    /// Marks an entry resolved
    async fn mark_resolved(&self, id: ReconciliationId) -> Result<PartialTransition, PortError>;
}
