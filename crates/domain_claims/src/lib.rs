//! Venue Claims Domain
//!
//! This crate implements the ownership-claim lifecycle for venues: a claimant
//! submits a claim with evidence, an administrator approves or rejects it,
//! and an approval transfers verified ownership of the venue.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Pending -> Approved
//!                     \-> Rejected
//! ```
//!
//! `Submitted` exists only while [`ClaimWorkflowEngine::submit`] runs.
//! `Approved` and `Rejected` are terminal.

pub mod claim;
pub mod ports;
pub mod workflow;
pub mod notification;
pub mod reconciliation;
pub mod adapters;
pub mod error;

pub use claim::{Claim, ClaimStatus, BusinessRole, ClaimDetails, ClaimantProfile, EvidenceDocument};
pub use ports::{ClaimPort, EvidenceStore, NotificationDispatcher, ReconciliationSink};
pub use workflow::{
    ClaimSubmission, ClaimWorkflowEngine, DecisionOutcome, EvidenceFile, WorkflowConfig, WorkflowPorts,
};
pub use notification::{
    LoggingDispatcher, Notification, NotificationTemplate, OutboxDispatcher, OutboxWorker,
};
pub use reconciliation::{PartialTransition, Reconciler, TransitionStep};
pub use error::ClaimError;
