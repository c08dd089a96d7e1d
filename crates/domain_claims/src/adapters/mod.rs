//! Local adapters for the claims ports
//!
//! The in-memory stores back tests and single-process deployments; the
//! filesystem evidence store is the default [`crate::ports::EvidenceStore`].

pub mod local_evidence;
pub mod memory;

pub use local_evidence::LocalEvidenceStore;
pub use memory::{InMemoryClaimStore, InMemoryReconciliationQueue};
