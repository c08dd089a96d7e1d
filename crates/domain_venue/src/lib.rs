//! Venue Ownership Domain
//!
//! This crate models the ownership-relevant slice of a venue: its claim state,
//! the counter of claims awaiting a decision, and the verified owner once a
//! claim has been approved. It also models the ownership relationship edge
//! created on approval.
//!
//! # Venue Claim State
//!
//! ```text
//! Unclaimed -> PendingClaim -> Verified
//!     ^             |
//!     +-------------+  (last pending claim rejected)
//! ```

pub mod venue;
pub mod relationship;
pub mod ports;
pub mod adapters;
pub mod error;

pub use venue::{Venue, VenueClaimStatus, VerificationMethod, BusinessDetails, ClaimResolution};
pub use relationship::{OwnershipRelationship, RelationshipType};
pub use ports::{VenuePort, RelationshipPort};
pub use error::VenueError;
