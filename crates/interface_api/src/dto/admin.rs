//! Admin DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::{ClaimStatus, DecisionOutcome, PartialTransition, TransitionStep};

use super::claims::ClaimResponse;

/// Default and maximum page size of the review queue
pub const DEFAULT_QUEUE_LIMIT: u32 = 50;
pub const MAX_QUEUE_LIMIT: u32 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQueueQuery {
    pub status: Option<ClaimStatus>,
    pub limit: Option<u32>,
}

impl ReviewQueueQuery {
    pub fn status(&self) -> ClaimStatus {
        self.status.unwrap_or(ClaimStatus::Pending)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_QUEUE_LIMIT).clamp(1, MAX_QUEUE_LIMIT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub outcome: DecisionOutcome,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub claim: ClaimResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentsRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentsRequestResponse {
    pub claim_id: Uuid,
    /// Whether the dispatcher accepted the message
    pub notified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReconciliationResponse {
    pub id: Uuid,
    pub claim_id: Uuid,
    pub venue_id: Uuid,
    pub claimant_id: Uuid,
    pub claim_status: ClaimStatus,
    pub failed_step: TransitionStep,
    pub error: String,
    pub recorded_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<PartialTransition> for ReconciliationResponse {
    fn from(entry: PartialTransition) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            claim_id: *entry.claim_id.as_uuid(),
            venue_id: *entry.venue_id.as_uuid(),
            claimant_id: *entry.claimant_id.as_uuid(),
            claim_status: entry.claim_status,
            failed_step: entry.failed_step,
            error: entry.error,
            recorded_at: entry.recorded_at,
            resolved_at: entry.resolved_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_query_defaults_and_cap() {
        let query = ReviewQueueQuery::default();
        assert_eq!(query.status(), ClaimStatus::Pending);
        assert_eq!(query.limit(), DEFAULT_QUEUE_LIMIT);

        let query = ReviewQueueQuery {
            status: Some(ClaimStatus::Rejected),
            limit: Some(10_000),
        };
        assert_eq!(query.status(), ClaimStatus::Rejected);
        assert_eq!(query.limit(), MAX_QUEUE_LIMIT);
    }

    #[test]
    fn test_decision_request_parses_outcome() {
        let request: DecisionRequest =
            serde_json::from_str(r#"{"outcome": "rejected", "notes": "expired license"}"#).unwrap();
        assert_eq!(request.outcome, DecisionOutcome::Rejected);
        assert_eq!(request.notes.as_deref(), Some("expired license"));

        let request: DecisionRequest = serde_json::from_str(r#"{"outcome": "approved"}"#).unwrap();
        assert!(request.notes.is_none());
    }
}
