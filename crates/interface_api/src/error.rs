//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_claims::ClaimError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A decision arrived for a claim that is no longer pending
    #[error("Already processed: {message}")]
    AlreadyProcessed { message: String, current_status: String },

    #[error("Validation error: {0}")]
    Validation(String),

    /// The evidence store rejected or failed an upload
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Storage is unavailable; the request may be retried
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The claim is terminal but the venue or relationship update did not apply
    #[error("Partial transition: {message}")]
    PartialTransition {
        message: String,
        reconciliation_id: Option<String>,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation_id: Option<String>,
    pub retryable: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::AlreadyProcessed { message, .. } => {
                (StatusCode::CONFLICT, "already_processed", message.clone())
            }
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "evidence_upload_failed", msg.clone()),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", msg.clone())
            }
            ApiError::PartialTransition { message, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "partial_transition", message.clone())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
            current_status: match &self {
                ApiError::AlreadyProcessed { current_status, .. } => Some(current_status.clone()),
                _ => None,
            },
            reconciliation_id: match &self {
                ApiError::PartialTransition { reconciliation_id, .. } => reconciliation_id.clone(),
                _ => None,
            },
            retryable: matches!(self, ApiError::ServiceUnavailable(_) | ApiError::Upstream(_)),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        let message = err.to_string();
        match err {
            ClaimError::VenueNotFound(_)
            | ClaimError::ClaimNotFound(_)
            | ClaimError::ReconciliationNotFound(_) => ApiError::NotFound(message),
            ClaimError::DuplicateClaim { .. }
            | ClaimError::OwnershipConflict { .. }
            | ClaimError::InvalidStatusTransition { .. } => ApiError::Conflict(message),
            ClaimError::AlreadyProcessed { status, .. } => ApiError::AlreadyProcessed {
                message,
                current_status: status.to_string(),
            },
            ClaimError::Validation(msg) => ApiError::Validation(msg),
            ClaimError::EvidenceUpload { .. } => ApiError::Upstream(message),
            ClaimError::Storage(_) => ApiError::ServiceUnavailable(message),
            ClaimError::PartialTransition {
                reconciliation_id, ..
            } => {
                error!(error = %message, "Request left a partial transition");
                ApiError::PartialTransition {
                    message,
                    reconciliation_id: reconciliation_id.map(|id| id.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{ClaimId, PortError, UserId, VenueId};
    use domain_claims::{ClaimStatus, TransitionStep};

    #[test]
    fn test_claim_error_status_codes() {
        let cases = vec![
            (ClaimError::VenueNotFound(VenueId::new()), StatusCode::NOT_FOUND),
            (ClaimError::ClaimNotFound(ClaimId::new()), StatusCode::NOT_FOUND),
            (
                ClaimError::DuplicateClaim {
                    claimant_id: UserId::new(),
                    venue_id: VenueId::new(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ClaimError::AlreadyProcessed {
                    claim_id: ClaimId::new(),
                    status: ClaimStatus::Approved,
                },
                StatusCode::CONFLICT,
            ),
            (ClaimError::validation("missing reason"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ClaimError::EvidenceUpload {
                    file_name: "a.pdf".to_string(),
                    source: PortError::connection("down"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                ClaimError::Storage(PortError::connection("down")),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ClaimError::PartialTransition {
                    claim_id: ClaimId::new(),
                    reconciliation_id: None,
                    step: TransitionStep::VenueResolution,
                    source: PortError::connection("down"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_already_processed_carries_status() {
        let err = ApiError::from(ClaimError::AlreadyProcessed {
            claim_id: ClaimId::new(),
            status: ClaimStatus::Rejected,
        });
        match err {
            ApiError::AlreadyProcessed { current_status, .. } => assert_eq!(current_status, "rejected"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
