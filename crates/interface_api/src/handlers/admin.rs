//! Administrator handlers
//!
//! Authorization is checked here; the engine only receives the caller's id
//! for audit stamping.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use core_kernel::{ClaimId, ReconciliationId, VenueId};

use crate::auth::{permissions, AuthUser};
use crate::dto::admin::*;
use crate::dto::claims::{ClaimResponse, ClaimSummary};
use crate::dto::venues::OwnershipResponse;
use crate::{error::ApiError, AppState};

/// Claims in one status, newest first
pub async fn review_queue(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReviewQueueQuery>,
) -> Result<Json<Vec<ClaimSummary>>, ApiError> {
    user.require(permissions::CLAIM_REVIEW)?;
    let claims = state.engine.review_queue(query.status(), query.limit()).await?;
    Ok(Json(claims.into_iter().map(Into::into).collect()))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    user.require(permissions::CLAIM_REVIEW)?;
    let claim = state.engine.get(ClaimId::from_uuid(id)).await?;
    Ok(Json(claim.into()))
}

/// Approves or rejects a pending claim
pub async fn decide_claim(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    user.require(permissions::CLAIM_APPROVE)?;
    let claim = state
        .engine
        .decide(ClaimId::from_uuid(id), request.outcome, user.admin_id(), request.notes)
        .await?;
    Ok(Json(DecisionResponse { claim: claim.into() }))
}

/// Asks the claimant for more evidence
pub async fn request_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<DocumentsRequest>,
) -> Result<Json<DocumentsRequestResponse>, ApiError> {
    user.require(permissions::CLAIM_APPROVE)?;
    let notified = state
        .engine
        .request_documents(ClaimId::from_uuid(id), user.admin_id(), &request.message)
        .await?;
    Ok(Json(DocumentsRequestResponse { claim_id: id, notified }))
}

/// Partial transitions still awaiting repair
pub async fn list_reconciliation(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ReconciliationResponse>>, ApiError> {
    user.require(permissions::CLAIM_RECONCILE)?;
    let entries = state.reconciler.unresolved().await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Re-applies the missing steps of one partial transition
pub async fn resolve_reconciliation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconciliationResponse>, ApiError> {
    user.require(permissions::CLAIM_RECONCILE)?;
    let entry = state.reconciler.reconcile(ReconciliationId::from_uuid(id)).await?;
    Ok(Json(entry.into()))
}

/// Recomputes a venue's pending counter from its claims
pub async fn recount_venue(
    State(state): State<AppState>,
    user: AuthUser,
    Path(venue_id): Path<Uuid>,
) -> Result<Json<OwnershipResponse>, ApiError> {
    user.require(permissions::CLAIM_RECONCILE)?;
    let venue_id = VenueId::from_uuid(venue_id);
    let venue = state.reconciler.recount_pending(venue_id).await?;
    let owner = state.engine.owner_of(venue_id).await?;
    Ok(Json(OwnershipResponse::new(venue, owner)))
}
