//! Venue ownership handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::VenueId;

use crate::auth::{permissions, AuthUser};
use crate::dto::claims::ClaimSummary;
use crate::dto::venues::OwnershipResponse;
use crate::{error::ApiError, AppState};

/// Current ownership state of a venue
pub async fn venue_ownership(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(venue_id): Path<Uuid>,
) -> Result<Json<OwnershipResponse>, ApiError> {
    let venue_id = VenueId::from_uuid(venue_id);
    let venue = state.engine.venue(venue_id).await?;
    let owner = state.engine.owner_of(venue_id).await?;
    Ok(Json(OwnershipResponse::new(venue, owner)))
}

/// Every claim filed against a venue, newest first
pub async fn venue_claims(
    State(state): State<AppState>,
    user: AuthUser,
    Path(venue_id): Path<Uuid>,
) -> Result<Json<Vec<ClaimSummary>>, ApiError> {
    user.require(permissions::CLAIM_REVIEW)?;
    let claims = state.engine.claims_for_venue(VenueId::from_uuid(venue_id)).await?;
    Ok(Json(claims.into_iter().map(Into::into).collect()))
}
