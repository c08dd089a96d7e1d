//! Claimant-facing handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;

use core_kernel::VenueId;
use domain_claims::{BusinessRole, ClaimDetails, ClaimStatus, ClaimSubmission, EvidenceFile};

use crate::auth::AuthUser;
use crate::dto::claims::{ClaimResponse, SubmitClaimResponse};
use crate::{error::ApiError, AppState};

/// Multipart field carrying evidence files; may repeat
pub const EVIDENCE_FIELD: &str = "evidence";

/// Submits a claim on a venue as the calling user
///
/// Expects `multipart/form-data` with the text fields `business_name`,
/// `business_email`, `business_phone`, `business_role`, `claim_reason`,
/// optional `additional_info`, and one or more `evidence` file parts.
pub async fn submit_claim(
    State(state): State<AppState>,
    user: AuthUser,
    Path(venue_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitClaimResponse>), ApiError> {
    let (details, evidence) = read_claim_form(multipart).await?;
    let submission = ClaimSubmission {
        venue_id: VenueId::from_uuid(venue_id),
        claimant: user.claimant_profile(),
        details,
        evidence,
    };

    let claim_id = state.engine.submit(submission).await?;
    info!(claim_id = %claim_id, "Claim submitted via API");

    Ok((
        StatusCode::CREATED,
        Json(SubmitClaimResponse {
            claim_id: *claim_id.as_uuid(),
            status: ClaimStatus::Pending,
        }),
    ))
}

/// Lists the caller's own claims, newest first
pub async fn my_claims(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.engine.claims_for_claimant(user.user_id()).await?;
    Ok(Json(claims.into_iter().map(Into::into).collect()))
}

#[derive(Default)]
struct ClaimForm {
    business_name: String,
    business_email: String,
    business_phone: String,
    business_role: Option<String>,
    claim_reason: String,
    additional_info: Option<String>,
}

impl ClaimForm {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "business_name" => self.business_name = value,
            "business_email" => self.business_email = value,
            "business_phone" => self.business_phone = value,
            "business_role" => self.business_role = Some(value),
            "claim_reason" => self.claim_reason = value,
            "additional_info" => {
                let value = value.trim();
                self.additional_info = (!value.is_empty()).then(|| value.to_string());
            }
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    fn into_details(self) -> Result<ClaimDetails, ApiError> {
        let role = self
            .business_role
            .ok_or_else(|| ApiError::Validation("business_role is required".to_string()))?;
        let business_role: BusinessRole = role
            .trim()
            .parse()
            .map_err(|e| ApiError::Validation(format!("business_role: {}", e)))?;

        Ok(ClaimDetails {
            business_name: self.business_name,
            business_email: self.business_email,
            business_phone: self.business_phone,
            business_role,
            claim_reason: self.claim_reason,
            additional_info: self.additional_info,
        })
    }
}

async fn read_claim_form(mut multipart: Multipart) -> Result<(ClaimDetails, Vec<EvidenceFile>), ApiError> {
    let mut form = ClaimForm::default();
    let mut evidence = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == EVIDENCE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            evidence.push(EvidenceFile::new(file_name, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            form.set(&name, value);
        }
    }

    Ok((form.into_details()?, evidence))
}
