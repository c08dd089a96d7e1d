//! HTTP API tests
//!
//! The router runs against the in-memory workflow, so these tests need
//! neither a database nor a filesystem.

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use core_kernel::VenueId;
use domain_claims::{ClaimDetails, ClaimantProfile, NotificationTemplate};
use domain_venue::VenueClaimStatus;
use interface_api::auth::{create_token, permissions, TokenIdentity};
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{ClaimantFixtures, DetailsFixtures, InMemoryWorkflow, VenueFixtures};

const SECRET: &str = "api-test-secret";

struct TestApp {
    server: TestServer,
    workflow: InMemoryWorkflow,
}

fn create_test_app() -> TestApp {
    let workflow = InMemoryWorkflow::new();
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..ApiConfig::default()
    };
    let state = AppState::new(workflow.engine.clone(), workflow.reconciler.clone(), config);
    let server = TestServer::new(create_router(state)).unwrap();
    TestApp { server, workflow }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn claimant_token(profile: &ClaimantProfile) -> String {
    create_token(
        &profile.id.as_uuid().to_string(),
        vec!["claimant".to_string()],
        TokenIdentity {
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
        },
        SECRET,
        3600,
    )
    .unwrap()
}

fn admin_token() -> String {
    create_token(
        &Uuid::new_v4().to_string(),
        vec!["admin".to_string()],
        TokenIdentity::default(),
        SECRET,
        3600,
    )
    .unwrap()
}

fn reviewer_token() -> String {
    create_token(
        &Uuid::new_v4().to_string(),
        vec![permissions::CLAIM_REVIEW.to_string()],
        TokenIdentity::default(),
        SECRET,
        3600,
    )
    .unwrap()
}

fn claim_form(details: &ClaimDetails) -> MultipartForm {
    let mut form = MultipartForm::new()
        .add_text("business_name", details.business_name.clone())
        .add_text("business_email", details.business_email.clone())
        .add_text("business_phone", details.business_phone.clone())
        .add_text("business_role", details.business_role.as_str())
        .add_text("claim_reason", details.claim_reason.clone());
    if let Some(info) = &details.additional_info {
        form = form.add_text("additional_info", info.clone());
    }
    form
}

fn with_license(form: MultipartForm) -> MultipartForm {
    form.add_part(
        "evidence",
        Part::bytes(b"%PDF-1.7 business license".to_vec())
            .file_name("business-license.pdf")
            .mime_type("application/pdf"),
    )
}

async fn submit(app: &TestApp, venue_id: VenueId, token: &str) -> Uuid {
    let response = app
        .server
        .post(&format!("/api/v1/venues/{}/claims", venue_id.as_uuid()))
        .add_header(header::AUTHORIZATION, bearer(token))
        .multipart(with_license(claim_form(&DetailsFixtures::owner())))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    Uuid::parse_str(body["claim_id"].as_str().unwrap()).unwrap()
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_without_registered_checks() {
    let app = create_test_app();

    let response = app.server.get("/health/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
}

// ============ Authentication Tests ============

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = create_test_app();

    let response = app.server.get("/api/v1/claims/mine").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let app = create_test_app();
    let token = create_token(
        &Uuid::new_v4().to_string(),
        vec!["admin".to_string()],
        TokenIdentity::default(),
        "some-other-secret",
        3600,
    )
    .unwrap();

    let response = app
        .server
        .get("/api/v1/admin/claims")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_claimant_cannot_open_review_queue() {
    let app = create_test_app();
    let token = claimant_token(&ClaimantFixtures::casey());

    let response = app
        .server
        .get("/api/v1/admin/claims")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_reviewer_cannot_decide() {
    let app = create_test_app();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    let claim_id = submit(&app, venue_id, &claimant_token(&ClaimantFixtures::casey())).await;

    let response = app
        .server
        .post(&format!("/api/v1/admin/claims/{}/decision", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&reviewer_token()))
        .json(&json!({ "outcome": "approved" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

// ============ Submission Tests ============

#[tokio::test]
async fn test_submit_claim_marks_venue_pending() {
    let app = create_test_app();
    let casey = ClaimantFixtures::casey();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;

    let claim_id = submit(&app, venue_id, &claimant_token(&casey)).await;

    let response = app
        .server
        .get(&format!("/api/v1/venues/{}/ownership", venue_id.as_uuid()))
        .add_header(header::AUTHORIZATION, bearer(&claimant_token(&casey)))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["claim_status"], "pending_claim");
    assert_eq!(body["pending_claims_count"], 1);
    assert!(body["owner"].is_null());

    let mine = app
        .server
        .get("/api/v1/claims/mine")
        .add_header(header::AUTHORIZATION, bearer(&claimant_token(&casey)))
        .await;
    let claims: Vec<Value> = mine.json();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["id"], claim_id.to_string());
    assert_eq!(claims[0]["claimant_email"], casey.email);
    assert_eq!(claims[0]["status"], "pending");
    assert_eq!(claims[0]["evidence_documents"].as_array().unwrap().len(), 1);

    let received = app.workflow.notifications.last(NotificationTemplate::Received).unwrap();
    assert_eq!(received.recipient, casey.email);
}

#[tokio::test]
async fn test_submit_without_evidence_is_rejected() {
    let app = create_test_app();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;

    let response = app
        .server
        .post(&format!("/api/v1/venues/{}/claims", venue_id.as_uuid()))
        .add_header(
            header::AUTHORIZATION,
            bearer(&claimant_token(&ClaimantFixtures::casey())),
        )
        .multipart(claim_form(&DetailsFixtures::owner()))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "validation_error");
    assert!(app.workflow.claims.all().await.is_empty());
}

#[tokio::test]
async fn test_submit_with_unknown_role_is_rejected() {
    let app = create_test_app();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    let form = MultipartForm::new()
        .add_text("business_name", "Brown Bag Coffee LLC")
        .add_text("business_email", "owner@brownbag.test")
        .add_text("business_phone", "+1 555 0100")
        .add_text("business_role", "landlord")
        .add_text("claim_reason", "I own the building");

    let response = app
        .server
        .post(&format!("/api/v1/venues/{}/claims", venue_id.as_uuid()))
        .add_header(
            header::AUTHORIZATION,
            bearer(&claimant_token(&ClaimantFixtures::casey())),
        )
        .multipart(with_license(form))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_submit_on_unknown_venue_is_not_found() {
    let app = create_test_app();

    let response = app
        .server
        .post(&format!("/api/v1/venues/{}/claims", Uuid::new_v4()))
        .add_header(
            header::AUTHORIZATION,
            bearer(&claimant_token(&ClaimantFixtures::casey())),
        )
        .multipart(with_license(claim_form(&DetailsFixtures::owner())))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_second_active_claim_is_conflict() {
    let app = create_test_app();
    let casey = ClaimantFixtures::casey();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    submit(&app, venue_id, &claimant_token(&casey)).await;

    let response = app
        .server
        .post(&format!("/api/v1/venues/{}/claims", venue_id.as_uuid()))
        .add_header(header::AUTHORIZATION, bearer(&claimant_token(&casey)))
        .multipart(with_license(claim_form(&DetailsFixtures::manager())))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let venue = &app.workflow.venues.all().await[0];
    assert_eq!(venue.pending_claims_count, 1);
}

#[tokio::test]
async fn test_failed_upload_is_bad_gateway() {
    let app = create_test_app();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    app.workflow.evidence.fail_uploads_named("business-license.pdf");

    let response = app
        .server
        .post(&format!("/api/v1/venues/{}/claims", venue_id.as_uuid()))
        .add_header(
            header::AUTHORIZATION,
            bearer(&claimant_token(&ClaimantFixtures::casey())),
        )
        .multipart(with_license(claim_form(&DetailsFixtures::owner())))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "evidence_upload_failed");
    assert_eq!(body["retryable"], true);
    assert!(app.workflow.claims.all().await.is_empty());
}

// ============ Review Tests ============

#[tokio::test]
async fn test_review_queue_and_claim_detail() {
    let app = create_test_app();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    let other_venue = app.workflow.seed_venue(VenueFixtures::night_owl()).await;
    let claim_id = submit(&app, venue_id, &claimant_token(&ClaimantFixtures::casey())).await;
    submit(&app, other_venue, &claimant_token(&ClaimantFixtures::jordan())).await;

    let queue = app
        .server
        .get("/api/v1/admin/claims")
        .add_header(header::AUTHORIZATION, bearer(&reviewer_token()))
        .await;
    queue.assert_status_ok();
    let pending: Vec<Value> = queue.json();
    assert_eq!(pending.len(), 2);

    let approved = app
        .server
        .get("/api/v1/admin/claims?status=approved")
        .add_header(header::AUTHORIZATION, bearer(&reviewer_token()))
        .await;
    let approved: Vec<Value> = approved.json();
    assert!(approved.is_empty());

    let detail = app
        .server
        .get(&format!("/api/v1/admin/claims/{}", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&reviewer_token()))
        .await;
    detail.assert_status_ok();
    let body: Value = detail.json();
    assert_eq!(body["venue_id"], venue_id.as_uuid().to_string());
    assert_eq!(body["business_role"], "owner");

    let venue_claims = app
        .server
        .get(&format!("/api/v1/venues/{}/claims", venue_id.as_uuid()))
        .add_header(header::AUTHORIZATION, bearer(&reviewer_token()))
        .await;
    let venue_claims: Vec<Value> = venue_claims.json();
    assert_eq!(venue_claims.len(), 1);
}

#[tokio::test]
async fn test_unknown_claim_is_not_found() {
    let app = create_test_app();

    let response = app
        .server
        .get(&format!("/api/v1/admin/claims/{}", Uuid::new_v4()))
        .add_header(header::AUTHORIZATION, bearer(&admin_token()))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_approval_verifies_venue_and_blocks_second_decision() {
    let app = create_test_app();
    let casey = ClaimantFixtures::casey();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    let claim_id = submit(&app, venue_id, &claimant_token(&casey)).await;
    let admin = admin_token();

    let response = app
        .server
        .post(&format!("/api/v1/admin/claims/{}/decision", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({ "outcome": "approved", "notes": "License matches" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["claim"]["status"], "approved");
    assert_eq!(body["claim"]["admin_notes"], "License matches");
    assert!(body["claim"]["processed_by"].is_string());

    let venue = &app.workflow.venues.all().await[0];
    assert_eq!(venue.claim_status, VenueClaimStatus::Verified);
    assert_eq!(venue.pending_claims_count, 0);
    assert_eq!(venue.verified_owner_id, Some(casey.id));

    let ownership = app
        .server
        .get(&format!("/api/v1/venues/{}/ownership", venue_id.as_uuid()))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    let ownership: Value = ownership.json();
    assert_eq!(ownership["owner"]["user_id"], casey.id.as_uuid().to_string());
    assert_eq!(ownership["is_business_verified"], true);

    let again = app
        .server
        .post(&format!("/api/v1/admin/claims/{}/decision", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({ "outcome": "rejected", "notes": "Changed my mind" }))
        .await;
    again.assert_status(StatusCode::CONFLICT);
    let body: Value = again.json();
    assert_eq!(body["error"], "already_processed");
    assert_eq!(body["current_status"], "approved");

    assert!(app
        .workflow
        .notifications
        .last(NotificationTemplate::Approved)
        .is_some());
}

#[tokio::test]
async fn test_rejection_requires_reason() {
    let app = create_test_app();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    let claim_id = submit(&app, venue_id, &claimant_token(&ClaimantFixtures::casey())).await;
    let admin = admin_token();

    let response = app
        .server
        .post(&format!("/api/v1/admin/claims/{}/decision", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({ "outcome": "rejected" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .server
        .post(&format!("/api/v1/admin/claims/{}/decision", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({ "outcome": "rejected", "notes": "Document is illegible" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["claim"]["status"], "rejected");
    assert_eq!(body["claim"]["rejection_reason"], "Document is illegible");

    let venue = &app.workflow.venues.all().await[0];
    assert_eq!(venue.claim_status, VenueClaimStatus::Unclaimed);
    assert!(app.workflow.relationships.all().await.is_empty());
}

#[tokio::test]
async fn test_request_documents_keeps_claim_pending() {
    let app = create_test_app();
    let casey = ClaimantFixtures::casey();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    let claim_id = submit(&app, venue_id, &claimant_token(&casey)).await;

    let response = app
        .server
        .post(&format!("/api/v1/admin/claims/{}/documents-request", claim_id))
        .add_header(header::AUTHORIZATION, bearer(&admin_token()))
        .json(&json!({ "message": "Please upload a utility bill" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["notified"], true);

    let claim = &app.workflow.claims.all().await[0];
    assert_eq!(claim.status, domain_claims::ClaimStatus::Pending);
    let sent = app
        .workflow
        .notifications
        .last(NotificationTemplate::DocumentsRequested)
        .unwrap();
    assert_eq!(sent.recipient, casey.email);
}

// ============ Reconciliation Tests ============

#[tokio::test]
async fn test_reconciliation_queue_starts_empty() {
    let app = create_test_app();

    let response = app
        .server
        .get("/api/v1/admin/reconciliation")
        .add_header(header::AUTHORIZATION, bearer(&admin_token()))
        .await;

    response.assert_status_ok();
    let entries: Vec<Value> = response.json();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_resolving_unknown_entry_is_not_found() {
    let app = create_test_app();

    let response = app
        .server
        .post(&format!("/api/v1/admin/reconciliation/{}/resolve", Uuid::new_v4()))
        .add_header(header::AUTHORIZATION, bearer(&admin_token()))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_recount_reports_pending_claims() {
    let app = create_test_app();
    let venue_id = app.workflow.seed_venue(VenueFixtures::brown_bag()).await;
    submit(&app, venue_id, &claimant_token(&ClaimantFixtures::casey())).await;
    submit(&app, venue_id, &claimant_token(&ClaimantFixtures::jordan())).await;

    let response = app
        .server
        .post(&format!("/api/v1/admin/venues/{}/recount", venue_id.as_uuid()))
        .add_header(header::AUTHORIZATION, bearer(&admin_token()))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["pending_claims_count"], 2);
    assert_eq!(body["claim_status"], "pending_claim");
}
