//! Claim workflow engine
//!
//! Drives a claim from submission to an administrator decision:
//!
//! ```text
//! submit:  validate -> duplicate guard -> venue snapshot -> upload evidence
//!          -> create claim -> mark venue pending -> notify "received"
//! decide:  load -> guard -> transition claim -> resolve venue
//!          -> create owner relationship (approvals) -> notify outcome
//! ```
//!
//! Writes after claim creation (and after the terminal transition) run on a
//! spawned task, so dropping the caller's future cannot stop them halfway.
//! Dropping `submit` while evidence is uploading cancels the outstanding
//! uploads and creates nothing.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tracing::{error, info, instrument, warn};

use core_kernel::{AdminId, ClaimId, PortError, UserId, VenueId};
use domain_venue::{ClaimResolution, OwnershipRelationship, RelationshipPort, Venue, VenuePort};

use crate::claim::{Claim, ClaimDetails, ClaimStatus, ClaimantProfile, EvidenceDocument};
use crate::error::ClaimError;
use crate::notification::Notification;
use crate::ports::{ClaimPort, EvidenceStore, NotificationDispatcher, ReconciliationSink};
use crate::reconciliation::{PartialTransition, TransitionStep};

/// Default cap on evidence files per claim
pub const DEFAULT_MAX_EVIDENCE_FILES: usize = 10;
/// Default cap on a single evidence file (10 MiB)
pub const DEFAULT_MAX_EVIDENCE_BYTES: usize = 10 * 1024 * 1024;

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Prefix of the venue management link sent on approval
    pub venue_manage_base_url: String,
    pub max_evidence_files: usize,
    pub max_evidence_bytes: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            venue_manage_base_url: "http://localhost:3000".to_string(),
            max_evidence_files: DEFAULT_MAX_EVIDENCE_FILES,
            max_evidence_bytes: DEFAULT_MAX_EVIDENCE_BYTES,
        }
    }
}

/// Everything the engine talks to
#[derive(Clone)]
pub struct WorkflowPorts {
    pub claims: Arc<dyn ClaimPort>,
    pub venues: Arc<dyn VenuePort>,
    pub relationships: Arc<dyn RelationshipPort>,
    pub evidence: Arc<dyn EvidenceStore>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub reconciliation: Arc<dyn ReconciliationSink>,
}

/// A file attached to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl EvidenceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Input to [`ClaimWorkflowEngine::submit`]
#[derive(Debug, Clone)]
pub struct ClaimSubmission {
    pub venue_id: VenueId,
    pub claimant: ClaimantProfile,
    pub details: ClaimDetails,
    pub evidence: Vec<EvidenceFile>,
}

/// Administrator decision on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved,
    Rejected,
}

impl DecisionOutcome {
    /// Claim status the decision moves to
    pub fn status(&self) -> ClaimStatus {
        match self {
            DecisionOutcome::Approved => ClaimStatus::Approved,
            DecisionOutcome::Rejected => ClaimStatus::Rejected,
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status().as_str())
    }
}

/// The claim verification state machine
#[derive(Clone)]
pub struct ClaimWorkflowEngine {
    ports: WorkflowPorts,
    config: Arc<WorkflowConfig>,
}

impl ClaimWorkflowEngine {
    pub fn new(ports: WorkflowPorts, config: WorkflowConfig) -> Self {
        Self {
            ports,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Submits a new ownership claim and returns its id
    ///
    /// Nothing is written unless every evidence upload succeeds. A failure
    /// to bump the venue counter after the claim is stored is reported as
    /// [`ClaimError::PartialTransition`].
    #[instrument(
        skip(self, submission),
        fields(venue_id = %submission.venue_id, claimant_id = %submission.claimant.id)
    )]
    pub async fn submit(&self, submission: ClaimSubmission) -> Result<ClaimId, ClaimError> {
        self.validate_submission(&submission)?;
        let ClaimSubmission {
            venue_id,
            claimant,
            details,
            evidence,
        } = submission;

        // Fast path only; the storage-level unique index is authoritative
        let existing = self
            .ports
            .claims
            .list_by_claimant(claimant.id)
            .await
            .map_err(ClaimError::Storage)?;
        if existing
            .iter()
            .any(|c| c.venue_id == venue_id && c.status.blocks_reclaim())
        {
            return Err(ClaimError::DuplicateClaim {
                claimant_id: claimant.id,
                venue_id,
            });
        }

        let venue = self.load_venue(venue_id).await?;
        let claim_id = ClaimId::new_v7();
        let documents = self.upload_evidence(claim_id, &evidence).await?;
        let claim = Claim::submitted(claim_id, &venue, claimant, details, documents);

        let engine = self.clone();
        tokio::spawn(async move { engine.commit_submission(claim).await })
            .await
            .map_err(task_failed)?
    }

    /// Approves or rejects a pending claim
    ///
    /// A rejection requires non-empty notes, which become the rejection
    /// reason. Once the claim is terminal, failures of the venue or
    /// relationship writes are queued for reconciliation and reported as
    /// [`ClaimError::PartialTransition`]; they are never retried here.
    #[instrument(skip_all, fields(claim_id = %claim_id, outcome = %outcome, admin_id = %admin_id))]
    pub async fn decide(
        &self,
        claim_id: ClaimId,
        outcome: DecisionOutcome,
        admin_id: AdminId,
        notes: Option<String>,
    ) -> Result<Claim, ClaimError> {
        let claim = self.get(claim_id).await?;
        if !claim.can_transition_to(outcome.status()) {
            return Err(ClaimError::AlreadyProcessed {
                claim_id,
                status: claim.status,
            });
        }

        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if outcome == DecisionOutcome::Rejected && notes.is_none() {
            return Err(ClaimError::validation("a rejection requires a stated reason"));
        }

        if outcome == DecisionOutcome::Approved {
            let venue = self.load_venue(claim.venue_id).await?;
            if let Some(owner_id) = venue.verified_owner_id {
                return Err(ClaimError::OwnershipConflict {
                    venue_id: venue.id,
                    owner_id,
                });
            }
        }

        let engine = self.clone();
        tokio::spawn(async move { engine.commit_decision(claim, outcome, admin_id, notes).await })
            .await
            .map_err(task_failed)?
    }

    /// Asks the claimant of a pending claim for more evidence
    ///
    /// The claim is not modified. Returns whether the notification was
    /// accepted by the dispatcher.
    #[instrument(skip_all, fields(claim_id = %claim_id, admin_id = %admin_id))]
    pub async fn request_documents(
        &self,
        claim_id: ClaimId,
        admin_id: AdminId,
        message: &str,
    ) -> Result<bool, ClaimError> {
        let claim = self.get(claim_id).await?;
        if claim.status.is_terminal() {
            return Err(ClaimError::AlreadyProcessed {
                claim_id,
                status: claim.status,
            });
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(ClaimError::validation("a document request needs a message"));
        }

        info!("Additional documents requested");
        Ok(self.notify(Notification::documents_requested(&claim, message)).await)
    }

    /// Loads one claim
    pub async fn get(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        self.ports.claims.get(claim_id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::ClaimNotFound(claim_id)
            } else {
                ClaimError::Storage(e)
            }
        })
    }

    /// Claims in `status` for the admin review screen, newest first
    pub async fn review_queue(&self, status: ClaimStatus, limit: u32) -> Result<Vec<Claim>, ClaimError> {
        let claims = self
            .ports
            .claims
            .list_by_status(status, limit)
            .await
            .map_err(ClaimError::Storage)?;
        Ok(newest_first(claims))
    }

    /// Every claim for a venue, newest first
    pub async fn claims_for_venue(&self, venue_id: VenueId) -> Result<Vec<Claim>, ClaimError> {
        let claims = self
            .ports
            .claims
            .list_by_venue(venue_id)
            .await
            .map_err(ClaimError::Storage)?;
        Ok(newest_first(claims))
    }

    /// Every claim a user has submitted, newest first
    pub async fn claims_for_claimant(&self, claimant_id: UserId) -> Result<Vec<Claim>, ClaimError> {
        let claims = self
            .ports
            .claims
            .list_by_claimant(claimant_id)
            .await
            .map_err(ClaimError::Storage)?;
        Ok(newest_first(claims))
    }

    /// Venue with its current ownership state
    pub async fn venue(&self, venue_id: VenueId) -> Result<Venue, ClaimError> {
        self.load_venue(venue_id).await
    }

    /// Owner relationship for a venue, if one exists
    pub async fn owner_of(&self, venue_id: VenueId) -> Result<Option<OwnershipRelationship>, ClaimError> {
        self.ports
            .relationships
            .find_owner(venue_id)
            .await
            .map_err(ClaimError::Storage)
    }

    fn validate_submission(&self, submission: &ClaimSubmission) -> Result<(), ClaimError> {
        let files = &submission.evidence;
        if files.is_empty() {
            return Err(ClaimError::validation("at least one evidence document is required"));
        }
        if files.len() > self.config.max_evidence_files {
            return Err(ClaimError::validation(format!(
                "at most {} evidence documents are accepted, got {}",
                self.config.max_evidence_files,
                files.len()
            )));
        }
        for file in files {
            if file.name.trim().is_empty() {
                return Err(ClaimError::validation("evidence document name is empty"));
            }
            if file.bytes.is_empty() {
                return Err(ClaimError::validation(format!(
                    "evidence document '{}' is empty",
                    file.name
                )));
            }
            if file.bytes.len() > self.config.max_evidence_bytes {
                return Err(ClaimError::validation(format!(
                    "evidence document '{}' exceeds {} bytes",
                    file.name, self.config.max_evidence_bytes
                )));
            }
        }

        let details = &submission.details;
        for (field, value) in [
            ("business_name", &details.business_name),
            ("business_email", &details.business_email),
            ("business_phone", &details.business_phone),
            ("claim_reason", &details.claim_reason),
            ("claimant_email", &submission.claimant.email),
        ] {
            if value.trim().is_empty() {
                return Err(ClaimError::validation(format!("{field} is required")));
            }
        }
        if !details.business_email.contains('@') {
            return Err(ClaimError::validation("business_email is not an email address"));
        }
        Ok(())
    }

    async fn load_venue(&self, venue_id: VenueId) -> Result<Venue, ClaimError> {
        self.ports.venues.get(venue_id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::VenueNotFound(venue_id)
            } else {
                ClaimError::Storage(e)
            }
        })
    }

    async fn upload_evidence(
        &self,
        claim_id: ClaimId,
        files: &[EvidenceFile],
    ) -> Result<Vec<EvidenceDocument>, ClaimError> {
        let uploads = files.iter().map(|file| async move {
            let url = self
                .ports
                .evidence
                .put(claim_id, &file.bytes, &file.name)
                .await
                .map_err(|source| ClaimError::EvidenceUpload {
                    file_name: file.name.clone(),
                    source,
                })?;
            Ok::<_, ClaimError>(EvidenceDocument {
                name: file.name.clone(),
                url,
                uploaded_at: Utc::now(),
            })
        });
        try_join_all(uploads).await
    }

    async fn commit_submission(&self, claim: Claim) -> Result<ClaimId, ClaimError> {
        let claim_id = self.ports.claims.create(claim.clone()).await.map_err(|e| {
            if e.is_conflict() {
                ClaimError::DuplicateClaim {
                    claimant_id: claim.claimant_id,
                    venue_id: claim.venue_id,
                }
            } else {
                ClaimError::Storage(e)
            }
        })?;

        if let Err(e) = self.ports.venues.mark_pending_claim(claim.venue_id).await {
            return Err(self.record_partial(&claim, TransitionStep::PendingCounter, e).await);
        }

        info!(
            claim_id = %claim_id,
            evidence_documents = claim.evidence_documents.len(),
            "Claim submitted"
        );
        self.notify(Notification::received(&claim)).await;
        Ok(claim_id)
    }

    async fn commit_decision(
        &self,
        claim: Claim,
        outcome: DecisionOutcome,
        admin_id: AdminId,
        notes: Option<String>,
    ) -> Result<Claim, ClaimError> {
        let decided = match self
            .ports
            .claims
            .transition_to_terminal(claim.id, outcome.status(), admin_id, notes)
            .await
        {
            Ok(decided) => decided,
            Err(e) if e.is_conflict() => {
                // Lost a race with another decision
                let current = self.get(claim.id).await?;
                return Err(ClaimError::AlreadyProcessed {
                    claim_id: claim.id,
                    status: current.status,
                });
            }
            Err(e) if e.is_not_found() => return Err(ClaimError::ClaimNotFound(claim.id)),
            Err(e) => return Err(ClaimError::Storage(e)),
        };

        let resolution = match outcome {
            DecisionOutcome::Approved => ClaimResolution::Approved {
                owner_id: decided.claimant_id,
                business_details: decided.business_details(),
            },
            DecisionOutcome::Rejected => ClaimResolution::Rejected,
        };
        if let Err(e) = self.ports.venues.resolve_claim(decided.venue_id, resolution).await {
            return Err(self.record_partial(&decided, TransitionStep::VenueResolution, e).await);
        }

        if outcome == DecisionOutcome::Approved {
            let relationship = OwnershipRelationship::owner(decided.claimant_id, decided.venue_id);
            if let Err(e) = self.ports.relationships.create(relationship).await {
                return Err(self
                    .record_partial(&decided, TransitionStep::RelationshipCreation, e)
                    .await);
            }
        }

        info!(venue_id = %decided.venue_id, status = %decided.status, "Claim decided");

        let notification = match outcome {
            DecisionOutcome::Approved => Notification::approved(&decided, self.manage_url(decided.venue_id)),
            DecisionOutcome::Rejected => Notification::rejected(
                &decided,
                decided.rejection_reason.clone().unwrap_or_default(),
            ),
        };
        self.notify(notification).await;
        Ok(decided)
    }

    async fn record_partial(&self, claim: &Claim, step: TransitionStep, source: PortError) -> ClaimError {
        let entry = PartialTransition::new(claim, step, &source);
        let entry_id = entry.id;
        let reconciliation_id = match self.ports.reconciliation.record(entry).await {
            Ok(()) => Some(entry_id),
            Err(record_error) => {
                error!(claim_id = %claim.id, error = %record_error, "Failed to queue partial transition");
                None
            }
        };

        error!(
            claim_id = %claim.id,
            venue_id = %claim.venue_id,
            step = %step,
            error = %source,
            reconciliation_id = ?reconciliation_id,
            "Claim transition partially applied"
        );
        ClaimError::PartialTransition {
            claim_id: claim.id,
            reconciliation_id,
            step,
            source,
        }
    }

    async fn notify(&self, notification: Notification) -> bool {
        match self.ports.notifier.send(&notification).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    error = %e,
                    template = %notification.template,
                    recipient = %notification.recipient,
                    "Notification dispatch failed"
                );
                false
            }
        }
    }

    fn manage_url(&self, venue_id: VenueId) -> String {
        format!(
            "{}/venues/{}/manage",
            self.config.venue_manage_base_url.trim_end_matches('/'),
            venue_id.as_uuid()
        )
    }
}

fn newest_first(mut claims: Vec<Claim>) -> Vec<Claim> {
    claims.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    claims
}

fn task_failed(e: JoinError) -> ClaimError {
    ClaimError::Storage(PortError::internal(format!("workflow task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_maps_to_terminal_status() {
        assert_eq!(DecisionOutcome::Approved.status(), ClaimStatus::Approved);
        assert_eq!(DecisionOutcome::Rejected.status(), ClaimStatus::Rejected);
        assert!(DecisionOutcome::Rejected.status().is_terminal());
        assert_eq!(DecisionOutcome::Approved.to_string(), "approved");
    }

    #[test]
    fn test_default_config() {
        let config = WorkflowConfig::default();
        assert_eq!(config.max_evidence_files, 10);
        assert_eq!(config.max_evidence_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_config_fills_missing_fields() {
        let config: WorkflowConfig =
            serde_json::from_str(r#"{"venue_manage_base_url": "https://venues.example"}"#).unwrap();
        assert_eq!(config.venue_manage_base_url, "https://venues.example");
        assert_eq!(config.max_evidence_files, DEFAULT_MAX_EVIDENCE_FILES);
    }
}
