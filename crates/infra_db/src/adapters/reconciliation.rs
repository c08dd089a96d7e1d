//! PostgreSQL Reconciliation Queue Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError, ReconciliationId, UserId,
    VenueId,
};
use domain_claims::{PartialTransition, ReconciliationSink, TransitionStep};

use super::claims::{status_from_db, status_to_db};
use crate::repositories::reconciliation::{
    ReconciliationRepository, ReconciliationRow, TransitionStep as DbTransitionStep,
};

/// Reconciliation queue stored in `claim_reconciliation_queue`
#[derive(Debug, Clone)]
pub struct PostgresReconciliationAdapter {
    repository: ReconciliationRepository,
    pool: PgPool,
}

impl PostgresReconciliationAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReconciliationRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresReconciliationAdapter {}

#[async_trait]
impl HealthCheckable for PostgresReconciliationAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-reconciliation-adapter").await
    }
}

#[async_trait]
impl ReconciliationSink for PostgresReconciliationAdapter {
    #[instrument(skip_all, fields(reconciliation_id = %entry.id, claim_id = %entry.claim_id))]
    async fn record(&self, entry: PartialTransition) -> Result<(), PortError> {
        let row = ReconciliationRow {
            reconciliation_id: *entry.id.as_uuid(),
            claim_id: *entry.claim_id.as_uuid(),
            venue_id: *entry.venue_id.as_uuid(),
            claimant_id: *entry.claimant_id.as_uuid(),
            claim_status: status_to_db(entry.claim_status),
            failed_step: match entry.failed_step {
                TransitionStep::PendingCounter => DbTransitionStep::PendingCounter,
                TransitionStep::VenueResolution => DbTransitionStep::VenueResolution,
                TransitionStep::RelationshipCreation => DbTransitionStep::RelationshipCreation,
            },
            error: entry.error,
            recorded_at: entry.recorded_at,
            resolved_at: entry.resolved_at,
        };
        self.repository.insert(&row).await?;
        Ok(())
    }

    async fn get(&self, id: ReconciliationId) -> Result<PartialTransition, PortError> {
        let row = self.repository.get_by_id(*id.as_uuid()).await.map_err(|e| {
            if e.is_not_found() {
                PortError::not_found("PartialTransition", id)
            } else {
                e.into()
            }
        })?;
        Ok(row_to_entry(row))
    }

    async fn unresolved(&self) -> Result<Vec<PartialTransition>, PortError> {
        let rows = self.repository.find_unresolved().await?;
        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    async fn mark_resolved(&self, id: ReconciliationId) -> Result<PartialTransition, PortError> {
        let row = self.repository.mark_resolved(*id.as_uuid()).await.map_err(|e| {
            if e.is_not_found() {
                PortError::not_found("PartialTransition", id)
            } else {
                e.into()
            }
        })?;
        Ok(row_to_entry(row))
    }
}

fn row_to_entry(row: ReconciliationRow) -> PartialTransition {
    PartialTransition {
        id: ReconciliationId::from_uuid(row.reconciliation_id),
        claim_id: ClaimId::from_uuid(row.claim_id),
        venue_id: VenueId::from_uuid(row.venue_id),
        claimant_id: UserId::from_uuid(row.claimant_id),
        claim_status: status_from_db(row.claim_status),
        failed_step: match row.failed_step {
            DbTransitionStep::PendingCounter => TransitionStep::PendingCounter,
            DbTransitionStep::VenueResolution => TransitionStep::VenueResolution,
            DbTransitionStep::RelationshipCreation => TransitionStep::RelationshipCreation,
        },
        error: row.error,
        recorded_at: row.recorded_at,
        resolved_at: row.resolved_at,
    }
}
