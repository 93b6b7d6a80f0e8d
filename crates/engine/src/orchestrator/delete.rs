// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cascading delete and the pattern-offset reset.
//!
//! Deleting a generation campaign first deletes its transitive dependents
//! (DNS campaigns sourcing from it, HTTP campaigns sourcing from those),
//! deepest first, each in its own transaction. The root then goes through a
//! compensated boundary: offset reset (only when it was the pattern's last
//! holder), row drop, final event, audit. The event log survives deletion.

use super::Orchestrator;
use crate::ctx::OpContext;
use crate::depgraph;
use crate::error::OrchestratorError;
use serde_json::json;
use svy_core::{
    fingerprint, normalize, AuditEntry, BusMessage, CampaignId, Clock, EventKind, PhaseStatus,
    StateEvent, USER_CANCELLED,
};
use svy_store::{OpClass, StoreError, TxnBoundary};

impl<C: Clock> Orchestrator<C> {
    /// Delete a campaign and everything that depends on it.
    pub async fn delete_campaign(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
    ) -> Result<(), OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;

        let dependents = self
            .store
            .transaction(|txn| -> Result<Vec<CampaignId>, StoreError> {
                txn.campaign(id)?;
                Ok(depgraph::dependents_depth_first(txn, id))
            })
            .map_err(OrchestratorError::from)?;

        if !dependents.is_empty() {
            tracing::info!(
                campaign = %id,
                dependents = dependents.len(),
                "cascading delete"
            );
        }
        for dependent in &dependents {
            self.delete_single(ctx, dependent, true).await?;
        }
        self.delete_single(ctx, id, false).await
    }

    /// Bulk delete. An empty input succeeds with zero deletions; ids
    /// already removed by an earlier cascade in the same batch are skipped.
    pub async fn delete_campaigns(
        &self,
        ctx: &OpContext,
        ids: &[CampaignId],
    ) -> Result<usize, OrchestratorError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut deleted = 0;
        for id in ids {
            match self.delete_campaign(ctx, id).await {
                Ok(()) => deleted += 1,
                Err(OrchestratorError::Validation { code: "not_found", .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(deleted)
    }

    /// Delete one campaign row. `acquire_locks` is false for the cascade
    /// root, whose locks the caller already holds.
    async fn delete_single(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
        acquire_locks: bool,
    ) -> Result<(), OrchestratorError> {
        let _guard = if acquire_locks { Some(self.guard(ctx, id).await?) } else { None };
        let now = self.now();
        let coordinator = self.coordinator.clone();

        let campaign = self.get_campaign(id)?;
        if campaign.phase_status == PhaseStatus::InProgress {
            self.txn
                .run("delete_auto_cancel", OpClass::StatusUpdate, id.as_str(), |txn| {
                    coordinator.transition_in(
                        txn,
                        id,
                        PhaseStatus::Failed,
                        ctx,
                        Some(USER_CANCELLED),
                        serde_json::Value::Null,
                        now,
                    )
                })
                .await?;
        }

        let store = self.store.clone();
        TxnBoundary::new(&store, "delete_campaign")
            .step("reset_offset", |txn| {
                if let Some(params) = txn.generation_params(id) {
                    let pattern = fingerprint(&params);
                    if depgraph::pattern_holder_count(txn, &pattern, id) == 0 {
                        tracing::info!(
                            campaign = %id,
                            pattern = %pattern,
                            "last holder deleted, resetting offset"
                        );
                        txn.reset_offset(&pattern, normalize(&params), now);
                    }
                }
                Ok(())
            })
            .step("drop_rows", |txn| {
                txn.remove_campaign(id)?;
                Ok(())
            })
            .step("final_event", |txn| {
                txn.append_event(StateEvent::new(
                    id.clone(),
                    EventKind::Deleted,
                    ctx.source,
                    ctx.actor.clone(),
                    ctx.correlation_id.clone(),
                    now,
                ))?;
                Ok(())
            })
            .step("audit", |txn| {
                txn.append_audit(AuditEntry::new(
                    ctx.actor.clone(),
                    "campaign_deleted",
                    "campaign",
                    id.as_str(),
                    json!({"name": campaign.name, "correlation_id": ctx.correlation_id}),
                    now,
                ));
                Ok(())
            })
            .execute()
            .map_err(OrchestratorError::from)?;

        let sequence = self
            .store
            .read(|t| t.events.get(id).and_then(|log| log.last()).map(|e| e.sequence))
            .unwrap_or(0);
        self.notify(sequence, BusMessage::Deleted { campaign_id: id.clone() }).await;
        tracing::info!(campaign = %id, "campaign deleted");
        Ok(())
    }
}
