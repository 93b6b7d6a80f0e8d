// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker completion callbacks and auto-chaining.
//!
//! Completion marks the active phase `completed`. In full-sequence mode the
//! phase pointer then advances: generation to DNS only when DNS params
//! exist, DNS to HTTP only when HTTP params exist, HTTP to analysis
//! unconditionally, analysis to full completion. Advancing only moves the
//! pointer; starting the new phase stays a separate user or scheduler
//! action.
//!
//! Callbacks are at-least-once: a repeat for an already-completed or
//! already-advanced phase is an idempotent no-op.

use super::Orchestrator;
use crate::ctx::OpContext;
use crate::error::OrchestratorError;
use crate::requests::CompletionReport;
use serde_json::json;
use svy_core::{
    AuditEntry, BusMessage, Campaign, Clock, EventKind, EventSource, Phase, PhaseStatus,
    StateEvent,
};
use svy_store::OpClass;

impl<C: Clock> Orchestrator<C> {
    pub async fn handle_campaign_completion(
        &self,
        ctx: &OpContext,
        report: CompletionReport,
    ) -> Result<Campaign, OrchestratorError> {
        let id = report.campaign_id.clone();
        let _guard = self.guard(ctx, &id).await?;
        let now = self.now();
        let coordinator = self.coordinator.clone();

        let (campaign, messages) = self
            .txn
            .run::<_, OrchestratorError, _>("handle_campaign_completion", OpClass::StatusUpdate, id.as_str(), |txn| {
                let mut messages: Vec<(u64, BusMessage)> = Vec::new();
                let mut campaign = txn.campaign(&id)?;

                let Some(phase) = campaign.current_phase else {
                    tracing::info!(campaign = %id, "completion for finished campaign, ignoring");
                    return Ok((campaign, messages));
                };
                if phase != report.phase {
                    tracing::info!(
                        campaign = %id,
                        reported = %report.phase,
                        current = %phase,
                        "stale completion callback, ignoring"
                    );
                    return Ok((campaign, messages));
                }
                if campaign.phase_status == PhaseStatus::Completed {
                    return Ok((campaign, messages));
                }

                // Counter bookkeeping before the transition.
                campaign.processed_items = report.processed;
                if campaign.total_items == 0 {
                    campaign.total_items = report.processed;
                }
                campaign.recompute_progress();
                if phase == Phase::DnsValidation {
                    if let Some(passing) = report.passing {
                        if !campaign.metadata.is_object() {
                            campaign.metadata = json!({});
                        }
                        campaign.metadata["dns_valid_count"] = passing.into();
                    }
                }
                txn.put_campaign(campaign.clone());

                let completed = coordinator.transition_in(
                    txn,
                    &id,
                    PhaseStatus::Completed,
                    ctx,
                    None,
                    json!({"processed": report.processed, "passing": report.passing}),
                    now,
                )?;
                messages.push((
                    completed.sequence,
                    BusMessage::StateChanged {
                        campaign_id: id.clone(),
                        status: PhaseStatus::Completed,
                    },
                ));
                campaign = txn.campaign(&id)?;

                if !campaign.full_sequence_mode {
                    return Ok((campaign, messages));
                }

                let next = match phase {
                    Phase::Generation => txn.dns_params(&id).map(|_| Phase::DnsValidation),
                    Phase::DnsValidation => {
                        txn.http_params(&id).map(|_| Phase::HttpKeywordValidation)
                    }
                    Phase::HttpKeywordValidation => Some(Phase::Analysis),
                    Phase::Analysis => None,
                };
                if next.is_none() && phase != Phase::Analysis {
                    tracing::info!(
                        campaign = %id,
                        phase = %phase,
                        "next phase not configured, holding at completion"
                    );
                    return Ok((campaign, messages));
                }

                let from = campaign.current_phase;
                campaign.advance_to(next, now);
                if next.is_some() {
                    campaign.total_items = report.passing.unwrap_or(report.processed);
                }
                txn.put_campaign(campaign.clone());
                let advanced = txn.append_event(
                    StateEvent::new(
                        id.clone(),
                        EventKind::PhaseChanged { from_phase: from, to_phase: next },
                        EventSource::Orchestrator,
                        ctx.actor.clone(),
                        ctx.correlation_id.clone(),
                        now,
                    )
                    .causation(completed.id.as_str()),
                )?;
                txn.append_audit(AuditEntry::new(
                    ctx.actor.clone(),
                    "campaign_phase_advanced",
                    "campaign",
                    id.as_str(),
                    json!({
                        "from": from.map(|p| p.to_string()),
                        "to": next.map(|p| p.to_string()),
                    }),
                    now,
                ));
                messages.push((
                    advanced.sequence,
                    BusMessage::PhaseChanged { campaign_id: id.clone(), phase: next },
                ));
                Ok((campaign, messages))
            })
            .await?;

        for (sequence, msg) in messages {
            self.notify(sequence, msg).await;
        }
        Ok(campaign)
    }
}
