// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start, pause, resume, cancel, error, scalar updates, progress, and the
//! pattern-offset high-water mark.

use super::Orchestrator;
use crate::ctx::OpContext;
use crate::error::OrchestratorError;
use crate::requests::UpdateCampaignRequest;
use serde_json::json;
use svy_core::{
    fingerprint, normalize, AuditEntry, BusMessage, Campaign, CampaignId, Clock, EventKind,
    Phase, PhaseStatus, StateEvent, USER_CANCELLED,
};
use svy_store::OpClass;

impl<C: Clock> Orchestrator<C> {
    /// Enqueue the current phase's job and move it to `in_progress`.
    ///
    /// Accepted when the phase has not started, or (the in-place DNS path)
    /// when generation has completed and DNS parameters are already
    /// attached, in which case the phase pointer advances first. The
    /// analysis phase produces no job and completes immediately.
    pub async fn start_campaign(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
    ) -> Result<Campaign, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        let coordinator = self.coordinator.clone();
        let dispatcher = self.dispatcher;
        let dispatch_jobs = self.dispatch_jobs;

        let (campaign, sequence) = self
            .txn
            .run("start_campaign", OpClass::StartResume, id.as_str(), |txn| {
                let mut campaign = txn.campaign(id)?;
                let Some(phase) = campaign.current_phase else {
                    return Err(OrchestratorError::validation(
                        "campaign_complete",
                        "campaign has finished its pipeline",
                    ));
                };

                if phase == Phase::Generation
                    && campaign.phase_status == PhaseStatus::Completed
                    && txn.dns_params(id).is_some()
                {
                    // In-place DNS: generation finished and DNS params are
                    // attached, so starting means entering the next phase.
                    let from = campaign.current_phase;
                    campaign.advance_to(Some(Phase::DnsValidation), now);
                    txn.put_campaign(campaign.clone());
                    txn.append_event(StateEvent::new(
                        id.clone(),
                        EventKind::PhaseChanged {
                            from_phase: from,
                            to_phase: Some(Phase::DnsValidation),
                        },
                        ctx.source,
                        ctx.actor.clone(),
                        ctx.correlation_id.clone(),
                        now,
                    ))?;
                } else if campaign.phase_status != PhaseStatus::NotStarted {
                    return Err(OrchestratorError::validation(
                        "not_in_pending",
                        format!("phase_status is {}", campaign.phase_status),
                    ));
                }

                let current = txn.campaign(id)?;
                let job = if dispatch_jobs {
                    dispatcher.enqueue(txn, &current, now)?
                } else {
                    None
                };
                let event = coordinator.transition_in(
                    txn,
                    id,
                    PhaseStatus::InProgress,
                    ctx,
                    None,
                    json!({"job_id": job.as_ref().map(|j| j.id.to_string())}),
                    now,
                )?;
                let mut sequence = event.sequence;

                let mut campaign = txn.campaign(id)?;
                if campaign.current_phase == Some(Phase::Analysis) {
                    // No worker job: the phase completes on the spot.
                    let done = coordinator.transition_in(
                        txn,
                        id,
                        PhaseStatus::Completed,
                        ctx,
                        None,
                        serde_json::Value::Null,
                        now,
                    )?;
                    sequence = done.sequence;
                    campaign = txn.campaign(id)?;
                    if campaign.full_sequence_mode {
                        let from = campaign.current_phase;
                        campaign.advance_to(None, now);
                        txn.put_campaign(campaign.clone());
                        let ev = txn.append_event(
                            StateEvent::new(
                                id.clone(),
                                EventKind::PhaseChanged { from_phase: from, to_phase: None },
                                ctx.source,
                                ctx.actor.clone(),
                                ctx.correlation_id.clone(),
                                now,
                            )
                            .causation(done.id.as_str()),
                        )?;
                        sequence = ev.sequence;
                    }
                }
                Ok((campaign, sequence))
            })
            .await?;

        self.notify(
            sequence,
            BusMessage::StateChanged { campaign_id: id.clone(), status: campaign.phase_status },
        )
        .await;
        Ok(campaign)
    }

    /// `in_progress → paused`. Any other status is rejected by the
    /// transition table.
    pub async fn pause_campaign(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
    ) -> Result<Campaign, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        let coordinator = self.coordinator.clone();
        let event = self
            .txn
            .run("pause_campaign", OpClass::StatusUpdate, id.as_str(), |txn| {
                coordinator.transition_in(
                    txn,
                    id,
                    PhaseStatus::Paused,
                    ctx,
                    None,
                    serde_json::Value::Null,
                    now,
                )
            })
            .await?;
        self.notify(
            event.sequence,
            BusMessage::StateChanged { campaign_id: id.clone(), status: PhaseStatus::Paused },
        )
        .await;
        self.get_campaign(id)
    }

    /// `paused → in_progress`, with a freshly marshalled job so the worker
    /// never sees a stale or empty payload.
    pub async fn resume_campaign(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
    ) -> Result<Campaign, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        let coordinator = self.coordinator.clone();
        let dispatcher = self.dispatcher;
        let dispatch_jobs = self.dispatch_jobs;
        let event = self
            .txn
            .run("resume_campaign", OpClass::StartResume, id.as_str(), |txn| {
                let campaign = txn.campaign(id)?;
                if campaign.phase_status != PhaseStatus::Paused {
                    return Err(OrchestratorError::validation(
                        "not_paused",
                        format!("phase_status is {}", campaign.phase_status),
                    ));
                }
                let job = if dispatch_jobs {
                    dispatcher.enqueue(txn, &campaign, now)?
                } else {
                    None
                };
                coordinator.transition_in(
                    txn,
                    id,
                    PhaseStatus::InProgress,
                    ctx,
                    None,
                    json!({"job_id": job.as_ref().map(|j| j.id.to_string()), "resumed": true}),
                    now,
                )
            })
            .await?;
        self.notify(
            event.sequence,
            BusMessage::StateChanged { campaign_id: id.clone(), status: PhaseStatus::InProgress },
        )
        .await;
        self.get_campaign(id)
    }

    /// Cancel a non-terminal campaign: `→ failed` with reason
    /// `user_cancelled`. On a terminal campaign this is a validation error
    /// and nothing is written.
    pub async fn cancel_campaign(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
    ) -> Result<Campaign, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        let coordinator = self.coordinator.clone();
        let event = self
            .txn
            .run("cancel_campaign", OpClass::StatusUpdate, id.as_str(), |txn| {
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
        self.notify(
            event.sequence,
            BusMessage::StateChanged { campaign_id: id.clone(), status: PhaseStatus::Failed },
        )
        .await;
        self.get_campaign(id)
    }

    /// Mark a non-terminal campaign failed with the supplied message.
    pub async fn set_campaign_error(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
        message: impl Into<String>,
    ) -> Result<Campaign, OrchestratorError> {
        let message = message.into();
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        let coordinator = self.coordinator.clone();
        let event = self
            .txn
            .run("set_campaign_error", OpClass::StatusUpdate, id.as_str(), |txn| {
                coordinator.transition_in(
                    txn,
                    id,
                    PhaseStatus::Failed,
                    ctx,
                    Some(message.as_str()),
                    serde_json::Value::Null,
                    now,
                )
            })
            .await?;
        self.notify(
            event.sequence,
            BusMessage::StateChanged { campaign_id: id.clone(), status: PhaseStatus::Failed },
        )
        .await;
        self.get_campaign(id)
    }

    /// Scalar field updates. Phase and status are untouchable here; those
    /// flows live in the configure and completion paths.
    pub async fn update_campaign(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
        req: UpdateCampaignRequest,
    ) -> Result<Campaign, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        self.txn
            .run("update_campaign", OpClass::StatusUpdate, id.as_str(), |txn| {
                let mut campaign = txn.campaign(id)?;
                if let Some(name) = &req.name {
                    if name.trim().is_empty() {
                        return Err(OrchestratorError::validation(
                            "invalid_name",
                            "campaign name is empty",
                        ));
                    }
                    campaign.name = name.clone();
                }
                if let Some(total) = req.total_items {
                    campaign.total_items = total;
                    campaign.recompute_progress();
                }
                if let Some(mode) = req.full_sequence_mode {
                    campaign.full_sequence_mode = mode;
                }
                if let Some(metadata) = &req.metadata {
                    campaign.metadata = metadata.clone();
                }
                campaign.updated_at_ms = now;
                txn.put_campaign(campaign.clone());
                txn.append_audit(AuditEntry::new(
                    ctx.actor.clone(),
                    "campaign_updated",
                    "campaign",
                    id.as_str(),
                    json!({
                        "name": req.name,
                        "total_items": req.total_items,
                        "full_sequence_mode": req.full_sequence_mode,
                    }),
                    now,
                ));
                Ok(campaign)
            })
            .await
    }

    /// Worker progress callback. Counter update only: no state-machine
    /// transition and no event; subscribers get a `campaign:progress`
    /// message.
    pub async fn report_progress(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
        processed: u64,
        total: Option<u64>,
    ) -> Result<Campaign, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        let (campaign, sequence) = self
            .txn
            .run("report_progress", OpClass::StatusUpdate, id.as_str(), |txn| {
                let mut campaign = txn.campaign(id)?;
                if campaign.is_terminal() {
                    return Err(OrchestratorError::validation(
                        "campaign_terminal",
                        format!("phase_status is {}", campaign.phase_status),
                    ));
                }
                if let Some(total) = total {
                    campaign.total_items = total;
                }
                campaign.processed_items = if campaign.total_items > 0 {
                    processed.min(campaign.total_items)
                } else {
                    processed
                };
                campaign.recompute_progress();
                campaign.updated_at_ms = now;
                txn.put_campaign(campaign.clone());
                Ok((campaign, txn.last_sequence(id)))
            })
            .await?;
        self.notify(
            sequence,
            BusMessage::Progress {
                campaign_id: id.clone(),
                processed: campaign.processed_items,
                total: campaign.total_items,
                percent: campaign.progress_percent,
            },
        )
        .await;
        Ok(campaign)
    }

    /// Worker callback raising the pattern's shared offset high-water
    /// mark. Never lowers it; returns the stored offset.
    pub async fn advance_pattern_offset(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
        offset: u64,
    ) -> Result<u64, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let now = self.now();
        self.txn
            .run("advance_pattern_offset", OpClass::StatusUpdate, id.as_str(), |txn| {
                let params = txn.generation_params(id).ok_or_else(|| {
                    OrchestratorError::validation(
                        "phase_not_configured",
                        format!("campaign {id} has no generation parameters"),
                    )
                })?;
                let pattern = fingerprint(&params);
                Ok(txn.raise_offset(&pattern, offset, normalize(&params), now))
            })
            .await
    }
}
