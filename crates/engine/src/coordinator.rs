// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State coordinator: every status change flows through here.
//!
//! Inside the caller's transaction, [`StateCoordinator::transition_in`]
//! validates the transition, appends the state-change event and its detail
//! record, updates the campaign row, runs registered validators and event
//! handlers, and writes the audit entry. Validator and handler failures are
//! recorded as auxiliary events and do not abort the transition, unless the
//! validator was registered as blocking.
//!
//! An invalid transition aborts before anything is written, so a rejected
//! command leaves no trace in the event log.

use crate::ctx::OpContext;
use crate::error::OrchestratorError;
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use svy_core::{
    validate_transition, AuditEntry, Campaign, CampaignId, EventKind, EventSource, PhaseStatus,
    StateEvent,
};
use svy_store::Txn;

/// Post-transition check. Returning `Err` records a
/// `campaign:validation_failed` event (or aborts, when blocking).
pub type ValidatorFn = Arc<dyn Fn(&Campaign, &StateEvent) -> Result<(), String> + Send + Sync>;

/// Reaction to a committed-to-be event. Must be fast and non-blocking; it
/// runs inside the transaction.
pub type HandlerFn = Arc<dyn Fn(&Campaign, &StateEvent) -> Result<(), String> + Send + Sync>;

struct RegisteredValidator {
    name: String,
    blocking: bool,
    check: ValidatorFn,
}

struct RegisteredHandler {
    kind: &'static str,
    name: String,
    run: HandlerFn,
}

#[derive(Default)]
pub struct StateCoordinator {
    validators: RwLock<Vec<RegisteredValidator>>,
    handlers: RwLock<Vec<RegisteredHandler>>,
}

impl StateCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_validator(
        &self,
        name: impl Into<String>,
        blocking: bool,
        check: ValidatorFn,
    ) {
        self.validators.write().push(RegisteredValidator { name: name.into(), blocking, check });
    }

    /// Register a handler for one event kind (by its `campaign:*` name).
    pub fn register_handler(
        &self,
        kind: &'static str,
        name: impl Into<String>,
        run: HandlerFn,
    ) {
        self.handlers.write().push(RegisteredHandler { kind, name: name.into(), run });
    }

    /// Perform a status transition inside the caller's transaction. The
    /// caller holds the campaign's locks.
    pub fn transition_in(
        &self,
        txn: &mut Txn<'_>,
        id: &CampaignId,
        to: PhaseStatus,
        ctx: &OpContext,
        reason: Option<&str>,
        context: serde_json::Value,
        now_ms: u64,
    ) -> Result<StateEvent, OrchestratorError> {
        let started = Instant::now();
        let mut campaign = txn.campaign(id)?;
        let from = campaign.phase_status;

        validate_transition(from, to).map_err(|e| {
            tracing::debug!(campaign = %id, from = %from, to = %to, "transition rejected");
            OrchestratorError::from(e)
        })?;

        // State-change event, sequenced inside this transaction.
        let mut event = StateEvent::new(
            id.clone(),
            EventKind::StateChanged,
            ctx.source,
            ctx.actor.clone(),
            ctx.correlation_id.clone(),
            now_ms,
        )
        .states(from, to)
        .context(context);
        if let Some(r) = reason {
            event = event.reason(r);
        }
        if let Some(causation) = &ctx.causation_id {
            event = event.causation(causation.clone());
        }
        let event = txn.append_event(event)?;

        // Detail record for the same transition.
        txn.append_event(
            StateEvent::new(
                id.clone(),
                EventKind::TransitionRecorded {
                    processing_ms: started.elapsed().as_millis() as u64,
                },
                EventSource::StateCoordinator,
                ctx.actor.clone(),
                ctx.correlation_id.clone(),
                now_ms,
            )
            .states(from, to)
            .causation(event.id.as_str()),
        )?;

        // Campaign row update.
        campaign.phase_status = to;
        campaign.updated_at_ms = now_ms;
        if to == PhaseStatus::InProgress && campaign.started_at_ms.is_none() {
            campaign.started_at_ms = Some(now_ms);
        }
        if to == PhaseStatus::Failed {
            campaign.error_message = reason.map(str::to_string);
        }
        if to.is_terminal() && campaign.completed_at_ms.is_none() {
            campaign.completed_at_ms = Some(now_ms);
        }
        txn.put_campaign(campaign.clone());

        self.run_validators(txn, &campaign, &event, ctx, now_ms)?;
        self.run_handlers(txn, &campaign, &event, ctx, now_ms)?;

        txn.append_audit(AuditEntry::new(
            ctx.actor.clone(),
            "campaign_state_changed",
            "campaign",
            id.as_str(),
            json!({
                "from": from.to_string(),
                "to": to.to_string(),
                "reason": reason,
                "correlation_id": ctx.correlation_id,
            }),
            now_ms,
        ));

        tracing::info!(campaign = %id, "{}", event.log_summary());
        Ok(event)
    }

    fn run_validators(
        &self,
        txn: &mut Txn<'_>,
        campaign: &Campaign,
        event: &StateEvent,
        ctx: &OpContext,
        now_ms: u64,
    ) -> Result<(), OrchestratorError> {
        let validators = self.validators.read();
        for validator in validators.iter() {
            let Err(detail) = (validator.check)(campaign, event) else { continue };
            if validator.blocking {
                return Err(OrchestratorError::validation(
                    "validator_rejected",
                    format!("{}: {detail}", validator.name),
                ));
            }
            tracing::warn!(
                campaign = %campaign.id,
                validator = %validator.name,
                detail = %detail,
                "validator failed (non-blocking)"
            );
            txn.append_event(
                StateEvent::new(
                    campaign.id.clone(),
                    EventKind::ValidationFailed {
                        validator: validator.name.clone(),
                        detail,
                    },
                    EventSource::StateCoordinator,
                    ctx.actor.clone(),
                    ctx.correlation_id.clone(),
                    now_ms,
                )
                .causation(event.id.as_str()),
            )?;
        }
        Ok(())
    }

    fn run_handlers(
        &self,
        txn: &mut Txn<'_>,
        campaign: &Campaign,
        event: &StateEvent,
        ctx: &OpContext,
        now_ms: u64,
    ) -> Result<(), OrchestratorError> {
        let handlers = self.handlers.read();
        for handler in handlers.iter().filter(|h| h.kind == event.kind_name()) {
            let Err(detail) = (handler.run)(campaign, event) else { continue };
            tracing::warn!(
                campaign = %campaign.id,
                handler = %handler.name,
                detail = %detail,
                "event handler failed"
            );
            txn.append_event(
                StateEvent::new(
                    campaign.id.clone(),
                    EventKind::HandlerError { handler: handler.name.clone(), detail },
                    EventSource::StateCoordinator,
                    ctx.actor.clone(),
                    ctx.correlation_id.clone(),
                    now_ms,
                )
                .causation(event.id.as_str()),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
