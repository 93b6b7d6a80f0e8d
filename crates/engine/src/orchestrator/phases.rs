// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DNS and HTTP phase configuration.
//!
//! Configuration moves the phase pointer (recorded as a
//! `campaign:phase_changed` event) and upserts the phase's parameter row.
//! The status machine is not involved: the new phase begins a fresh
//! `not_started` lifecycle.

use super::Orchestrator;
use crate::ctx::OpContext;
use crate::error::OrchestratorError;
use crate::requests::{ConfigureDnsRequest, ConfigureHttpRequest};
use serde_json::json;
use svy_core::{
    AuditEntry, BusMessage, Campaign, Clock, EventKind, KeywordSetId, PersonaId, PersonaKind,
    Phase, PhaseStatus, StateEvent,
};
use svy_store::{OpClass, StoreError, Txn};

/// Personas must exist, match the phase's kind, and be enabled.
pub(crate) fn validate_personas(
    txn: &Txn<'_>,
    ids: &[PersonaId],
    kind: PersonaKind,
) -> Result<(), OrchestratorError> {
    if ids.is_empty() {
        return Err(OrchestratorError::validation(
            "no_personas",
            format!("at least one {kind} persona is required"),
        ));
    }
    for id in ids {
        let persona = txn.persona(id).map_err(|_| {
            OrchestratorError::validation("persona_not_found", format!("persona {id} does not exist"))
        })?;
        if persona.kind != kind {
            return Err(OrchestratorError::validation(
                "persona_type_mismatch",
                format!("persona {id} is {}, expected {kind}", persona.kind),
            ));
        }
        if !persona.enabled {
            return Err(OrchestratorError::validation(
                "persona_disabled",
                format!("persona {id} is disabled"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_keyword_sets(
    txn: &Txn<'_>,
    ids: &[KeywordSetId],
) -> Result<(), OrchestratorError> {
    if ids.is_empty() {
        return Err(OrchestratorError::validation(
            "no_keyword_sets",
            "at least one keyword set is required",
        ));
    }
    for id in ids {
        let set = txn.keyword_set(id).map_err(|_| {
            OrchestratorError::validation(
                "keyword_set_not_found",
                format!("keyword set {id} does not exist"),
            )
        })?;
        if !set.enabled {
            return Err(OrchestratorError::validation(
                "keyword_set_disabled",
                format!("keyword set {id} is disabled"),
            ));
        }
    }
    Ok(())
}

impl<C: Clock> Orchestrator<C> {
    /// Point the campaign at the DNS validation phase.
    ///
    /// Allowed once generation has completed, or from any later phase
    /// (re-configuration). `total_items` is the number of domains the
    /// phase will resolve and must be positive.
    pub async fn configure_dns_phase(
        &self,
        ctx: &OpContext,
        req: ConfigureDnsRequest,
    ) -> Result<Campaign, OrchestratorError> {
        let id = req.campaign_id.clone();
        let _guard = self.guard(ctx, &id).await?;
        if req.total_items == 0 {
            return Err(OrchestratorError::validation("no_items", "total_items must be positive"));
        }

        let now = self.now();
        let (campaign, sequence) = self
            .txn
            .run("configure_dns_phase", OpClass::StatusUpdate, id.as_str(), |txn| {
                let mut campaign = txn.campaign(&id)?;
                let eligible = match campaign.current_phase {
                    Some(Phase::Generation) => campaign.phase_status == PhaseStatus::Completed,
                    Some(Phase::DnsValidation)
                    | Some(Phase::HttpKeywordValidation)
                    | Some(Phase::Analysis) => true,
                    None => false,
                };
                if !eligible {
                    return Err(OrchestratorError::validation(
                        "phase_precondition",
                        format!(
                            "cannot configure dns validation while generation is {}",
                            campaign.phase_status
                        ),
                    ));
                }
                validate_personas(txn, &req.spec.persona_ids, PersonaKind::Dns)?;

                let from = campaign.current_phase;
                campaign.advance_to(Some(Phase::DnsValidation), now);
                campaign.total_items = req.total_items;
                txn.put_campaign(campaign.clone());

                // Upsert: a lost race on first insert falls back to
                // overwriting the row we just collided with.
                let params = req.spec.clone().into_params(id.clone());
                match txn.insert_dns_params(params.clone()) {
                    Ok(()) => {}
                    Err(StoreError::Conflict(_)) => txn.put_dns_params(params),
                    Err(e) => return Err(e.into()),
                }

                let event = txn.append_event(StateEvent::new(
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
                txn.append_audit(AuditEntry::new(
                    ctx.actor.clone(),
                    "campaign_phase_configured",
                    "campaign",
                    id.as_str(),
                    json!({"phase": "dns_validation", "total_items": req.total_items}),
                    now,
                ));
                Ok((campaign, event.sequence))
            })
            .await?;

        self.notify(
            sequence,
            BusMessage::PhaseChanged { campaign_id: id, phase: Some(Phase::DnsValidation) },
        )
        .await;
        Ok(campaign)
    }

    /// Point the campaign at the HTTP/keyword validation phase.
    ///
    /// Requires a completed DNS phase with at least one passing result;
    /// `total_items` becomes the passing-DNS count.
    pub async fn configure_http_phase(
        &self,
        ctx: &OpContext,
        req: ConfigureHttpRequest,
    ) -> Result<Campaign, OrchestratorError> {
        let id = req.campaign_id.clone();
        let _guard = self.guard(ctx, &id).await?;

        let now = self.now();
        let (campaign, sequence) = self
            .txn
            .run("configure_http_phase", OpClass::StatusUpdate, id.as_str(), |txn| {
                let mut campaign = txn.campaign(&id)?;
                let dns_valid = campaign
                    .metadata
                    .get("dns_valid_count")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0);
                let eligible = match campaign.current_phase {
                    Some(Phase::DnsValidation) => {
                        campaign.phase_status == PhaseStatus::Completed
                    }
                    Some(Phase::HttpKeywordValidation) | Some(Phase::Analysis) => true,
                    _ => false,
                };
                if !eligible {
                    return Err(OrchestratorError::validation(
                        "phase_precondition",
                        "dns validation has not completed",
                    ));
                }
                if dns_valid == 0 {
                    return Err(OrchestratorError::validation(
                        "no_passing_results",
                        "dns validation produced no passing results",
                    ));
                }
                validate_personas(txn, &req.spec.persona_ids, PersonaKind::Http)?;
                validate_keyword_sets(txn, &req.spec.keyword_set_ids)?;

                let from = campaign.current_phase;
                campaign.advance_to(Some(Phase::HttpKeywordValidation), now);
                campaign.total_items = dns_valid;
                txn.put_campaign(campaign.clone());

                let params = req.spec.clone().into_params(id.clone());
                match txn.insert_http_params(params.clone()) {
                    Ok(()) => {}
                    Err(StoreError::Conflict(_)) => txn.put_http_params(params),
                    Err(e) => return Err(e.into()),
                }

                let event = txn.append_event(StateEvent::new(
                    id.clone(),
                    EventKind::PhaseChanged {
                        from_phase: from,
                        to_phase: Some(Phase::HttpKeywordValidation),
                    },
                    ctx.source,
                    ctx.actor.clone(),
                    ctx.correlation_id.clone(),
                    now,
                ))?;
                txn.append_audit(AuditEntry::new(
                    ctx.actor.clone(),
                    "campaign_phase_configured",
                    "campaign",
                    id.as_str(),
                    json!({"phase": "http_keyword_validation", "total_items": dns_valid}),
                    now,
                ));
                Ok((campaign, event.sequence))
            })
            .await?;

        self.notify(
            sequence,
            BusMessage::PhaseChanged {
                campaign_id: id,
                phase: Some(Phase::HttpKeywordValidation),
            },
        )
        .await;
        Ok(campaign)
    }
}
