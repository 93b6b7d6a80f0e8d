// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign creation.

use super::Orchestrator;
use crate::ctx::OpContext;
use crate::error::OrchestratorError;
use crate::orchestrator::phases::{validate_keyword_sets, validate_personas};
use crate::requests::CreateCampaignRequest;
use serde_json::json;
use svy_core::{
    AuditEntry, BusMessage, Campaign, CampaignConfig, CampaignId, Clock, EventKind, PersonaKind,
    StateEvent,
};
use svy_store::OpClass;

impl<C: Clock> Orchestrator<C> {
    /// Insert a campaign in the generation phase with its generation
    /// parameters. DNS/HTTP specs may be pre-attached for full-sequence
    /// chaining; their personas are validated up front.
    pub async fn create_campaign(
        &self,
        ctx: &OpContext,
        req: CreateCampaignRequest,
    ) -> Result<Campaign, OrchestratorError> {
        ctx.check()?;
        if req.name.trim().is_empty() {
            return Err(OrchestratorError::validation("invalid_name", "campaign name is empty"));
        }

        let id = CampaignId::random();
        let now = self.now();
        let campaign = self
            .txn
            .run::<_, OrchestratorError, _>("create_campaign", OpClass::StartResume, id.as_str(), |txn| {
                let mut config = CampaignConfig::new(id.clone(), req.name.clone())
                    .owner(req.owner.clone())
                    .total_items(req.generation.target_count)
                    .metadata(req.metadata.clone());
                if req.full_sequence_mode {
                    config = config.full_sequence();
                }
                let campaign = Campaign::new(config, now);
                txn.insert_campaign(campaign.clone())?;
                txn.insert_generation_params(req.generation.clone().into_params(id.clone()))?;

                if let Some(dns) = req.dns.clone() {
                    validate_personas(txn, &dns.persona_ids, PersonaKind::Dns)?;
                    txn.put_dns_params(dns.into_params(id.clone()));
                }
                if let Some(http) = req.http.clone() {
                    validate_personas(txn, &http.persona_ids, PersonaKind::Http)?;
                    validate_keyword_sets(txn, &http.keyword_set_ids)?;
                    txn.put_http_params(http.into_params(id.clone()));
                }

                let mut event = StateEvent::new(
                    id.clone(),
                    EventKind::Created { name: req.name.clone(), owner: req.owner.clone() },
                    ctx.source,
                    ctx.actor.clone(),
                    ctx.correlation_id.clone(),
                    now,
                );
                if let Some(causation) = &ctx.causation_id {
                    event = event.causation(causation.clone());
                }
                txn.append_event(event)?;

                txn.append_audit(AuditEntry::new(
                    ctx.actor.clone(),
                    "campaign_created",
                    "campaign",
                    id.as_str(),
                    json!({
                        "name": req.name,
                        "full_sequence_mode": req.full_sequence_mode,
                        "correlation_id": ctx.correlation_id,
                    }),
                    now,
                ));
                Ok(campaign)
            })
            .await?;

        tracing::info!(campaign = %id, name = %campaign.name, "campaign created");
        self.notify(1, BusMessage::Created { campaign_id: id, name: campaign.name.clone() })
            .await;
        Ok(campaign)
    }
}
