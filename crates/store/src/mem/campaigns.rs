// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign, phase-parameter, and persona table access.

use super::Txn;
use crate::StoreError;
use svy_core::{
    Campaign, CampaignId, DnsParams, GenerationParams, HttpParams, KeywordSet, KeywordSetId,
    Persona, PersonaId,
};

impl Txn<'_> {
    pub fn insert_campaign(&mut self, campaign: Campaign) -> Result<(), StoreError> {
        if self.tables.campaigns.contains_key(&campaign.id) {
            return Err(StoreError::Conflict(format!("campaign {} exists", campaign.id)));
        }
        self.tables.campaigns.insert(campaign.id.clone(), campaign);
        Ok(())
    }

    pub fn campaign(&self, id: &CampaignId) -> Result<Campaign, StoreError> {
        self.tables
            .campaigns
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("campaign {id}")))
    }

    /// Write back a campaign row read earlier in this transaction.
    pub fn put_campaign(&mut self, campaign: Campaign) {
        self.tables.campaigns.insert(campaign.id.clone(), campaign);
    }

    /// Delete a campaign row. Cascades the phase-parameter rows and queued
    /// jobs; the event log and audit entries are retained.
    pub fn remove_campaign(&mut self, id: &CampaignId) -> Result<Campaign, StoreError> {
        let row = self
            .tables
            .campaigns
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("campaign {id}")))?;
        self.tables.generation_params.remove(id);
        self.tables.dns_params.remove(id);
        self.tables.http_params.remove(id);
        self.tables.jobs.retain(|_, job| &job.campaign_id != id);
        Ok(row)
    }

    /// All campaign rows, ordered by creation time then id for stable
    /// iteration.
    pub fn campaigns(&self) -> Vec<Campaign> {
        let mut rows: Vec<Campaign> = self.tables.campaigns.values().cloned().collect();
        rows.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));
        rows
    }

    // -- phase parameters --

    pub fn insert_generation_params(&mut self, params: GenerationParams) -> Result<(), StoreError> {
        if self.tables.generation_params.contains_key(&params.campaign_id) {
            return Err(StoreError::Conflict(format!(
                "generation params for {} exist",
                params.campaign_id
            )));
        }
        self.tables.generation_params.insert(params.campaign_id.clone(), params);
        Ok(())
    }

    pub fn generation_params(&self, id: &CampaignId) -> Option<GenerationParams> {
        self.tables.generation_params.get(id).cloned()
    }

    pub fn insert_dns_params(&mut self, params: DnsParams) -> Result<(), StoreError> {
        if self.tables.dns_params.contains_key(&params.campaign_id) {
            return Err(StoreError::Conflict(format!(
                "dns params for {} exist",
                params.campaign_id
            )));
        }
        self.tables.dns_params.insert(params.campaign_id.clone(), params);
        Ok(())
    }

    pub fn put_dns_params(&mut self, params: DnsParams) {
        self.tables.dns_params.insert(params.campaign_id.clone(), params);
    }

    pub fn dns_params(&self, id: &CampaignId) -> Option<DnsParams> {
        self.tables.dns_params.get(id).cloned()
    }

    pub fn insert_http_params(&mut self, params: HttpParams) -> Result<(), StoreError> {
        if self.tables.http_params.contains_key(&params.campaign_id) {
            return Err(StoreError::Conflict(format!(
                "http params for {} exist",
                params.campaign_id
            )));
        }
        self.tables.http_params.insert(params.campaign_id.clone(), params);
        Ok(())
    }

    pub fn put_http_params(&mut self, params: HttpParams) {
        self.tables.http_params.insert(params.campaign_id.clone(), params);
    }

    pub fn http_params(&self, id: &CampaignId) -> Option<HttpParams> {
        self.tables.http_params.get(id).cloned()
    }

    // -- row scans for the dependency walker --

    pub fn generation_params_rows(&self) -> Vec<GenerationParams> {
        self.tables.generation_params.values().cloned().collect()
    }

    pub fn dns_params_rows(&self) -> Vec<DnsParams> {
        self.tables.dns_params.values().cloned().collect()
    }

    pub fn http_params_rows(&self) -> Vec<HttpParams> {
        self.tables.http_params.values().cloned().collect()
    }

    // -- lookup records --

    pub fn put_persona(&mut self, persona: Persona) {
        self.tables.personas.insert(persona.id.clone(), persona);
    }

    pub fn persona(&self, id: &PersonaId) -> Result<Persona, StoreError> {
        self.tables
            .personas
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("persona {id}")))
    }

    pub fn put_keyword_set(&mut self, set: KeywordSet) {
        self.tables.keyword_sets.insert(set.id.clone(), set);
    }

    pub fn keyword_set(&self, id: &KeywordSetId) -> Result<KeywordSet, StoreError> {
        self.tables
            .keyword_sets
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("keyword set {id}")))
    }
}
