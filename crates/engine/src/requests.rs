// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed request structs for the public command surface.

use serde::{Deserialize, Serialize};
use svy_core::{
    params, CampaignId, DnsParams, GenerationParams, HttpParams, KeywordSetId, PatternKind,
    PersonaId, Phase,
};

/// Generation-phase parameters as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub pattern_kind: PatternKind,
    pub constant_string: String,
    pub variable_length: u32,
    pub charset: String,
    pub tld: String,
    pub target_count: u64,
}

impl GenerationSpec {
    pub fn new(pattern_kind: PatternKind, constant_string: impl Into<String>) -> Self {
        Self {
            pattern_kind,
            constant_string: constant_string.into(),
            variable_length: 3,
            charset: "abcdefghijklmnopqrstuvwxyz0123456789".into(),
            tld: "com".into(),
            target_count: 1_000,
        }
    }

    svy_core::request_setters! {
        variable_length: u32,
        charset: String,
        tld: String,
        target_count: u64,
    }

    pub(crate) fn into_params(self, campaign_id: CampaignId) -> GenerationParams {
        GenerationParams {
            campaign_id,
            pattern_kind: self.pattern_kind,
            constant_string: self.constant_string,
            variable_length: self.variable_length,
            charset: self.charset,
            tld: self.tld,
            target_count: self.target_count,
        }
    }
}

/// DNS-phase parameters as supplied by the caller. `source_campaign_id`
/// defaults to the campaign being configured (in-place validation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsSpec {
    pub persona_ids: Vec<PersonaId>,
    pub batch_size: u32,
    pub retries: u32,
    pub rotation_interval: u32,
    pub source_campaign_id: Option<CampaignId>,
}

impl DnsSpec {
    pub fn new(persona_ids: Vec<PersonaId>) -> Self {
        Self {
            persona_ids,
            batch_size: params::DEFAULT_BATCH_SIZE,
            retries: params::DEFAULT_RETRIES,
            rotation_interval: params::DEFAULT_ROTATION_INTERVAL,
            source_campaign_id: None,
        }
    }

    svy_core::request_setters! {
        batch_size: u32,
        retries: u32,
        rotation_interval: u32;
        opt {
            source_campaign_id: CampaignId,
        }
    }

    pub(crate) fn into_params(self, campaign_id: CampaignId) -> DnsParams {
        let source = self.source_campaign_id.unwrap_or_else(|| campaign_id.clone());
        DnsParams {
            campaign_id,
            source_generation_campaign_id: source,
            persona_ids: self.persona_ids,
            batch_size: self.batch_size,
            retries: self.retries,
            rotation_interval: self.rotation_interval,
        }
    }
}

/// HTTP-phase parameters as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSpec {
    pub persona_ids: Vec<PersonaId>,
    pub keyword_set_ids: Vec<KeywordSetId>,
    pub batch_size: u32,
    pub retries: u32,
    pub source_campaign_id: Option<CampaignId>,
}

impl HttpSpec {
    pub fn new(persona_ids: Vec<PersonaId>, keyword_set_ids: Vec<KeywordSetId>) -> Self {
        Self {
            persona_ids,
            keyword_set_ids,
            batch_size: params::DEFAULT_BATCH_SIZE,
            retries: params::DEFAULT_RETRIES,
            source_campaign_id: None,
        }
    }

    svy_core::request_setters! {
        batch_size: u32,
        retries: u32;
        opt {
            source_campaign_id: CampaignId,
        }
    }

    pub(crate) fn into_params(self, campaign_id: CampaignId) -> HttpParams {
        let source = self.source_campaign_id.unwrap_or_else(|| campaign_id.clone());
        HttpParams {
            campaign_id,
            source_campaign_id: source,
            persona_ids: self.persona_ids,
            keyword_set_ids: self.keyword_set_ids,
            batch_size: self.batch_size,
            retries: self.retries,
        }
    }
}

/// Create a campaign. Generation params are mandatory; DNS/HTTP specs may
/// be pre-attached so a full-sequence campaign can chain without further
/// configuration calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub owner: String,
    pub full_sequence_mode: bool,
    pub metadata: serde_json::Value,
    pub generation: GenerationSpec,
    pub dns: Option<DnsSpec>,
    pub http: Option<HttpSpec>,
}

impl CreateCampaignRequest {
    pub fn new(name: impl Into<String>, generation: GenerationSpec) -> Self {
        Self {
            name: name.into(),
            owner: String::new(),
            full_sequence_mode: false,
            metadata: serde_json::Value::Null,
            generation,
            dns: None,
            http: None,
        }
    }

    svy_core::request_setters! {
        owner: String,
        metadata: serde_json::Value;
        opt {
            dns: DnsSpec,
            http: HttpSpec,
        }
    }

    pub fn full_sequence(mut self) -> Self {
        self.full_sequence_mode = true;
        self
    }
}

/// Switch a campaign into the DNS validation phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureDnsRequest {
    pub campaign_id: CampaignId,
    pub spec: DnsSpec,
    /// Domains this phase will resolve.
    pub total_items: u64,
}

impl ConfigureDnsRequest {
    pub fn new(campaign_id: CampaignId, spec: DnsSpec, total_items: u64) -> Self {
        Self { campaign_id, spec, total_items }
    }
}

/// Switch a campaign into the HTTP/keyword validation phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureHttpRequest {
    pub campaign_id: CampaignId,
    pub spec: HttpSpec,
}

impl ConfigureHttpRequest {
    pub fn new(campaign_id: CampaignId, spec: HttpSpec) -> Self {
        Self { campaign_id, spec }
    }
}

/// Scalar field updates. Phase and status are deliberately absent: phase
/// movement goes through the configure and completion flows only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub total_items: Option<u64>,
    pub full_sequence_mode: Option<bool>,
    pub metadata: Option<serde_json::Value>,
}

impl UpdateCampaignRequest {
    pub fn new() -> Self {
        Self::default()
    }

    svy_core::request_setters! {
        opt {
            name: String,
            total_items: u64,
            full_sequence_mode: bool,
            metadata: serde_json::Value,
        }
    }
}

/// Worker callback after a phase finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionReport {
    pub campaign_id: CampaignId,
    /// Phase the worker believes it finished. A mismatch with the
    /// campaign's current phase marks a stale (repeated) callback.
    pub phase: Phase,
    pub processed: u64,
    /// Items that passed validation (DNS records found, keywords matched).
    pub passing: Option<u64>,
}

impl CompletionReport {
    pub fn new(campaign_id: CampaignId, phase: Phase, processed: u64) -> Self {
        Self { campaign_id, phase, processed, passing: None }
    }

    svy_core::request_setters! {
        opt {
            passing: u64,
        }
    }
}
