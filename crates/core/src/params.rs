// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-phase parameter rows.
//!
//! Each campaign owns at most one row per phase parameter table. Rows are
//! created lazily when a phase is configured and are marshalled verbatim
//! into the payload of the job that starts the phase.

use crate::id::{CampaignId, KeywordSetId, PersonaId};
use serde::{Deserialize, Serialize};

/// Where the variable part of a generated domain sits relative to the
/// constant string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Prefix,
    Suffix,
    Both,
}

crate::status_strings! {
    PatternKind {
        Prefix => "prefix",
        Suffix => "suffix",
        Both => "both",
    }
}

/// Parameters for deterministic domain enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub campaign_id: CampaignId,
    pub pattern_kind: PatternKind,
    pub constant_string: String,
    /// Number of generated characters in the variable part.
    pub variable_length: u32,
    /// Alphabet the variable part draws from.
    pub charset: String,
    pub tld: String,
    /// How many domains this campaign wants generated.
    pub target_count: u64,
}

/// Parameters for the DNS validation phase.
///
/// `source_generation_campaign_id` points at the campaign whose generated
/// domains feed this phase. For in-place configuration it is the campaign's
/// own id; for a standalone DNS campaign it names another campaign and forms
/// a dependency edge walked at delete time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsParams {
    pub campaign_id: CampaignId,
    pub source_generation_campaign_id: CampaignId,
    pub persona_ids: Vec<PersonaId>,
    pub batch_size: u32,
    pub retries: u32,
    /// Personas rotate after this many lookups.
    pub rotation_interval: u32,
}

/// Parameters for the HTTP/keyword validation phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpParams {
    pub campaign_id: CampaignId,
    /// Campaign whose passing DNS results feed this phase.
    pub source_campaign_id: CampaignId,
    pub persona_ids: Vec<PersonaId>,
    pub keyword_set_ids: Vec<KeywordSetId>,
    pub batch_size: u32,
    pub retries: u32,
}

/// Tagged union over the three parameter rows, keyed by phase.
///
/// Reads of a tag's payload when the campaign's phase differs are rejected
/// at the dispatch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseParams {
    Generation(GenerationParams),
    DnsValidation(DnsParams),
    HttpKeywordValidation(HttpParams),
}

impl PhaseParams {
    pub fn phase(&self) -> crate::campaign::Phase {
        match self {
            PhaseParams::Generation(_) => crate::campaign::Phase::Generation,
            PhaseParams::DnsValidation(_) => crate::campaign::Phase::DnsValidation,
            PhaseParams::HttpKeywordValidation(_) => {
                crate::campaign::Phase::HttpKeywordValidation
            }
        }
    }

    pub fn campaign_id(&self) -> &CampaignId {
        match self {
            PhaseParams::Generation(p) => &p.campaign_id,
            PhaseParams::DnsValidation(p) => &p.campaign_id,
            PhaseParams::HttpKeywordValidation(p) => &p.campaign_id,
        }
    }
}

pub const DEFAULT_BATCH_SIZE: u32 = 100;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_ROTATION_INTERVAL: u32 = 50;

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
