// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The logical tables of the orchestrator schema.
//!
//! One struct-of-maps mirrors the persisted layout: campaigns, one parameter
//! table per phase, the job queue, the per-entity event log, snapshots,
//! advisory lock rows, per-pattern config states, persona/keyword lookups,
//! and the audit log. [`crate::MemStore`] clones this wholesale for its
//! copy-on-commit transactions, so every field must stay cheaply clonable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use svy_core::{
    AuditEntry, Campaign, CampaignId, CampaignJob, DnsParams, GenerationParams, HttpParams,
    JobId, KeywordSet, KeywordSetId, Persona, PersonaId, StateEvent,
};

/// One row of `state_coordination_locks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRow {
    pub key: String,
    pub holder: String,
    pub acquired_at_ms: u64,
    pub expires_at_ms: u64,
}

impl LockRow {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms < now_ms
    }
}

/// One row of `domain_generation_config_states`: the shared high-water
/// mark for a pattern fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigState {
    pub fingerprint: String,
    pub last_offset: u64,
    /// Normalized generation params the fingerprint was computed from.
    pub params: serde_json::Value,
    pub updated_at_ms: u64,
}

/// One row of `state_snapshots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entity_id: CampaignId,
    /// Event sequence this snapshot covers.
    pub version: u64,
    pub state: serde_json::Value,
    pub created_at_ms: u64,
}

/// Materialized contents of every table.
#[derive(Debug, Default, Clone)]
pub struct Tables {
    pub campaigns: HashMap<CampaignId, Campaign>,
    pub generation_params: HashMap<CampaignId, GenerationParams>,
    pub dns_params: HashMap<CampaignId, DnsParams>,
    pub http_params: HashMap<CampaignId, HttpParams>,
    pub jobs: HashMap<JobId, CampaignJob>,
    /// Per-entity event log, ordered by sequence. Gap-free by construction:
    /// sequences are assigned on append as `len + 1`.
    pub events: HashMap<CampaignId, Vec<StateEvent>>,
    pub snapshots: HashMap<CampaignId, Vec<Snapshot>>,
    pub locks: HashMap<String, LockRow>,
    pub config_states: HashMap<String, ConfigState>,
    pub personas: HashMap<PersonaId, Persona>,
    pub keyword_sets: HashMap<KeywordSetId, KeywordSet>,
    pub audit_log: Vec<AuditEntry>,
}
