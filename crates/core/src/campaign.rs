// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign aggregate and its phase/status vocabulary.
//!
//! A campaign walks through up to four processing phases. Within the active
//! phase, `phase_status` follows the transition table in [`crate::machine`].
//! `current_phase` is `None` only after a full-sequence campaign finishes its
//! analysis phase.

use crate::id::CampaignId;
use serde::{Deserialize, Serialize};

/// One of the four processing stages a campaign moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Generation,
    DnsValidation,
    HttpKeywordValidation,
    Analysis,
}

crate::status_strings! {
    Phase {
        Generation => "generation",
        DnsValidation => "dns_validation",
        HttpKeywordValidation => "http_keyword_validation",
        Analysis => "analysis",
    }
}

impl Phase {
    /// The phase that follows this one in the standard pipeline order.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Generation => Some(Phase::DnsValidation),
            Phase::DnsValidation => Some(Phase::HttpKeywordValidation),
            Phase::HttpKeywordValidation => Some(Phase::Analysis),
            Phase::Analysis => None,
        }
    }
}

/// Lifecycle status of the currently active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Paused,
    Completed,
    Failed,
}

crate::status_strings! {
    PhaseStatus {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Paused => "paused",
        Completed => "completed",
        Failed => "failed",
    }
}

impl PhaseStatus {
    /// `completed` and `failed` accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, PhaseStatus::Completed | PhaseStatus::Failed)
    }
}

/// Reason string recorded when a user cancels a campaign.
///
/// Cancellation is not a distinct status; it is a transition to `Failed`
/// carrying this reason.
pub const USER_CANCELLED: &str = "user_cancelled";

/// Configuration for creating a new campaign.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub id: CampaignId,
    pub owner: String,
    pub name: String,
    pub full_sequence_mode: bool,
    pub total_items: u64,
    pub metadata: serde_json::Value,
}

impl CampaignConfig {
    pub fn new(id: CampaignId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner: String::new(),
            name: name.into(),
            full_sequence_mode: false,
            total_items: 0,
            metadata: serde_json::Value::Null,
        }
    }

    crate::request_setters! {
        owner: String,
        total_items: u64,
        metadata: serde_json::Value,
    }

    pub fn full_sequence(mut self) -> Self {
        self.full_sequence_mode = true;
        self
    }
}

/// The central aggregate tracked by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub owner: String,
    pub name: String,
    /// Active phase; `None` only after full-sequence completion.
    pub current_phase: Option<Phase>,
    pub phase_status: PhaseStatus,
    pub total_items: u64,
    pub processed_items: u64,
    /// Cached derivation of processed/total; kept current by
    /// [`Campaign::recompute_progress`].
    pub progress_percent: f64,
    /// When true, phase completion triggers an automatic phase advance.
    pub full_sequence_mode: bool,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl Campaign {
    /// Create a new campaign in the generation phase, not yet started.
    pub fn new(config: CampaignConfig, now_ms: u64) -> Self {
        Self {
            id: config.id,
            owner: config.owner,
            name: config.name,
            current_phase: Some(Phase::Generation),
            phase_status: PhaseStatus::NotStarted,
            total_items: config.total_items,
            processed_items: 0,
            progress_percent: 0.0,
            full_sequence_mode: config.full_sequence_mode,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
            started_at_ms: None,
            completed_at_ms: None,
            error_message: None,
            metadata: config.metadata,
        }
    }

    /// True once the active phase has reached `completed` or `failed`,
    /// or the campaign has run off the end of the pipeline.
    pub fn is_terminal(&self) -> bool {
        self.phase_status.is_terminal()
    }

    /// True when the whole pipeline is done (analysis finished in
    /// full-sequence mode).
    pub fn is_fully_complete(&self) -> bool {
        self.current_phase.is_none() && self.phase_status == PhaseStatus::Completed
    }

    /// Recompute the cached progress percentage from the item counters.
    pub fn recompute_progress(&mut self) {
        self.progress_percent = if self.total_items == 0 {
            0.0
        } else {
            let pct = self.processed_items as f64 * 100.0 / self.total_items as f64;
            pct.clamp(0.0, 100.0)
        };
    }

    /// Reset the per-phase counters when the phase pointer advances.
    pub fn reset_phase_counters(&mut self) {
        self.processed_items = 0;
        self.progress_percent = 0.0;
    }

    /// Move the phase pointer without going through the status machine.
    ///
    /// The status machine governs transitions within a phase; pointing the
    /// campaign at a new phase begins a fresh `not_started` lifecycle.
    pub fn advance_to(&mut self, phase: Option<Phase>, now_ms: u64) {
        self.current_phase = phase;
        self.phase_status = if phase.is_some() {
            PhaseStatus::NotStarted
        } else {
            PhaseStatus::Completed
        };
        if phase.is_some() {
            self.reset_phase_counters();
            self.completed_at_ms = None;
            self.error_message = None;
        } else {
            self.progress_percent = 100.0;
            if self.completed_at_ms.is_none() {
                self.completed_at_ms = Some(now_ms);
            }
        }
        self.updated_at_ms = now_ms;
    }
}

crate::test_builder! {
    pub struct CampaignBuilder => Campaign {
        id: CampaignId = CampaignId::new("cmp-test"),
        owner: String = "owner-1",
        name: String = "test-campaign",
        current_phase: Option<Phase> = Some(Phase::Generation),
        phase_status: PhaseStatus = PhaseStatus::NotStarted,
        total_items: u64 = 0u64,
        processed_items: u64 = 0u64,
        progress_percent: f64 = 0.0f64,
        full_sequence_mode: bool = false,
        created_at_ms: u64 = 1_000_000u64,
        updated_at_ms: u64 = 1_000_000u64,
        metadata: serde_json::Value = serde_json::Value::Null;
        opt {
            started_at_ms: u64,
            completed_at_ms: u64,
            error_message: String,
        }
    }
}

#[cfg(test)]
#[path = "campaign_tests.rs"]
mod tests;
