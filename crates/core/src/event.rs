// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State events and pub/sub messages.
//!
//! [`StateEvent`] is the append-only record the event store persists: an
//! envelope (entity, sequence, source, actor, correlation) around a tagged
//! [`EventKind`]. Events are created inside the same transaction as the
//! state change they record and are never updated or deleted; they outlive
//! the campaign row itself.
//!
//! [`BusMessage`] is the fire-and-forget notification shape published to the
//! async bus and the per-campaign websocket channel.

use crate::campaign::{Phase, PhaseStatus};
use crate::id::{CampaignId, EventId};
use serde::{Deserialize, Serialize};

/// Who initiated the change an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Orchestrator,
    StateCoordinator,
    Worker,
    User,
    System,
}

crate::status_strings! {
    EventSource {
        Orchestrator => "orchestrator",
        StateCoordinator => "state_coordinator",
        Worker => "worker",
        User => "user",
        System => "system",
    }
}

/// What happened. Serializes with `{"type": "campaign:...", ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    /// Campaign row inserted. Carries enough to re-project a minimal
    /// aggregate from the log alone.
    #[serde(rename = "campaign:created")]
    Created { name: String, owner: String },

    /// Phase status moved through the transition table.
    #[serde(rename = "campaign:state_changed")]
    StateChanged,

    /// Detail record appended alongside every state change.
    #[serde(rename = "campaign:transition_recorded")]
    TransitionRecorded { processing_ms: u64 },

    /// A registered validator rejected the post-transition state.
    #[serde(rename = "campaign:validation_failed")]
    ValidationFailed { validator: String, detail: String },

    /// A registered event handler failed; the transition stands.
    #[serde(rename = "campaign:handler_error")]
    HandlerError { handler: String, detail: String },

    /// The phase pointer moved. `to_phase = None` marks full completion.
    #[serde(rename = "campaign:phase_changed")]
    PhaseChanged {
        from_phase: Option<Phase>,
        to_phase: Option<Phase>,
    },

    /// Campaign row deleted. Final event for the entity; the log survives.
    #[serde(rename = "campaign:deleted")]
    Deleted,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Created { .. } => "campaign:created",
            EventKind::StateChanged => "campaign:state_changed",
            EventKind::TransitionRecorded { .. } => "campaign:transition_recorded",
            EventKind::ValidationFailed { .. } => "campaign:validation_failed",
            EventKind::HandlerError { .. } => "campaign:handler_error",
            EventKind::PhaseChanged { .. } => "campaign:phase_changed",
            EventKind::Deleted => "campaign:deleted",
        }
    }
}

/// One immutable row of the per-entity event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    pub id: EventId,
    pub entity_id: CampaignId,
    /// Per-entity, strictly increasing, gap-free. Assigned by the event
    /// store inside the writing transaction; zero until then.
    #[serde(default)]
    pub sequence: u64,
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<String>,
    pub source: EventSource,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
    pub at_ms: u64,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub context: serde_json::Value,
}

impl StateEvent {
    /// Build an unsequenced event; the store assigns `sequence` on append.
    pub fn new(
        entity_id: CampaignId,
        kind: EventKind,
        source: EventSource,
        actor: impl Into<String>,
        correlation_id: impl Into<String>,
        at_ms: u64,
    ) -> Self {
        Self {
            id: EventId::random(),
            entity_id,
            sequence: 0,
            kind,
            previous_state: None,
            new_state: None,
            source,
            actor: actor.into(),
            reason: None,
            correlation_id: correlation_id.into(),
            causation_id: None,
            at_ms,
            context: serde_json::Value::Null,
        }
    }

    pub fn states(mut self, previous: PhaseStatus, new: PhaseStatus) -> Self {
        self.previous_state = Some(previous.to_string());
        self.new_state = Some(new.to_string());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn causation(mut self, causation_id: impl Into<String>) -> Self {
        self.causation_id = Some(causation_id.into());
        self
    }

    pub fn context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// One-line rendering for logs.
    pub fn log_summary(&self) -> String {
        let states = match (&self.previous_state, &self.new_state) {
            (Some(p), Some(n)) => format!(" {p}->{n}"),
            _ => String::new(),
        };
        format!(
            "{} entity={} seq={}{} actor={}",
            self.kind_name(),
            self.entity_id,
            self.sequence,
            states,
            self.actor,
        )
    }
}

/// Fire-and-forget notification published to the bus and broadcast on the
/// campaign's websocket channel. Publish failures are logged, never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BusMessage {
    #[serde(rename = "campaign:created")]
    Created { campaign_id: CampaignId, name: String },

    #[serde(rename = "campaign:state_changed")]
    StateChanged {
        campaign_id: CampaignId,
        status: PhaseStatus,
    },

    #[serde(rename = "campaign:phase_changed")]
    PhaseChanged {
        campaign_id: CampaignId,
        phase: Option<Phase>,
    },

    #[serde(rename = "campaign:progress")]
    Progress {
        campaign_id: CampaignId,
        processed: u64,
        total: u64,
        percent: f64,
    },

    #[serde(rename = "campaign:deleted")]
    Deleted { campaign_id: CampaignId },
}

impl BusMessage {
    pub fn name(&self) -> &'static str {
        match self {
            BusMessage::Created { .. } => "campaign:created",
            BusMessage::StateChanged { .. } => "campaign:state_changed",
            BusMessage::PhaseChanged { .. } => "campaign:phase_changed",
            BusMessage::Progress { .. } => "campaign:progress",
            BusMessage::Deleted { .. } => "campaign:deleted",
        }
    }

    /// The campaign the message concerns; broadcast channel key.
    pub fn campaign_id(&self) -> &CampaignId {
        match self {
            BusMessage::Created { campaign_id, .. }
            | BusMessage::StateChanged { campaign_id, .. }
            | BusMessage::PhaseChanged { campaign_id, .. }
            | BusMessage::Progress { campaign_id, .. }
            | BusMessage::Deleted { campaign_id } => campaign_id,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
