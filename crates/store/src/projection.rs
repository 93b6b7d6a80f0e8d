// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate state rebuilt from the event log.
//!
//! Snapshots are advisory for performance only: replay from an empty
//! projection must land on the same state, and tests hold that line.

use crate::mem::Txn;
use crate::StoreError;
use serde::{Deserialize, Serialize};
use svy_core::{CampaignId, EventKind, Phase, PhaseStatus, StateEvent};

/// The slice of campaign state the event log is authoritative for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub name: String,
    pub owner: String,
    pub current_phase: Option<Phase>,
    pub phase_status: PhaseStatus,
    pub updated_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    /// Set once a `campaign:deleted` event is seen; the log survives the
    /// row.
    #[serde(default)]
    pub deleted: bool,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            name: String::new(),
            owner: String::new(),
            current_phase: None,
            phase_status: PhaseStatus::NotStarted,
            updated_at_ms: 0,
            completed_at_ms: None,
            deleted: false,
        }
    }
}

impl Projection {
    /// Fold events over an optional snapshot base. Events must arrive in
    /// sequence order.
    pub fn replay<'a>(
        base: Option<Projection>,
        events: impl IntoIterator<Item = &'a StateEvent>,
    ) -> Projection {
        let mut projection = base.unwrap_or_default();
        for event in events {
            projection.apply(event);
        }
        projection
    }

    fn apply(&mut self, event: &StateEvent) {
        match &event.kind {
            EventKind::Created { name, owner } => {
                self.name = name.clone();
                self.owner = owner.clone();
                self.current_phase = Some(Phase::Generation);
                self.phase_status = PhaseStatus::NotStarted;
                self.completed_at_ms = None;
                self.deleted = false;
            }
            EventKind::StateChanged => {
                if let Some(status) =
                    event.new_state.as_deref().and_then(|s| s.parse::<PhaseStatus>().ok())
                {
                    self.phase_status = status;
                    if status.is_terminal() && self.completed_at_ms.is_none() {
                        self.completed_at_ms = Some(event.at_ms);
                    }
                }
            }
            EventKind::PhaseChanged { to_phase, .. } => match to_phase {
                Some(phase) => {
                    self.current_phase = Some(*phase);
                    self.phase_status = PhaseStatus::NotStarted;
                    self.completed_at_ms = None;
                }
                None => {
                    self.current_phase = None;
                    self.phase_status = PhaseStatus::Completed;
                    if self.completed_at_ms.is_none() {
                        self.completed_at_ms = Some(event.at_ms);
                    }
                }
            },
            EventKind::Deleted => {
                self.deleted = true;
            }
            // Detail and auxiliary records carry no state.
            EventKind::TransitionRecorded { .. }
            | EventKind::ValidationFailed { .. }
            | EventKind::HandlerError { .. } => {}
        }
        self.updated_at_ms = event.at_ms;
    }
}

/// Rebuild an entity's projection from its latest snapshot plus the events
/// after it.
pub fn rebuild(txn: &Txn<'_>, id: &CampaignId) -> Result<Projection, StoreError> {
    let (base, from_seq) = match txn.latest_snapshot(id) {
        Some(snapshot) => {
            let projection: Projection = serde_json::from_value(snapshot.state)?;
            (Some(projection), snapshot.version)
        }
        None => (None, 0),
    };
    let events = txn.read_events_since(id, from_seq, usize::MAX);
    Ok(Projection::replay(base, events.iter()))
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
