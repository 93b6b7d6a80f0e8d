// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-store table access.
//!
//! Sequences are per-entity, strictly increasing and gap-free: the next
//! sequence is `last + 1`, assigned here, inside the writing transaction.
//! Events are never updated or deleted.

use super::Txn;
use crate::tables::Snapshot;
use crate::StoreError;
use svy_core::{CampaignId, StateEvent};

impl Txn<'_> {
    /// Append an event, assigning its sequence number. Returns the stored
    /// copy.
    pub fn append_event(&mut self, mut event: StateEvent) -> Result<StateEvent, StoreError> {
        let log = self.tables.events.entry(event.entity_id.clone()).or_default();
        let next = log.last().map(|e| e.sequence).unwrap_or(0) + 1;
        event.sequence = next;
        log.push(event.clone());
        self.appended.push(event.clone());
        Ok(event)
    }

    /// Highest assigned sequence for an entity; zero if none.
    pub fn last_sequence(&self, id: &CampaignId) -> u64 {
        self.tables
            .events
            .get(id)
            .and_then(|log| log.last())
            .map(|e| e.sequence)
            .unwrap_or(0)
    }

    /// Full event log for an entity, ordered by sequence.
    pub fn events_for(&self, id: &CampaignId) -> Vec<StateEvent> {
        self.tables.events.get(id).cloned().unwrap_or_default()
    }

    /// Events with `sequence > from_seq`, ordered, at most `limit`.
    pub fn read_events_since(
        &self,
        id: &CampaignId,
        from_seq: u64,
        limit: usize,
    ) -> Vec<StateEvent> {
        self.tables
            .events
            .get(id)
            .map(|log| {
                log.iter()
                    .filter(|e| e.sequence > from_seq)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Record a snapshot at `version`. Rejects duplicate versions.
    pub fn save_snapshot(
        &mut self,
        id: &CampaignId,
        version: u64,
        state: serde_json::Value,
        now_ms: u64,
    ) -> Result<(), StoreError> {
        let snapshots = self.tables.snapshots.entry(id.clone()).or_default();
        if snapshots.iter().any(|s| s.version == version) {
            return Err(StoreError::Conflict(format!("snapshot {id}@{version} exists")));
        }
        snapshots.push(Snapshot {
            entity_id: id.clone(),
            version,
            state,
            created_at_ms: now_ms,
        });
        snapshots.sort_by_key(|s| s.version);
        Ok(())
    }

    pub fn latest_snapshot(&self, id: &CampaignId) -> Option<Snapshot> {
        self.tables.snapshots.get(id).and_then(|s| s.last()).cloned()
    }

    pub fn latest_snapshot_version(&self, id: &CampaignId) -> u64 {
        self.latest_snapshot(id).map(|s| s.version).unwrap_or(0)
    }
}
