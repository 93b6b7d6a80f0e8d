// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit-log entries.

use crate::id::AuditId;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One append-only audit record. Written in the same transaction as the
/// command it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditId,
    pub at_ms: u64,
    pub actor: String,
    pub action: String,
    pub entity_kind: String,
    pub entity_id: String,
    pub details: serde_json::Value,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        entity_kind: impl Into<String>,
        entity_id: impl Into<String>,
        details: serde_json::Value,
        at_ms: u64,
    ) -> Self {
        Self {
            id: AuditId::random(),
            at_ms,
            actor: actor.into(),
            action: action.into(),
            entity_kind: entity_kind.into(),
            entity_id: entity_id.into(),
            details,
        }
    }

    /// Wall-clock rendering of `at_ms` for human-facing detail output.
    pub fn timestamp_rfc3339(&self) -> String {
        match Utc.timestamp_millis_opt(self.at_ms as i64).single() {
            Some(ts) => ts.to_rfc3339(),
            None => format!("epoch_ms:{}", self.at_ms),
        }
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
