// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-pattern config-state access.
//!
//! `last_offset` is a high-water mark shared by every campaign with the
//! same fingerprint. It only moves forward, except for the single reset
//! performed when the last holder of a pattern is deleted.

use super::Txn;
use crate::tables::ConfigState;

impl Txn<'_> {
    pub fn config_state(&self, fingerprint: &str) -> Option<ConfigState> {
        self.tables.config_states.get(fingerprint).cloned()
    }

    /// Raise the high-water mark to `offset` if it is higher than the
    /// stored value. Returns the resulting offset.
    pub fn raise_offset(
        &mut self,
        fingerprint: &str,
        offset: u64,
        params: serde_json::Value,
        now_ms: u64,
    ) -> u64 {
        match self.tables.config_states.get_mut(fingerprint) {
            Some(row) => {
                if offset > row.last_offset {
                    row.last_offset = offset;
                    row.updated_at_ms = now_ms;
                }
                row.last_offset
            }
            None => {
                self.tables.config_states.insert(
                    fingerprint.to_string(),
                    ConfigState {
                        fingerprint: fingerprint.to_string(),
                        last_offset: offset,
                        params,
                        updated_at_ms: now_ms,
                    },
                );
                offset
            }
        }
    }

    /// The single allowed downward transition: the last holder of the
    /// pattern was deleted.
    pub fn reset_offset(&mut self, fingerprint: &str, params: serde_json::Value, now_ms: u64) {
        self.tables.config_states.insert(
            fingerprint.to_string(),
            ConfigState {
                fingerprint: fingerprint.to_string(),
                last_offset: 0,
                params,
                updated_at_ms: now_ms,
            },
        );
    }
}
