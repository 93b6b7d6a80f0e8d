// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory lock-row access. Acquisition policy lives in
//! [`crate::lock_manager`]; these are the raw row operations.

use super::Txn;
use crate::tables::LockRow;

impl Txn<'_> {
    /// Insert-if-absent. Returns true when the caller now holds the row.
    pub fn try_insert_lock(&mut self, row: LockRow) -> bool {
        if self.tables.locks.contains_key(&row.key) {
            return false;
        }
        self.tables.locks.insert(row.key.clone(), row);
        true
    }

    /// Drop rows whose TTL has lapsed. Returns how many were swept.
    pub fn sweep_expired_locks(&mut self, now_ms: u64) -> usize {
        let before = self.tables.locks.len();
        self.tables.locks.retain(|_, row| !row.is_expired(now_ms));
        before - self.tables.locks.len()
    }

    /// Delete the row only if the caller holds it.
    pub fn release_lock(&mut self, key: &str, holder: &str) -> bool {
        match self.tables.locks.get(key) {
            Some(row) if row.holder == holder => {
                self.tables.locks.remove(key);
                true
            }
            _ => false,
        }
    }

    pub fn lock_row(&self, key: &str) -> Option<LockRow> {
        self.tables.locks.get(key).cloned()
    }
}
