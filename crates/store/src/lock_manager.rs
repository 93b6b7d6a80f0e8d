// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process advisory locks over the lock-row table.
//!
//! Acquisition is insert-if-absent with a TTL: a row that outlives its
//! `expires_at` is swept by the next acquirer, so a crashed holder cannot
//! wedge the key forever. Contended keys are retried with a bounded spin.
//! When several keys must be held at once they are acquired in
//! lexicographic order to keep acquirers deadlock-free.

use crate::mem::MemStore;
use crate::tables::LockRow;
use crate::StoreError;
use std::time::Duration;
use svy_core::{Clock, LockConfig};

pub struct LockManager<C: Clock> {
    store: MemStore,
    cfg: LockConfig,
    clock: C,
}

impl<C: Clock> LockManager<C> {
    pub fn new(store: MemStore, cfg: LockConfig, clock: C) -> Self {
        Self { store, cfg, clock }
    }

    /// Acquire `key` for `holder`, spinning up to the configured budget.
    pub async fn acquire(&self, key: &str, holder: &str) -> Result<LockGuard, StoreError> {
        let attempts = self.cfg.spin_attempts.max(1);
        for attempt in 0..attempts {
            let now = self.clock.epoch_ms();
            let row = LockRow {
                key: key.to_string(),
                holder: holder.to_string(),
                acquired_at_ms: now,
                expires_at_ms: now + self.cfg.ttl_ms,
            };
            let acquired = self.store.transaction(|txn| -> Result<bool, StoreError> {
                txn.sweep_expired_locks(now);
                Ok(txn.try_insert_lock(row.clone()))
            })?;
            if acquired {
                if attempt > 0 {
                    tracing::debug!(key, attempt, "advisory lock acquired after contention");
                }
                return Ok(LockGuard {
                    store: self.store.clone(),
                    key: key.to_string(),
                    holder: holder.to_string(),
                    released: false,
                });
            }
            tokio::time::sleep(Duration::from_millis(self.cfg.spin_delay_ms)).await;
        }
        Err(StoreError::Busy(format!("advisory lock {key} held elsewhere")))
    }

    /// Acquire several keys, sorted lexicographically.
    pub async fn acquire_many(
        &self,
        keys: &[String],
        holder: &str,
    ) -> Result<Vec<LockGuard>, StoreError> {
        let mut sorted: Vec<&String> = keys.iter().collect();
        sorted.sort_unstable();
        sorted.dedup();
        let mut guards = Vec::with_capacity(sorted.len());
        for key in sorted {
            guards.push(self.acquire(key, holder).await?);
        }
        Ok(guards)
    }
}

/// A held advisory lock. Released on drop; release only deletes the row if
/// this holder still owns it.
pub struct LockGuard {
    store: MemStore,
    key: String,
    holder: String,
    released: bool,
}

impl LockGuard {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let freed = self
            .store
            .transaction(|txn| -> Result<bool, StoreError> {
                Ok(txn.release_lock(&self.key, &self.holder))
            });
        match freed {
            Ok(true) => {}
            // TTL expiry during a long command; another holder may own it now.
            Ok(false) => tracing::warn!(key = %self.key, "advisory lock gone at release"),
            Err(e) => tracing::error!(key = %self.key, error = %e, "advisory lock release failed"),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}

#[cfg(test)]
#[path = "lock_manager_tests.rs"]
mod tests;
