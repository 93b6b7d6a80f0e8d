// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process per-campaign command serialization.
//!
//! The first lock tier: one async mutex per campaign id, held for the
//! duration of a command, so concurrent tasks in this process never
//! interleave on the same campaign. The cross-process tier is the advisory
//! lock row (`svy_store::LockManager`).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use svy_core::CampaignId;
use tokio::sync::OwnedMutexGuard;

#[derive(Clone, Default)]
pub struct EntityLocks {
    inner: Arc<Mutex<HashMap<CampaignId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and hold the campaign's command mutex.
    pub async fn hold(&self, id: &CampaignId) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut map = self.inner.lock();
            map.entry(id.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        mutex.lock_owned().await
    }

    /// Number of campaigns with a registered mutex (test introspection).
    pub fn tracked(&self) -> usize {
        self.inner.lock().len()
    }
}

#[cfg(test)]
#[path = "entity_locks_tests.rs"]
mod tests;
