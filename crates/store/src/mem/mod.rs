// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded transactional store.
//!
//! [`MemStore`] holds the tables behind a mutex and runs each unit of work
//! against a working copy: commit swaps the copy in, an error (or a panic
//! unwinding through the closure) discards it. The mutex is held for the
//! whole unit of work, so committed transactions are serializable by
//! construction. Table access is grouped per file the way the schema groups
//! rows: campaigns (with params and personas), jobs, events, locks, config
//! states, audit.

mod audit;
mod campaigns;
mod config_states;
mod events;
mod jobs;
mod locks;

use crate::journal::Journal;
use crate::tables::Tables;
use crate::StoreError;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use svy_core::StateEvent;

/// Handle to the embedded store. Cheap to clone; clones share the tables.
#[derive(Clone)]
pub struct MemStore {
    inner: Arc<Mutex<Tables>>,
    journal: Option<Arc<Mutex<Journal>>>,
}

impl MemStore {
    /// A store with empty tables and no durability.
    pub fn in_memory() -> Self {
        Self { inner: Arc::new(Mutex::new(Tables::default())), journal: None }
    }

    /// A store whose committed events are appended to a JSONL journal.
    ///
    /// An existing journal is replayed into the event log on open, so the
    /// event history survives restarts. Aggregate rows are re-projected
    /// from events where needed; parameter and job tables are not
    /// journaled.
    pub fn with_journal(path: &Path) -> Result<Self, StoreError> {
        let (journal, replayed) = Journal::open(path)?;
        let mut tables = Tables::default();
        for event in replayed {
            tables.events.entry(event.entity_id.clone()).or_default().push(event);
        }
        for log in tables.events.values_mut() {
            log.sort_by_key(|e| e.sequence);
        }
        Ok(Self {
            inner: Arc::new(Mutex::new(tables)),
            journal: Some(Arc::new(Mutex::new(journal))),
        })
    }

    /// Run a unit of work. The closure's `Ok` commits, `Err` rolls back.
    pub fn transaction<T, E>(
        &self,
        work: impl FnOnce(&mut Txn<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.inner.lock();
        let mut working = guard.clone();
        let mut txn = Txn { tables: &mut working, appended: Vec::new() };
        let result = work(&mut txn);
        let appended = std::mem::take(&mut txn.appended);
        drop(txn);
        match result {
            Ok(value) => {
                *guard = working;
                drop(guard);
                self.journal_committed(&appended);
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }

    /// Read-only access outside a transaction.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.inner.lock())
    }

    /// Journal committed events. The in-memory commit already happened;
    /// journal trouble is logged, not surfaced.
    fn journal_committed(&self, events: &[StateEvent]) {
        let Some(journal) = &self.journal else { return };
        if events.is_empty() {
            return;
        }
        let mut journal = journal.lock();
        for event in events {
            if let Err(e) = journal.append(event) {
                tracing::error!(error = %e, event = event.kind_name(), "journal append failed");
                return;
            }
        }
        if let Err(e) = journal.flush() {
            tracing::error!(error = %e, "journal flush failed");
        }
    }
}

/// An open unit of work over a working copy of the tables.
pub struct Txn<'a> {
    pub(crate) tables: &'a mut Tables,
    /// Events appended in this transaction, drained to the journal at
    /// commit.
    pub(crate) appended: Vec<StateEvent>,
}

#[cfg(test)]
#[path = "../mem_tests.rs"]
mod tests;
