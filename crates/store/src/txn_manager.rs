// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrying transaction wrapper and compensated multi-step boundaries.
//!
//! Every component reaches the store through [`TxnManager::run`]: it owns
//! the per-command-class timeout, bounded retry with exponential backoff
//! and jitter on transient failures, and outcome metrics. Nothing opens
//! ad-hoc transactions.

use crate::mem::{MemStore, Txn};
use crate::{Retryable, StoreError};
use rand::Rng;
use std::time::{Duration, Instant};
use svy_core::TxnConfig;

/// Command class, selecting the timeout budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// Status-only updates: pause, cancel, error, progress.
    StatusUpdate,
    /// Start/resume: marshal a payload and enqueue a job.
    StartResume,
    /// Delete, which may cascade.
    Delete,
}

impl OpClass {
    pub fn budget(self, cfg: &TxnConfig) -> Duration {
        match self {
            OpClass::StatusUpdate => cfg.status_update_timeout(),
            OpClass::StartResume => cfg.start_timeout(),
            OpClass::Delete => cfg.delete_timeout(),
        }
    }
}

/// Wraps store transactions with retry, timeout and metrics.
#[derive(Clone)]
pub struct TxnManager {
    store: MemStore,
    cfg: TxnConfig,
}

impl TxnManager {
    pub fn new(store: MemStore, cfg: TxnConfig) -> Self {
        Self { store, cfg }
    }

    pub fn store(&self) -> &MemStore {
        &self.store
    }

    /// Run a unit of work, retrying transient failures.
    ///
    /// The closure may run more than once; it must not capture effects that
    /// cannot be repeated. Retries stop at `max_retries` or when the class
    /// budget is spent, whichever comes first.
    pub async fn run<T, E, F>(
        &self,
        op: &'static str,
        class: OpClass,
        entity: &str,
        mut work: F,
    ) -> Result<T, E>
    where
        E: From<StoreError> + Retryable + std::fmt::Display,
        F: FnMut(&mut Txn<'_>) -> Result<T, E>,
    {
        let budget = class.budget(&self.cfg);
        let started = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            let result = self.store.transaction(&mut work);
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match result {
                Ok(value) => {
                    tracing::debug!(op, entity, attempt, elapsed_ms, "transaction committed");
                    return Ok(value);
                }
                Err(e) if e.is_transient()
                    && attempt < self.cfg.max_retries
                    && started.elapsed() < budget =>
                {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        op,
                        entity,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::warn!(op, entity, attempt, elapsed_ms, error = %e, "transaction failed");
                    return Err(e);
                }
            }
            if started.elapsed() >= budget {
                return Err(E::from(StoreError::Busy(format!(
                    "{op} exceeded {}ms budget",
                    budget.as_millis()
                ))));
            }
        }
    }

    /// Exponential backoff, capped, with jitter in the upper half.
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.cfg.backoff_base_ms.saturating_mul(1u64 << attempt.min(16));
        let capped = exp.min(self.cfg.backoff_cap_ms).max(1);
        let jitter = rand::thread_rng().gen_range(0..=capped / 2);
        Duration::from_millis(capped / 2 + jitter)
    }
}

type StepFn<'a> = Box<dyn FnOnce(&mut Txn<'_>) -> Result<(), StoreError> + 'a>;
type UndoFn<'a> = Box<dyn FnOnce() + 'a>;

struct BoundaryStep<'a> {
    name: &'static str,
    run: StepFn<'a>,
    undo: Option<UndoFn<'a>>,
}

/// An ordered list of named steps executed in one transaction.
///
/// On a step failure the DB work rolls back with the transaction; the
/// compensation closures exist for effects *outside* the store and run in
/// reverse order over the steps that had already succeeded.
pub struct TxnBoundary<'a> {
    store: &'a MemStore,
    op: &'static str,
    steps: Vec<BoundaryStep<'a>>,
}

impl<'a> TxnBoundary<'a> {
    pub fn new(store: &'a MemStore, op: &'static str) -> Self {
        Self { store, op, steps: Vec::new() }
    }

    pub fn step(
        mut self,
        name: &'static str,
        run: impl FnOnce(&mut Txn<'_>) -> Result<(), StoreError> + 'a,
    ) -> Self {
        self.steps.push(BoundaryStep { name, run: Box::new(run), undo: None });
        self
    }

    pub fn step_with_undo(
        mut self,
        name: &'static str,
        run: impl FnOnce(&mut Txn<'_>) -> Result<(), StoreError> + 'a,
        undo: impl FnOnce() + 'a,
    ) -> Self {
        self.steps.push(BoundaryStep { name, run: Box::new(run), undo: Some(Box::new(undo)) });
        self
    }

    pub fn execute(self) -> Result<(), StoreError> {
        let op = self.op;
        let steps = self.steps;
        self.store.transaction(|txn| {
            let mut undos: Vec<(&'static str, UndoFn<'a>)> = Vec::new();
            for step in steps {
                match (step.run)(txn) {
                    Ok(()) => {
                        if let Some(undo) = step.undo {
                            undos.push((step.name, undo));
                        }
                    }
                    Err(e) => {
                        tracing::warn!(op, step = step.name, error = %e, "boundary step failed");
                        for (name, undo) in undos.into_iter().rev() {
                            tracing::debug!(op, step = name, "compensating");
                            undo();
                        }
                        return Err(e);
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "txn_manager_tests.rs"]
mod tests;
