// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-command context: actor attribution, correlation, deadline,
//! cancellation.

use crate::error::OrchestratorError;
use std::time::{Duration, Instant};
use svy_core::EventSource;
use tokio_util::sync::CancellationToken;

/// Carried by every public operation. Correlation ids link the events one
/// command writes; causation ids link a chained command back to the event
/// that triggered it.
#[derive(Debug, Clone)]
pub struct OpContext {
    pub actor: String,
    pub source: EventSource,
    pub correlation_id: String,
    pub causation_id: Option<String>,
    pub deadline: Option<Instant>,
    pub cancel: CancellationToken,
}

impl OpContext {
    fn new(actor: impl Into<String>, source: EventSource) -> Self {
        Self {
            actor: actor.into(),
            source,
            correlation_id: uuid::Uuid::new_v4().to_string(),
            causation_id: None,
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// A user-initiated command.
    pub fn user(actor: impl Into<String>) -> Self {
        Self::new(actor, EventSource::User)
    }

    /// A worker callback (completion, progress).
    pub fn worker(actor: impl Into<String>) -> Self {
        Self::new(actor, EventSource::Worker)
    }

    /// An internal/system command (schedulers, maintenance).
    pub fn system() -> Self {
        Self::new("system", EventSource::System)
    }

    pub fn with_deadline(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A context for a command chained off this one. Fresh correlation id;
    /// causation points back at the parent command.
    pub fn child(&self) -> Self {
        Self {
            actor: self.actor.clone(),
            source: EventSource::Orchestrator,
            correlation_id: uuid::Uuid::new_v4().to_string(),
            causation_id: Some(self.correlation_id.clone()),
            deadline: self.deadline,
            cancel: self.cancel.clone(),
        }
    }

    /// Fail fast when the command was cancelled or its deadline passed.
    /// Checked before locks and before each transaction; a command that is
    /// already past commit is indistinguishable from success.
    pub fn check(&self) -> Result<(), OrchestratorError> {
        if self.cancel.is_cancelled() {
            return Err(OrchestratorError::validation("cancelled", "operation cancelled"));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(OrchestratorError::validation(
                    "deadline_exceeded",
                    "operation deadline exceeded",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ctx_tests.rs"]
mod tests;
