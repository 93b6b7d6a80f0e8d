// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command error taxonomy.
//!
//! Every public operation returns at most one error, classified by how the
//! caller should react: validation errors are final and leave state
//! untouched; transient errors may be retried; integrity errors mark a
//! recovered (or unrecoverable) constraint violation; external errors never
//! surface, only log at the seam that produced them; fatal errors indicate
//! a bug or broken environment.

use svy_store::{Retryable, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Precondition or state-machine rejection. Machine-readable `code`,
    /// human-readable `message`. Never retried; state unchanged.
    #[error("{code}: {message}")]
    Validation { code: &'static str, message: String },

    /// Contention or a transient store failure, surfaced only after the
    /// transaction manager's retry budget is spent.
    #[error("transient: {0}")]
    Transient(String),

    /// Constraint violation that the check-then-reuse path could not
    /// recover.
    #[error("integrity: {0}")]
    Integrity(String),

    /// Failure in a fire-and-forget collaborator (bus, broadcast). Logged
    /// and swallowed at the call site; carried here only for tests.
    #[error("external: {0}")]
    External(String),

    /// Codec or I/O failure inside a transaction; rolled back and raised
    /// for observability.
    #[error("fatal: {0}")]
    Fatal(String),
}

impl OrchestratorError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        OrchestratorError::Validation { code, message: message.into() }
    }

    /// The machine-readable code, if this is a validation error.
    pub fn validation_code(&self) -> Option<&'static str> {
        match self {
            OrchestratorError::Validation { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<StoreError> for OrchestratorError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(m) => OrchestratorError::Validation { code: "not_found", message: m },
            StoreError::Conflict(m) => OrchestratorError::Integrity(m),
            StoreError::Busy(m) => OrchestratorError::Transient(m),
            StoreError::Codec(e) => OrchestratorError::Fatal(e.to_string()),
            StoreError::Io(e) => OrchestratorError::Fatal(e.to_string()),
        }
    }
}

impl From<svy_core::TransitionError> for OrchestratorError {
    fn from(e: svy_core::TransitionError) -> Self {
        OrchestratorError::Validation { code: "invalid_transition", message: e.to_string() }
    }
}

impl From<serde_json::Error> for OrchestratorError {
    fn from(e: serde_json::Error) -> Self {
        OrchestratorError::Fatal(e.to_string())
    }
}

impl Retryable for OrchestratorError {
    fn is_transient(&self) -> bool {
        matches!(self, OrchestratorError::Transient(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
