// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static phase-status transition table.
//!
//! Pure set-lookup validation with no I/O. Every status change in the system
//! goes through [`validate_transition`] before it is persisted.

use crate::campaign::PhaseStatus;
use crate::campaign::PhaseStatus::{Completed, Failed, InProgress, NotStarted, Paused};
use thiserror::Error;

/// Every `(from, to)` pair the orchestrator accepts.
///
/// `completed` and `failed` are terminal. Cancellation is `→ failed` with
/// reason [`crate::campaign::USER_CANCELLED`]; it is not a separate status.
pub const TRANSITIONS: &[(PhaseStatus, PhaseStatus)] = &[
    (NotStarted, InProgress),
    (NotStarted, Failed),
    (InProgress, Paused),
    (InProgress, Completed),
    (InProgress, Failed),
    (Paused, InProgress),
    (Paused, Failed),
];

/// A `(from, to)` pair absent from [`TRANSITIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: PhaseStatus,
    pub to: PhaseStatus,
}

/// Check a status transition against the table.
pub fn validate_transition(from: PhaseStatus, to: PhaseStatus) -> Result<(), TransitionError> {
    if TRANSITIONS.contains(&(from, to)) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// All statuses reachable in one step from `from`. Used for diagnostics.
pub fn valid_targets(from: PhaseStatus) -> Vec<PhaseStatus> {
    TRANSITIONS
        .iter()
        .filter(|(f, _)| *f == from)
        .map(|(_, t)| *t)
        .collect()
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
