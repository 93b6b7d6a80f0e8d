// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator tuning knobs.
//!
//! Every field has a default; configuration files only name what they
//! override. Loaded from TOML:
//!
//! ```toml
//! [txn]
//! max_retries = 3
//!
//! [lock]
//! ttl_ms = 2000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Transaction-manager settings. Timeouts are per command class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxnConfig {
    /// Budget for status-only updates (pause, cancel, error).
    pub status_update_timeout_ms: u64,
    /// Budget for start/resume, which also marshal and enqueue a job.
    pub start_timeout_ms: u64,
    /// Budget for delete, which may cascade.
    pub delete_timeout_ms: u64,
    /// Retries after a transient failure, on top of the first attempt.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub backoff_cap_ms: u64,
}

impl Default for TxnConfig {
    fn default() -> Self {
        Self {
            status_update_timeout_ms: 20_000,
            start_timeout_ms: 40_000,
            delete_timeout_ms: 30_000,
            max_retries: 2,
            backoff_base_ms: 50,
            backoff_cap_ms: 1_000,
        }
    }
}

/// Advisory-lock settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// How long a held lock row stays valid before peers may steal it.
    pub ttl_ms: u64,
    /// Bounded spin: attempts before giving up with a busy error.
    pub spin_attempts: u32,
    pub spin_delay_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self { ttl_ms: 1_000, spin_attempts: 10, spin_delay_ms: 100 }
    }
}

/// Job-queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobQueueConfig {
    pub max_attempts: u32,
}

impl Default for JobQueueConfig {
    fn default() -> Self {
        Self { max_attempts: crate::job::DEFAULT_MAX_ATTEMPTS }
    }
}

/// Top-level orchestrator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub txn: TxnConfig,
    pub lock: LockConfig,
    pub jobs: JobQueueConfig,
}

impl OrchestratorConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

impl TxnConfig {
    pub fn status_update_timeout(&self) -> Duration {
        Duration::from_millis(self.status_update_timeout_ms)
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    pub fn delete_timeout(&self) -> Duration {
        Duration::from_millis(self.delete_timeout_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
