// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign job rows handed to the worker pool.
//!
//! The orchestrator is the producer; workers consume at-least-once and must
//! deduplicate by `(campaign_id, job_type, created_at window)`.

use crate::campaign::Phase;
use crate::id::{CampaignId, JobId};
use serde::{Deserialize, Serialize};

/// Default number of delivery attempts before a job is dead-lettered.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Worker job kind. One per phase that does external work; the analysis
/// phase produces no job and auto-completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    DomainGeneration,
    DnsValidation,
    HttpKeywordValidation,
}

crate::status_strings! {
    JobType {
        DomainGeneration => "domain_generation",
        DnsValidation => "dns_validation",
        HttpKeywordValidation => "http_keyword_validation",
    }
}

impl JobType {
    /// The job kind that drives the given phase, if any.
    pub fn for_phase(phase: Phase) -> Option<JobType> {
        match phase {
            Phase::Generation => Some(JobType::DomainGeneration),
            Phase::DnsValidation => Some(JobType::DnsValidation),
            Phase::HttpKeywordValidation => Some(JobType::HttpKeywordValidation),
            Phase::Analysis => None,
        }
    }
}

/// Queue-side status of a job row. The orchestrator only ever inserts
/// `queued` rows; the rest of the lifecycle belongs to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

crate::status_strings! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// One row of the job queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignJob {
    pub id: JobId,
    pub campaign_id: CampaignId,
    pub job_type: JobType,
    pub status: JobStatus,
    pub attempts: u32,
    pub max_attempts: u32,
    pub next_execution_at_ms: u64,
    /// JSON-serialized phase parameter row at enqueue time.
    pub payload: serde_json::Value,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl CampaignJob {
    /// Build a freshly queued job, eligible for immediate execution.
    pub fn queued(
        campaign_id: CampaignId,
        job_type: JobType,
        payload: serde_json::Value,
        max_attempts: u32,
        now_ms: u64,
    ) -> Self {
        Self {
            id: JobId::random(),
            campaign_id,
            job_type,
            status: JobStatus::Queued,
            attempts: 0,
            max_attempts,
            next_execution_at_ms: now_ms,
            payload,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
