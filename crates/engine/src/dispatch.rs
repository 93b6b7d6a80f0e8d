// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase-to-job mapping and enqueue.
//!
//! The job row is inserted in the same transaction as the state change that
//! starts the phase, so a rolled-back start never leaves a job behind, and
//! a committed job always matches the campaign's phase at enqueue time.

use crate::error::OrchestratorError;
use svy_core::{Campaign, CampaignJob, JobType, Phase};
use svy_store::Txn;

#[derive(Clone, Copy)]
pub struct JobDispatcher {
    max_attempts: u32,
}

impl JobDispatcher {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Marshal the campaign's current phase into a queued job.
    ///
    /// Returns `None` for the analysis phase, which produces no worker job.
    /// A phase whose parameter row is missing fails the command rather than
    /// enqueueing an empty payload.
    pub fn enqueue(
        &self,
        txn: &mut Txn<'_>,
        campaign: &Campaign,
        now_ms: u64,
    ) -> Result<Option<CampaignJob>, OrchestratorError> {
        let phase = campaign.current_phase.ok_or_else(|| {
            OrchestratorError::validation(
                "no_active_phase",
                format!("campaign {} has no active phase", campaign.id),
            )
        })?;
        let Some(job_type) = JobType::for_phase(phase) else {
            return Ok(None);
        };

        let payload = match phase {
            Phase::Generation => txn
                .generation_params(&campaign.id)
                .map(|p| serde_json::to_value(p))
                .transpose()?,
            Phase::DnsValidation => {
                txn.dns_params(&campaign.id).map(|p| serde_json::to_value(p)).transpose()?
            }
            Phase::HttpKeywordValidation => {
                txn.http_params(&campaign.id).map(|p| serde_json::to_value(p)).transpose()?
            }
            Phase::Analysis => None,
        };
        let payload = payload.ok_or_else(|| {
            tracing::warn!(campaign = %campaign.id, phase = %phase, "phase has no parameter row");
            OrchestratorError::validation(
                "phase_not_configured",
                format!("no {phase} parameters for campaign {}", campaign.id),
            )
        })?;

        let job =
            CampaignJob::queued(campaign.id.clone(), job_type, payload, self.max_attempts, now_ms);
        txn.insert_job(job.clone())?;
        tracing::debug!(campaign = %campaign.id, job = %job.id, job_type = %job_type, "job enqueued");
        Ok(Some(job))
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
