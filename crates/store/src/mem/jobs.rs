// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-queue table access (producer side).

use super::Txn;
use crate::StoreError;
use svy_core::{CampaignId, CampaignJob, JobId};

impl Txn<'_> {
    pub fn insert_job(&mut self, job: CampaignJob) -> Result<(), StoreError> {
        if self.tables.jobs.contains_key(&job.id) {
            return Err(StoreError::Conflict(format!("job {} exists", job.id)));
        }
        self.tables.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    pub fn job(&self, id: &JobId) -> Result<CampaignJob, StoreError> {
        self.tables
            .jobs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("job {id}")))
    }

    /// Jobs for one campaign, oldest first.
    pub fn jobs_for_campaign(&self, id: &CampaignId) -> Vec<CampaignJob> {
        let mut jobs: Vec<CampaignJob> = self
            .tables
            .jobs
            .values()
            .filter(|j| &j.campaign_id == id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));
        jobs
    }
}
