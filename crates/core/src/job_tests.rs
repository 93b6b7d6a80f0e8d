// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    generation = { Phase::Generation, Some(JobType::DomainGeneration) },
    dns        = { Phase::DnsValidation, Some(JobType::DnsValidation) },
    http       = { Phase::HttpKeywordValidation, Some(JobType::HttpKeywordValidation) },
    analysis   = { Phase::Analysis, None },
)]
fn job_type_per_phase(phase: Phase, expected: Option<JobType>) {
    assert_eq!(JobType::for_phase(phase), expected);
}

#[test]
fn queued_job_is_immediately_eligible() {
    let payload = serde_json::json!({"tld": "com"});
    let job = CampaignJob::queued(
        CampaignId::new("cmp-1"),
        JobType::DnsValidation,
        payload.clone(),
        DEFAULT_MAX_ATTEMPTS,
        9_000,
    );
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.attempts, 0);
    assert_eq!(job.max_attempts, 3);
    assert_eq!(job.next_execution_at_ms, 9_000);
    assert_eq!(job.created_at_ms, 9_000);
    assert_eq!(job.payload, payload);
    assert!(job.id.as_str().starts_with(JobId::PREFIX));
}

#[test]
fn job_serde_round_trip() {
    let job = CampaignJob::queued(
        CampaignId::new("cmp-1"),
        JobType::DomainGeneration,
        serde_json::Value::Null,
        5,
        1_000,
    );
    let json = serde_json::to_string(&job).unwrap();
    let parsed: CampaignJob = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, job);
}

#[test]
fn job_type_strings() {
    assert_eq!(JobType::DomainGeneration.to_string(), "domain_generation");
    assert_eq!("dns_validation".parse::<JobType>().unwrap(), JobType::DnsValidation);
}
