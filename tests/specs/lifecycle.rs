// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual-phase lifecycle specs.
//!
//! A campaign driven by explicit user commands: generation runs and
//! completes, DNS validation is configured and started, then the user
//! cancels. Also the invalid-transition and idempotent-cancel edges.

use crate::prelude::*;

#[tokio::test]
async fn manual_pipeline_happy_path_then_cancel() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("worker-1");

    // Create: generation phase, not started.
    let campaign = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("manual-a", gen_spec()))
        .await
        .unwrap();
    let id = campaign.id.clone();
    assert_eq!(campaign.current_phase, Some(Phase::Generation));
    assert_eq!(campaign.phase_status, PhaseStatus::NotStarted);

    // Start: one generation job, campaign running.
    let campaign = p.orch.start_campaign(&user, &id).await.unwrap();
    assert_eq!(campaign.phase_status, PhaseStatus::InProgress);
    let jobs = p.orch.jobs_for(&id);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_type, JobType::DomainGeneration);

    // Worker finishes generation; manual mode holds the phase pointer.
    let campaign = p
        .orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    assert_eq!(campaign.current_phase, Some(Phase::Generation));
    assert_eq!(campaign.phase_status, PhaseStatus::Completed);

    // Configure DNS validation explicitly.
    let campaign = p
        .orch
        .configure_dns_phase(&user, ConfigureDnsRequest::new(id.clone(), dns_spec(), 4))
        .await
        .unwrap();
    assert_eq!(campaign.current_phase, Some(Phase::DnsValidation));
    assert_eq!(campaign.phase_status, PhaseStatus::NotStarted);
    assert_eq!(campaign.processed_items, 0);

    // Start DNS; a dns_validation job is enqueued.
    let campaign = p.orch.start_campaign(&user, &id).await.unwrap();
    assert_eq!(campaign.phase_status, PhaseStatus::InProgress);
    let jobs = p.orch.jobs_for(&id);
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[1].job_type, JobType::DnsValidation);

    // Cancel: failed with user_cancelled, completion stamped.
    let campaign = p.orch.cancel_campaign(&user, &id).await.unwrap();
    assert_eq!(campaign.phase_status, PhaseStatus::Failed);
    assert_eq!(campaign.error_message.as_deref(), Some("user_cancelled"));
    assert!(campaign.completed_at_ms.is_some());

    // The full state trace of the run, in order.
    let events = p.orch.events_for(&id);
    assert_gap_free(&events);
    let trace = state_trace(&events);
    let expected: Vec<(&str, Option<&str>, Option<&str>)> = vec![
        ("campaign:created", None, None),
        ("campaign:state_changed", Some("not_started"), Some("in_progress")),
        ("campaign:state_changed", Some("in_progress"), Some("completed")),
        ("campaign:phase_changed", None, None),
        ("campaign:state_changed", Some("not_started"), Some("in_progress")),
        ("campaign:state_changed", Some("in_progress"), Some("failed")),
    ];
    let got: Vec<(&str, Option<&str>, Option<&str>)> = trace
        .iter()
        .map(|(k, p, n)| (k.as_str(), p.as_deref(), n.as_deref()))
        .collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn cancel_of_completed_campaign_is_rejected_without_events() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("worker-1");
    let id = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("done", gen_spec()))
        .await
        .unwrap()
        .id;
    p.orch.start_campaign(&user, &id).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();

    let before = p.orch.events_for(&id);
    let err = p.orch.cancel_campaign(&user, &id).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("invalid_transition"));
    assert!(err.to_string().contains("completed -> failed"));

    let after = p.orch.events_for(&id);
    assert_eq!(before, after);
    assert_eq!(p.orch.get_campaign(&id).unwrap().phase_status, PhaseStatus::Completed);
}

#[tokio::test]
async fn configure_dns_requires_completed_generation() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let id = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("early", gen_spec()))
        .await
        .unwrap()
        .id;

    let err = p
        .orch
        .configure_dns_phase(&user, ConfigureDnsRequest::new(id.clone(), dns_spec(), 4))
        .await
        .unwrap_err();
    assert_eq!(err.validation_code(), Some("phase_precondition"));
}

#[tokio::test]
async fn configure_http_requires_passing_dns_results() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("worker-1");
    let id = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("http-early", gen_spec()))
        .await
        .unwrap()
        .id;
    p.orch.start_campaign(&user, &id).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    p.orch
        .configure_dns_phase(&user, ConfigureDnsRequest::new(id.clone(), dns_spec(), 4))
        .await
        .unwrap();
    p.orch.start_campaign(&user, &id).await.unwrap();
    // DNS completes with zero passing results.
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::DnsValidation, 4).passing(0u64),
        )
        .await
        .unwrap();

    let err = p
        .orch
        .configure_http_phase(&user, ConfigureHttpRequest::new(id.clone(), http_spec()))
        .await
        .unwrap_err();
    assert_eq!(err.validation_code(), Some("no_passing_results"));
}

#[tokio::test]
async fn every_job_matches_the_phase_it_was_enqueued_for() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("worker-1");
    let id = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("jobs", gen_spec()))
        .await
        .unwrap()
        .id;
    p.orch.start_campaign(&user, &id).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    p.orch
        .configure_dns_phase(&user, ConfigureDnsRequest::new(id.clone(), dns_spec(), 4))
        .await
        .unwrap();
    p.orch.start_campaign(&user, &id).await.unwrap();

    let jobs = p.orch.jobs_for(&id);
    assert_eq!(
        jobs.iter().map(|j| j.job_type).collect::<Vec<_>>(),
        vec![JobType::DomainGeneration, JobType::DnsValidation],
    );
    // Payloads were marshalled from the matching parameter tables.
    assert!(jobs[0].payload.get("pattern_kind").is_some());
    assert!(jobs[1].payload.get("persona_ids").is_some());
}
