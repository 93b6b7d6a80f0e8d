// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use svy_core::{Clock, USER_CANCELLED};

#[tokio::test]
async fn start_enqueues_job_and_runs() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;

    let campaign = h.orch.start_campaign(&ctx, &id).await.unwrap();
    assert_eq!(campaign.phase_status, PhaseStatus::InProgress);
    assert_eq!(campaign.started_at_ms, Some(h.clock.epoch_ms()));

    let jobs = h.orch.jobs_for(&id);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_type, svy_core::JobType::DomainGeneration);
    assert_eq!(jobs[0].payload["constant_string"], "shop");
}

#[tokio::test]
async fn start_twice_rejects_second_call() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&ctx, &id).await.unwrap();

    let err = h.orch.start_campaign(&ctx, &id).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("not_in_pending"));
    // Exactly one job, exactly one started event.
    assert_eq!(h.orch.jobs_for(&id).len(), 1);
    let started = h
        .orch
        .events_for(&id)
        .iter()
        .filter(|e| e.new_state.as_deref() == Some("in_progress"))
        .count();
    assert_eq!(started, 1);
}

#[tokio::test]
async fn start_unknown_campaign_is_not_found() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let err = h.orch.start_campaign(&ctx, &CampaignId::new("cmp-ghost")).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("not_found"));
}

#[tokio::test]
async fn pause_resume_cycle_enqueues_fresh_job() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&ctx, &id).await.unwrap();

    let paused = h.orch.pause_campaign(&ctx, &id).await.unwrap();
    assert_eq!(paused.phase_status, PhaseStatus::Paused);

    let resumed = h.orch.resume_campaign(&ctx, &id).await.unwrap();
    assert_eq!(resumed.phase_status, PhaseStatus::InProgress);
    // Resume re-marshals a second job with a real payload.
    let jobs = h.orch.jobs_for(&id);
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|j| j.payload.is_object()));
}

#[tokio::test]
async fn pause_requires_in_progress() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;
    let err = h.orch.pause_campaign(&ctx, &id).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("invalid_transition"));
}

#[tokio::test]
async fn resume_requires_paused() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;
    let err = h.orch.resume_campaign(&ctx, &id).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("not_paused"));
}

#[tokio::test]
async fn cancel_fails_campaign_with_reason() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&ctx, &id).await.unwrap();

    let cancelled = h.orch.cancel_campaign(&ctx, &id).await.unwrap();
    assert_eq!(cancelled.phase_status, PhaseStatus::Failed);
    assert_eq!(cancelled.error_message.as_deref(), Some(USER_CANCELLED));
    assert!(cancelled.completed_at_ms.is_some());
}

#[tokio::test]
async fn cancel_terminal_campaign_changes_nothing() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&ctx, &id).await.unwrap();
    h.orch.cancel_campaign(&ctx, &id).await.unwrap();
    let events_before = h.orch.events_for(&id).len();

    let err = h.orch.cancel_campaign(&ctx, &id).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("invalid_transition"));
    assert_eq!(h.orch.events_for(&id).len(), events_before);
}

#[tokio::test]
async fn set_error_records_message() {
    let h = harness();
    let ctx = OpContext::worker("dns-worker");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&OpContext::user("tester"), &id).await.unwrap();

    let failed =
        h.orch.set_campaign_error(&ctx, &id, "resolver pool exhausted").await.unwrap();
    assert_eq!(failed.phase_status, PhaseStatus::Failed);
    assert_eq!(failed.error_message.as_deref(), Some("resolver pool exhausted"));
}

#[tokio::test]
async fn progress_updates_counters_and_clamps() {
    let h = harness();
    let ctx = OpContext::worker("gen-worker");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&OpContext::user("tester"), &id).await.unwrap();

    let campaign = h.orch.report_progress(&ctx, &id, 2, None).await.unwrap();
    assert_eq!(campaign.processed_items, 2);
    assert_eq!(campaign.progress_percent, 50.0);

    // Overshoot clamps to total.
    let campaign = h.orch.report_progress(&ctx, &id, 100, None).await.unwrap();
    assert_eq!(campaign.processed_items, 4);
    assert_eq!(campaign.progress_percent, 100.0);

    let progress_messages = h
        .bus
        .published
        .lock()
        .iter()
        .filter(|m| m.name() == "campaign:progress")
        .count();
    assert_eq!(progress_messages, 2);
}

#[tokio::test]
async fn progress_rejected_on_terminal_campaign() {
    let h = harness();
    let ctx = OpContext::worker("gen-worker");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&OpContext::user("tester"), &id).await.unwrap();
    h.orch.cancel_campaign(&OpContext::user("tester"), &id).await.unwrap();

    let err = h.orch.report_progress(&ctx, &id, 1, None).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("campaign_terminal"));
}

#[tokio::test]
async fn pattern_offset_is_a_high_water_mark() {
    let h = harness();
    let ctx = OpContext::worker("gen-worker");
    let id = create_manual(&h, "alpha").await;

    assert_eq!(h.orch.advance_pattern_offset(&ctx, &id, 100).await.unwrap(), 100);
    assert_eq!(h.orch.advance_pattern_offset(&ctx, &id, 50).await.unwrap(), 100);
    assert_eq!(h.orch.advance_pattern_offset(&ctx, &id, 1_000).await.unwrap(), 1_000);
}

#[tokio::test]
async fn legacy_start_advances_into_attached_dns_phase() {
    let h = harness();
    let ctx = OpContext::user("tester");
    // Manual campaign with DNS params attached at create time.
    let req = crate::requests::CreateCampaignRequest::new("alpha", gen_spec()).dns(dns_spec());
    let id = h.orch.create_campaign(&ctx, req).await.unwrap().id;
    h.orch.start_campaign(&ctx, &id).await.unwrap();
    h.orch
        .handle_campaign_completion(
            &OpContext::worker("gen-worker"),
            crate::requests::CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    // Manual mode: completion left the phase pointer alone.
    assert_eq!(h.orch.get_campaign(&id).unwrap().current_phase, Some(Phase::Generation));

    // Start again: generation is completed and DNS params exist, so the
    // campaign enters DNS validation in place.
    let campaign = h.orch.start_campaign(&ctx, &id).await.unwrap();
    assert_eq!(campaign.current_phase, Some(Phase::DnsValidation));
    assert_eq!(campaign.phase_status, PhaseStatus::InProgress);
    let jobs = h.orch.jobs_for(&id);
    assert_eq!(jobs.last().unwrap().job_type, svy_core::JobType::DnsValidation);
}
