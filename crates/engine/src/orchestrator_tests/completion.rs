// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::requests::CompletionReport;

async fn start(h: &Harness, id: &CampaignId) {
    h.orch.start_campaign(&OpContext::user("tester"), id).await.unwrap();
}

#[tokio::test]
async fn manual_mode_completion_holds_the_phase() {
    let h = harness();
    let id = create_manual(&h, "alpha").await;
    start(&h, &id).await;

    let campaign = h
        .orch
        .handle_campaign_completion(
            &OpContext::worker("gen-worker"),
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    assert_eq!(campaign.current_phase, Some(Phase::Generation));
    assert_eq!(campaign.phase_status, PhaseStatus::Completed);
    assert_eq!(campaign.processed_items, 4);
    assert!(campaign.completed_at_ms.is_some());
}

#[tokio::test]
async fn full_sequence_advances_into_configured_dns() {
    let h = harness();
    let id = create_full_sequence(&h, "alpha").await;
    start(&h, &id).await;

    let campaign = h
        .orch
        .handle_campaign_completion(
            &OpContext::worker("gen-worker"),
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    assert_eq!(campaign.current_phase, Some(Phase::DnsValidation));
    assert_eq!(campaign.phase_status, PhaseStatus::NotStarted);
    assert_eq!(campaign.processed_items, 0);
    assert_eq!(campaign.progress_percent, 0.0);
    assert_eq!(campaign.total_items, 4);
    // Advancing only moves the pointer; no DNS job yet.
    assert_eq!(h.orch.jobs_for(&id).len(), 1);
}

#[tokio::test]
async fn full_sequence_holds_when_next_phase_unconfigured() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let req = crate::requests::CreateCampaignRequest::new("alpha", gen_spec()).full_sequence();
    let id = h.orch.create_campaign(&ctx, req).await.unwrap().id;
    start(&h, &id).await;

    let campaign = h
        .orch
        .handle_campaign_completion(
            &OpContext::worker("gen-worker"),
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    // No DNS params attached: completion stands, pointer stays.
    assert_eq!(campaign.current_phase, Some(Phase::Generation));
    assert_eq!(campaign.phase_status, PhaseStatus::Completed);
}

#[tokio::test]
async fn repeated_callbacks_are_idempotent() {
    let h = harness();
    let id = create_manual(&h, "alpha").await;
    start(&h, &id).await;
    let worker = OpContext::worker("gen-worker");

    let report = CompletionReport::new(id.clone(), Phase::Generation, 4);
    h.orch.handle_campaign_completion(&worker, report.clone()).await.unwrap();
    let events_after_first = h.orch.events_for(&id).len();

    // Same callback again: no-op, no new events.
    h.orch.handle_campaign_completion(&worker, report).await.unwrap();
    assert_eq!(h.orch.events_for(&id).len(), events_after_first);
}

#[tokio::test]
async fn stale_phase_callback_is_ignored() {
    let h = harness();
    let id = create_full_sequence(&h, "alpha").await;
    start(&h, &id).await;
    let worker = OpContext::worker("gen-worker");

    h.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    // Campaign is now in DNS validation; a repeated generation callback is
    // stale and must not touch it.
    let events_before = h.orch.events_for(&id).len();
    let campaign = h
        .orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    assert_eq!(campaign.current_phase, Some(Phase::DnsValidation));
    assert_eq!(h.orch.events_for(&id).len(), events_before);
}

#[tokio::test]
async fn dns_completion_records_passing_count_and_chains() {
    let h = harness();
    let id = create_full_sequence(&h, "alpha").await;
    start(&h, &id).await;
    let worker = OpContext::worker("worker");

    h.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    start(&h, &id).await;
    let campaign = h
        .orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::DnsValidation, 4).passing(3u64),
        )
        .await
        .unwrap();

    assert_eq!(campaign.current_phase, Some(Phase::HttpKeywordValidation));
    assert_eq!(campaign.metadata["dns_valid_count"], 3);
    // The HTTP phase sizes itself on the passing count.
    assert_eq!(campaign.total_items, 3);
}

#[tokio::test]
async fn http_completion_chains_to_analysis_and_start_finalizes() {
    let h = harness();
    let id = create_full_sequence(&h, "alpha").await;
    let worker = OpContext::worker("worker");

    start(&h, &id).await;
    h.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    start(&h, &id).await;
    h.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::DnsValidation, 4).passing(3u64),
        )
        .await
        .unwrap();
    start(&h, &id).await;
    let campaign = h
        .orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::HttpKeywordValidation, 3).passing(1u64),
        )
        .await
        .unwrap();
    assert_eq!(campaign.current_phase, Some(Phase::Analysis));
    assert_eq!(campaign.phase_status, PhaseStatus::NotStarted);

    // Analysis has no job: starting it completes the pipeline.
    let finished = h.orch.start_campaign(&OpContext::user("tester"), &id).await.unwrap();
    assert!(finished.is_fully_complete());
    assert_eq!(finished.progress_percent, 100.0);
    assert!(finished.completed_at_ms.is_some());
}

#[tokio::test]
async fn completion_for_unknown_campaign_errors() {
    let h = harness();
    let err = h
        .orch
        .handle_campaign_completion(
            &OpContext::worker("worker"),
            CompletionReport::new(CampaignId::new("cmp-ghost"), Phase::Generation, 1),
        )
        .await
        .unwrap_err();
    assert_eq!(err.validation_code(), Some("not_found"));
}
