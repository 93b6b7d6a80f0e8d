// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full-sequence pipeline specs: every phase completion advances the
//! pointer, counters reset, and the final analysis pass closes the
//! campaign out.

use crate::prelude::*;

async fn start(p: &Pipeline, id: &CampaignId) {
    p.orch.start_campaign(&OpContext::user("alice"), id).await.unwrap();
}

async fn complete(p: &Pipeline, id: &CampaignId, phase: Phase, processed: u64, passing: u64) {
    p.orch
        .handle_campaign_completion(
            &OpContext::worker("worker-1"),
            CompletionReport::new(id.clone(), phase, processed).passing(passing),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn chained_pipeline_runs_to_full_completion() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let req = CreateCampaignRequest::new("chained", gen_spec())
        .owner("owner-1")
        .dns(dns_spec())
        .http(http_spec())
        .full_sequence();
    let id = p.orch.create_campaign(&user, req).await.unwrap().id;

    // Generation.
    start(&p, &id).await;
    complete(&p, &id, Phase::Generation, 4, 4).await;
    let c = p.orch.get_campaign(&id).unwrap();
    assert_eq!(c.current_phase, Some(Phase::DnsValidation));
    assert_eq!(c.phase_status, PhaseStatus::NotStarted);
    assert_eq!((c.processed_items, c.progress_percent), (0, 0.0));

    // DNS validation.
    start(&p, &id).await;
    complete(&p, &id, Phase::DnsValidation, 4, 3).await;
    let c = p.orch.get_campaign(&id).unwrap();
    assert_eq!(c.current_phase, Some(Phase::HttpKeywordValidation));
    assert_eq!(c.total_items, 3);

    // HTTP/keyword validation.
    start(&p, &id).await;
    complete(&p, &id, Phase::HttpKeywordValidation, 3, 1).await;
    let c = p.orch.get_campaign(&id).unwrap();
    assert_eq!(c.current_phase, Some(Phase::Analysis));

    // Analysis: no worker job; starting completes the pipeline.
    start(&p, &id).await;
    let c = p.orch.get_campaign(&id).unwrap();
    assert_eq!(c.current_phase, None);
    assert_eq!(c.phase_status, PhaseStatus::Completed);
    assert_eq!(c.progress_percent, 100.0);
    assert!(c.completed_at_ms.is_some());

    // Jobs were produced for exactly the three worker phases.
    let kinds: Vec<JobType> = p.orch.jobs_for(&id).iter().map(|j| j.job_type).collect();
    assert_eq!(
        kinds,
        vec![JobType::DomainGeneration, JobType::DnsValidation, JobType::HttpKeywordValidation],
    );

    let events = p.orch.events_for(&id);
    assert_gap_free(&events);
    // Three pointer advances plus the final close-out.
    let phase_changes =
        events.iter().filter(|e| matches!(e.kind, EventKind::PhaseChanged { .. })).count();
    assert_eq!(phase_changes, 4);
}

#[tokio::test]
async fn phase_transition_messages_reach_the_campaign_channel() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let req = CreateCampaignRequest::new("broadcast", gen_spec())
        .dns(dns_spec())
        .http(http_spec())
        .full_sequence();
    let id = p.orch.create_campaign(&user, req).await.unwrap().id;
    start(&p, &id).await;
    complete(&p, &id, Phase::Generation, 4, 4).await;

    // Every broadcast goes to the campaign's own channel, sequenced.
    let broadcasts = p.bus.broadcasts.lock();
    assert!(!broadcasts.is_empty());
    assert!(broadcasts.iter().all(|(channel, _, _)| channel == id.as_str()));
    let phase_changed = broadcasts
        .iter()
        .find(|(_, _, msg)| msg.name() == "campaign:phase_changed")
        .expect("phase change broadcast");
    assert!(phase_changed.1 > 0);
}

#[tokio::test]
async fn chain_pauses_are_allowed_mid_pipeline() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let req = CreateCampaignRequest::new("pausing", gen_spec())
        .dns(dns_spec())
        .http(http_spec())
        .full_sequence();
    let id = p.orch.create_campaign(&user, req).await.unwrap().id;

    start(&p, &id).await;
    p.orch.pause_campaign(&user, &id).await.unwrap();
    p.orch.resume_campaign(&user, &id).await.unwrap();
    complete(&p, &id, Phase::Generation, 4, 4).await;

    let c = p.orch.get_campaign(&id).unwrap();
    assert_eq!(c.current_phase, Some(Phase::DnsValidation));
    // Pause/resume produced a second generation job; the chain itself none.
    assert_eq!(p.orch.jobs_for(&id).len(), 2);
}
