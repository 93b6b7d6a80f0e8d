// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-sourcing specs: replay fidelity, snapshot equivalence, and
//! journal durability across a restart.

use crate::prelude::*;

#[tokio::test]
async fn replay_from_empty_reproduces_persisted_state() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("worker-1");

    // created, started, paused, started, completed
    let id = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("replay", gen_spec()))
        .await
        .unwrap()
        .id;
    p.orch.start_campaign(&user, &id).await.unwrap();
    p.orch.pause_campaign(&user, &id).await.unwrap();
    p.clock.advance(std::time::Duration::from_secs(5));
    p.orch.resume_campaign(&user, &id).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();

    let live = p.orch.get_campaign(&id).unwrap();
    let projection = p.orch.rebuild_projection(&id).unwrap();
    assert_eq!(projection.phase_status, live.phase_status);
    assert_eq!(projection.current_phase, live.current_phase);
    assert_eq!(projection.phase_status, PhaseStatus::Completed);

    // updated_at equals the last event's timestamp.
    let events = p.orch.events_for(&id);
    assert_eq!(projection.updated_at_ms, events.last().unwrap().at_ms);
    assert_gap_free(&events);
}

#[tokio::test]
async fn snapshot_base_and_empty_base_agree() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let id = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("snap", gen_spec()))
        .await
        .unwrap()
        .id;
    p.orch.start_campaign(&user, &id).await.unwrap();

    // Snapshot mid-history, then keep going.
    p.orch.snapshot_campaign(&id).await.unwrap();
    p.orch.pause_campaign(&user, &id).await.unwrap();

    // rebuild_projection uses the snapshot; a from-scratch replay of the
    // full log must agree with it.
    let via_snapshot = p.orch.rebuild_projection(&id).unwrap();
    let events = p.orch.events_for(&id);
    let from_empty = svy_store::Projection::replay(None, events.iter());
    assert_eq!(via_snapshot, from_empty);
}

#[tokio::test]
async fn no_committed_event_repeats_a_state() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let id = p
        .orch
        .create_campaign(&user, CreateCampaignRequest::new("no-repeat", gen_spec()))
        .await
        .unwrap()
        .id;
    p.orch.start_campaign(&user, &id).await.unwrap();
    p.orch.pause_campaign(&user, &id).await.unwrap();
    p.orch.resume_campaign(&user, &id).await.unwrap();
    p.orch.cancel_campaign(&user, &id).await.unwrap();

    for event in p.orch.events_for(&id) {
        if let (Some(prev), Some(new)) = (&event.previous_state, &event.new_state) {
            assert_ne!(prev, new, "self-transition leaked into the log: {event:?}");
        }
    }
}

#[tokio::test]
async fn journal_backed_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    let id;
    {
        let p = pipeline_with_store(MemStore::with_journal(&path).unwrap());
        let user = OpContext::user("alice");
        id = p
            .orch
            .create_campaign(&user, CreateCampaignRequest::new("durable", gen_spec()))
            .await
            .unwrap()
            .id;
        p.orch.start_campaign(&user, &id).await.unwrap();
        p.orch.pause_campaign(&user, &id).await.unwrap();
    }

    // A fresh store over the same journal sees the whole event history and
    // projects the same state.
    let store = MemStore::with_journal(&path).unwrap();
    let restarted = pipeline_with_store(store);
    let events = restarted.orch.events_for(&id);
    assert_gap_free(&events);
    let projection = restarted.orch.rebuild_projection(&id).unwrap();
    assert_eq!(projection.phase_status, PhaseStatus::Paused);
    assert_eq!(projection.current_phase, Some(Phase::Generation));
    assert_eq!(projection.name, "durable");
}
