// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::requests::{ConfigureDnsRequest, CreateCampaignRequest};
use svy_core::fingerprint;

/// A standalone DNS campaign sourcing from `source`.
async fn create_dns_dependent(h: &Harness, name: &str, source: &CampaignId) -> CampaignId {
    let ctx = OpContext::user("tester");
    let id = h
        .orch
        .create_campaign(&ctx, CreateCampaignRequest::new(name, gen_spec()))
        .await
        .unwrap()
        .id;
    // Finish generation so the DNS phase can be configured.
    h.orch.start_campaign(&ctx, &id).await.unwrap();
    h.orch
        .handle_campaign_completion(
            &OpContext::worker("w"),
            crate::requests::CompletionReport::new(id.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    let spec = dns_spec().source_campaign_id(source.clone());
    h.orch
        .configure_dns_phase(&ctx, ConfigureDnsRequest::new(id.clone(), spec, 4))
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn delete_removes_rows_keeps_event_log() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;

    h.orch.delete_campaign(&ctx, &id).await.unwrap();

    assert!(h.orch.get_campaign(&id).is_err());
    h.orch.store().read(|t| {
        assert!(t.generation_params.is_empty());
        assert!(t.jobs.is_empty());
        let log = &t.events[&id];
        assert!(matches!(log.last().unwrap().kind, EventKind::Deleted));
        assert!(t.audit_log.iter().any(|a| a.action == "campaign_deleted"));
    });
    assert!(h.bus.published_names().contains(&"campaign:deleted"));
}

#[tokio::test]
async fn delete_unknown_campaign_is_not_found() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let err = h.orch.delete_campaign(&ctx, &CampaignId::new("cmp-ghost")).await.unwrap_err();
    assert_eq!(err.validation_code(), Some("not_found"));
}

#[tokio::test]
async fn delete_auto_cancels_running_campaign() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let id = create_manual(&h, "alpha").await;
    h.orch.start_campaign(&ctx, &id).await.unwrap();

    h.orch.delete_campaign(&ctx, &id).await.unwrap();

    // The cancellation went through the state machine before the drop.
    let events = h.orch.events_for(&id);
    assert!(events.iter().any(|e| e.new_state.as_deref() == Some("failed")
        && e.reason.as_deref() == Some("user_cancelled")));
    assert!(matches!(events.last().unwrap().kind, EventKind::Deleted));
}

#[tokio::test]
async fn cascade_deletes_dependents_leaves_first() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let root = create_manual(&h, "root").await;
    let dependent = create_dns_dependent(&h, "dep", &root).await;

    h.orch.delete_campaign(&ctx, &root).await.unwrap();

    assert!(h.orch.get_campaign(&root).is_err());
    assert!(h.orch.get_campaign(&dependent).is_err());
    h.orch.store().read(|t| {
        assert!(t.dns_params.is_empty());
        assert!(t.campaigns.is_empty());
    });
}

#[tokio::test]
async fn offset_survives_while_other_holders_remain() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let worker = OpContext::worker("gen-worker");
    // Two campaigns over the identical pattern.
    let g1 = create_manual(&h, "g1").await;
    let g2 = create_manual(&h, "g2").await;
    h.orch.advance_pattern_offset(&worker, &g1, 1_000).await.unwrap();
    let pattern = h.orch.store().read(|t| fingerprint(&t.generation_params[&g1]));

    h.orch.delete_campaign(&ctx, &g1).await.unwrap();
    let offset =
        h.orch.store().read(|t| t.config_states.get(&pattern).map(|c| c.last_offset));
    assert_eq!(offset, Some(1_000));

    h.orch.delete_campaign(&ctx, &g2).await.unwrap();
    let offset =
        h.orch.store().read(|t| t.config_states.get(&pattern).map(|c| c.last_offset));
    assert_eq!(offset, Some(0));
}

#[tokio::test]
async fn bulk_delete_of_nothing_succeeds() {
    let h = harness();
    let ctx = OpContext::user("tester");
    assert_eq!(h.orch.delete_campaigns(&ctx, &[]).await.unwrap(), 0);
}

#[tokio::test]
async fn bulk_delete_tolerates_cascade_overlap() {
    let h = harness();
    let ctx = OpContext::user("tester");
    let root = create_manual(&h, "root").await;
    let dependent = create_dns_dependent(&h, "dep", &root).await;

    // The dependent is listed too, but the root's cascade gets it first.
    let deleted =
        h.orch.delete_campaigns(&ctx, &[root.clone(), dependent.clone()]).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(h.orch.get_campaign(&root).is_err());
    assert!(h.orch.get_campaign(&dependent).is_err());
}
