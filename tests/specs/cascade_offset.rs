// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cascading delete and the shared pattern offset.
//!
//! The offset row is a high-water mark across every campaign that ever
//! used the pattern: deleting one holder leaves it alone; deleting the
//! last holder resets it to zero.

use crate::prelude::*;
use svy_core::fingerprint;

async fn create_generation(p: &Pipeline, name: &str) -> CampaignId {
    p.orch
        .create_campaign(&OpContext::user("alice"), CreateCampaignRequest::new(name, gen_spec()))
        .await
        .unwrap()
        .id
}

fn stored_offset(p: &Pipeline, pattern: &str) -> Option<u64> {
    p.orch.store().read(|t| t.config_states.get(pattern).map(|c| c.last_offset))
}

#[tokio::test]
async fn offset_resets_only_when_last_holder_dies() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("gen-worker");

    // Two campaigns over the identical pattern; G1 consumed up to 1000.
    let g1 = create_generation(&p, "g1").await;
    let g2 = create_generation(&p, "g2").await;
    p.orch.advance_pattern_offset(&worker, &g1, 1_000).await.unwrap();
    let pattern = p.orch.store().read(|t| fingerprint(&t.generation_params[&g1]));
    assert_eq!(stored_offset(&p, &pattern), Some(1_000));

    // G2 still holds the pattern: the high-water mark survives G1.
    p.orch.delete_campaign(&user, &g1).await.unwrap();
    assert_eq!(stored_offset(&p, &pattern), Some(1_000));

    // Last holder gone: reset to zero.
    p.orch.delete_campaign(&user, &g2).await.unwrap();
    assert_eq!(stored_offset(&p, &pattern), Some(0));
}

#[tokio::test]
async fn offset_is_monotone_across_start_complete_delete_cycles() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("gen-worker");

    let keeper = create_generation(&p, "keeper").await;
    let pattern = p.orch.store().read(|t| fingerprint(&t.generation_params[&keeper]));

    let mut last = 0u64;
    for round in 1..=3u64 {
        let id = create_generation(&p, &format!("round-{round}")).await;
        p.orch.start_campaign(&user, &id).await.unwrap();
        p.orch.advance_pattern_offset(&worker, &id, round * 500).await.unwrap();
        p.orch
            .handle_campaign_completion(
                &worker,
                CompletionReport::new(id.clone(), Phase::Generation, 4),
            )
            .await
            .unwrap();
        p.orch.delete_campaign(&user, &id).await.unwrap();

        let offset = stored_offset(&p, &pattern).unwrap();
        assert!(offset >= last, "offset regressed: {offset} < {last}");
        last = offset;
    }
    // The keeper still holds the pattern, so nothing ever reset.
    assert_eq!(last, 1_500);
}

#[tokio::test]
async fn cascade_removes_all_dependents_transitively() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let worker = OpContext::worker("worker-1");

    // gen <- dns (standalone campaign) <- http (standalone campaign)
    let gen = create_generation(&p, "gen").await;

    let dns = create_generation(&p, "dns-follow").await;
    p.orch.start_campaign(&user, &dns).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(dns.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    p.orch
        .configure_dns_phase(
            &user,
            ConfigureDnsRequest::new(
                dns.clone(),
                dns_spec().source_campaign_id(gen.clone()),
                4,
            ),
        )
        .await
        .unwrap();
    p.orch.start_campaign(&user, &dns).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(dns.clone(), Phase::DnsValidation, 4).passing(2u64),
        )
        .await
        .unwrap();

    let http = create_generation(&p, "http-follow").await;
    p.orch.start_campaign(&user, &http).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(http.clone(), Phase::Generation, 4),
        )
        .await
        .unwrap();
    p.orch
        .configure_dns_phase(&user, ConfigureDnsRequest::new(http.clone(), dns_spec(), 4))
        .await
        .unwrap();
    p.orch.start_campaign(&user, &http).await.unwrap();
    p.orch
        .handle_campaign_completion(
            &worker,
            CompletionReport::new(http.clone(), Phase::DnsValidation, 4).passing(2u64),
        )
        .await
        .unwrap();
    p.orch
        .configure_http_phase(
            &user,
            ConfigureHttpRequest::new(
                http.clone(),
                http_spec().source_campaign_id(dns.clone()),
            ),
        )
        .await
        .unwrap();

    // Deleting the root takes the DNS dependent and its HTTP dependent.
    p.orch.delete_campaign(&user, &gen).await.unwrap();

    assert!(p.orch.get_campaign(&gen).is_err());
    assert!(p.orch.get_campaign(&dns).is_err());
    assert!(p.orch.get_campaign(&http).is_err());
    // No parameter row anywhere still references a deleted campaign.
    p.orch.store().read(|t| {
        assert!(t
            .dns_params
            .values()
            .all(|row| row.source_generation_campaign_id != gen));
        assert!(t.http_params.values().all(|row| row.source_campaign_id != dns));
    });
}

#[tokio::test]
async fn delete_of_running_campaign_cancels_first() {
    let p = pipeline();
    let user = OpContext::user("alice");
    let id = create_generation(&p, "running").await;
    p.orch.start_campaign(&user, &id).await.unwrap();

    p.orch.delete_campaign(&user, &id).await.unwrap();
    let events = p.orch.events_for(&id);
    let trace = state_trace(&events);
    // ... started, then cancelled (failed/user_cancelled), then deleted.
    assert_eq!(trace.last().unwrap().0, "campaign:deleted");
    assert!(events
        .iter()
        .any(|e| e.new_state.as_deref() == Some("failed")
            && e.reason.as_deref() == Some("user_cancelled")));
}
