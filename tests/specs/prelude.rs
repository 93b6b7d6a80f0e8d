// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the workspace specs.

#![allow(dead_code)]

pub use svy_core::{
    CampaignId, EventKind, FakeClock, JobType, KeywordSet, PatternKind, Persona, PersonaKind,
    Phase, PhaseStatus, StateEvent,
};
pub use svy_engine::{
    CompletionReport, ConfigureDnsRequest, ConfigureHttpRequest, CreateCampaignRequest, DnsSpec,
    GenerationSpec, HttpSpec, ListFilter, OpContext, Orchestrator, RecordingBus,
};
pub use svy_store::{MemStore, StoreError};

use std::sync::Arc;

pub struct Pipeline {
    pub orch: Orchestrator<FakeClock>,
    pub clock: FakeClock,
    pub bus: Arc<RecordingBus>,
}

/// An orchestrator over a store seeded with enabled DNS/HTTP personas and
/// one keyword set, with a recording bus attached.
pub fn pipeline() -> Pipeline {
    pipeline_with_store(MemStore::in_memory())
}

pub fn pipeline_with_store(store: MemStore) -> Pipeline {
    seed_lookups(&store);
    let clock = FakeClock::new();
    let bus = Arc::new(RecordingBus::new());
    let orch = Orchestrator::builder()
        .store(store)
        .clock(clock.clone())
        .bus(bus.clone())
        .broadcaster(bus.clone())
        .build();
    Pipeline { orch, clock, bus }
}

pub fn seed_lookups(store: &MemStore) {
    store
        .transaction(|txn| -> Result<(), StoreError> {
            txn.put_persona(Persona {
                id: "per-dns".into(),
                name: "resolver".into(),
                kind: PersonaKind::Dns,
                enabled: true,
            });
            txn.put_persona(Persona {
                id: "per-http".into(),
                name: "browser".into(),
                kind: PersonaKind::Http,
                enabled: true,
            });
            txn.put_keyword_set(KeywordSet {
                id: "kws-1".into(),
                name: "brands".into(),
                enabled: true,
                terms: vec!["login".into(), "account".into()],
            });
            Ok(())
        })
        .unwrap();
}

pub fn gen_spec() -> GenerationSpec {
    GenerationSpec::new(PatternKind::Prefix, "shop")
        .variable_length(2u32)
        .charset("ab")
        .tld("com")
        .target_count(4u64)
}

pub fn dns_spec() -> DnsSpec {
    DnsSpec::new(vec!["per-dns".into()])
}

pub fn http_spec() -> HttpSpec {
    HttpSpec::new(vec!["per-http".into()], vec!["kws-1".into()])
}

/// The state-bearing shape of an event log: kind name plus the recorded
/// `(previous, new)` pair, skipping per-transition detail records.
pub fn state_trace(events: &[StateEvent]) -> Vec<(String, Option<String>, Option<String>)> {
    events
        .iter()
        .filter(|e| !matches!(e.kind, EventKind::TransitionRecorded { .. }))
        .map(|e| (e.kind_name().to_string(), e.previous_state.clone(), e.new_state.clone()))
        .collect()
}

/// Assert sequences are 1..=n with no gaps or duplicates.
pub fn assert_gap_free(events: &[StateEvent]) {
    for (index, event) in events.iter().enumerate() {
        assert_eq!(
            event.sequence,
            index as u64 + 1,
            "sequence gap at index {index}: {:?}",
            events.iter().map(|e| e.sequence).collect::<Vec<_>>()
        );
    }
}
