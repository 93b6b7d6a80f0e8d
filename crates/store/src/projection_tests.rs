// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::MemStore;
use svy_core::{CampaignId, EventId};

fn ev(kind: EventKind, at_ms: u64) -> StateEvent {
    StateEvent {
        id: EventId::random(),
        entity_id: CampaignId::new("cmp-a"),
        sequence: 0,
        kind,
        previous_state: None,
        new_state: None,
        source: svy_core::EventSource::Orchestrator,
        actor: "tester".into(),
        reason: None,
        correlation_id: "corr".into(),
        causation_id: None,
        at_ms,
        context: serde_json::Value::Null,
    }
}

fn state_change(to: PhaseStatus, at_ms: u64) -> StateEvent {
    let mut e = ev(EventKind::StateChanged, at_ms);
    e.new_state = Some(to.to_string());
    e
}

#[test]
fn replay_from_empty_walks_the_lifecycle() {
    // created, started, paused, started, completed
    let log = vec![
        ev(EventKind::Created { name: "alpha".into(), owner: "o1".into() }, 100),
        state_change(PhaseStatus::InProgress, 200),
        state_change(PhaseStatus::Paused, 300),
        state_change(PhaseStatus::InProgress, 400),
        state_change(PhaseStatus::Completed, 500),
    ];
    let p = Projection::replay(None, log.iter());
    assert_eq!(p.name, "alpha");
    assert_eq!(p.current_phase, Some(Phase::Generation));
    assert_eq!(p.phase_status, PhaseStatus::Completed);
    // updated_at equals the last event's timestamp
    assert_eq!(p.updated_at_ms, 500);
    assert_eq!(p.completed_at_ms, Some(500));
}

#[test]
fn phase_change_resets_status_and_completion() {
    let log = vec![
        ev(EventKind::Created { name: "a".into(), owner: "o".into() }, 100),
        state_change(PhaseStatus::InProgress, 200),
        state_change(PhaseStatus::Completed, 300),
        ev(
            EventKind::PhaseChanged {
                from_phase: Some(Phase::Generation),
                to_phase: Some(Phase::DnsValidation),
            },
            400,
        ),
    ];
    let p = Projection::replay(None, log.iter());
    assert_eq!(p.current_phase, Some(Phase::DnsValidation));
    assert_eq!(p.phase_status, PhaseStatus::NotStarted);
    assert!(p.completed_at_ms.is_none());
}

#[test]
fn phase_change_to_none_is_full_completion() {
    let log = vec![
        ev(EventKind::Created { name: "a".into(), owner: "o".into() }, 100),
        ev(
            EventKind::PhaseChanged { from_phase: Some(Phase::Analysis), to_phase: None },
            900,
        ),
    ];
    let p = Projection::replay(None, log.iter());
    assert_eq!(p.current_phase, None);
    assert_eq!(p.phase_status, PhaseStatus::Completed);
    assert_eq!(p.completed_at_ms, Some(900));
}

#[test]
fn auxiliary_events_only_touch_updated_at() {
    let log = vec![
        ev(EventKind::Created { name: "a".into(), owner: "o".into() }, 100),
        ev(
            EventKind::ValidationFailed { validator: "v".into(), detail: "d".into() },
            200,
        ),
        ev(EventKind::TransitionRecorded { processing_ms: 3 }, 300),
    ];
    let p = Projection::replay(None, log.iter());
    assert_eq!(p.phase_status, PhaseStatus::NotStarted);
    assert_eq!(p.updated_at_ms, 300);
}

#[test]
fn deleted_flag_sticks() {
    let log = vec![
        ev(EventKind::Created { name: "a".into(), owner: "o".into() }, 100),
        ev(EventKind::Deleted, 200),
    ];
    let p = Projection::replay(None, log.iter());
    assert!(p.deleted);
}

#[test]
fn snapshot_base_equals_replay_from_empty() {
    let full = vec![
        ev(EventKind::Created { name: "a".into(), owner: "o".into() }, 100),
        state_change(PhaseStatus::InProgress, 200),
        state_change(PhaseStatus::Paused, 300),
        state_change(PhaseStatus::InProgress, 400),
    ];
    // Snapshot at event 2, then replay the tail over it.
    let base = Projection::replay(None, full[..2].iter());
    let from_snapshot = Projection::replay(Some(base), full[2..].iter());
    let from_empty = Projection::replay(None, full.iter());
    assert_eq!(from_snapshot, from_empty);
}

#[test]
fn rebuild_uses_snapshot_and_tail() {
    let store = MemStore::in_memory();
    let id = CampaignId::new("cmp-a");
    store
        .transaction(|txn| -> Result<(), crate::StoreError> {
            txn.append_event(ev(
                EventKind::Created { name: "a".into(), owner: "o".into() },
                100,
            ))?;
            txn.append_event(state_change(PhaseStatus::InProgress, 200))?;
            // Snapshot covering the first two events
            let snap = Projection::replay(None, txn.events_for(&id).iter());
            txn.save_snapshot(&id, 2, serde_json::to_value(&snap)?, 250)?;
            txn.append_event(state_change(PhaseStatus::Completed, 300))?;
            Ok(())
        })
        .unwrap();

    store
        .transaction(|txn| -> Result<(), crate::StoreError> {
            let rebuilt = rebuild(txn, &id)?;
            assert_eq!(rebuilt.phase_status, PhaseStatus::Completed);
            assert_eq!(rebuilt.updated_at_ms, 300);
            Ok(())
        })
        .unwrap();
}
