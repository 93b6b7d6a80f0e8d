// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::MemStore;
use std::io::Write as _;
use svy_core::{CampaignId, EventKind, EventSource, PhaseStatus, StateEvent};
use tempfile::tempdir;

fn event(entity: &str, seq: u64) -> StateEvent {
    let mut e = StateEvent::new(
        CampaignId::new(entity),
        EventKind::StateChanged,
        EventSource::Orchestrator,
        "tester",
        "corr",
        1_000 + seq,
    )
    .states(PhaseStatus::NotStarted, PhaseStatus::InProgress);
    e.sequence = seq;
    e
}

#[test]
fn open_creates_file_and_replays_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let (journal, replayed) = Journal::open(&path).unwrap();
    assert!(path.exists());
    assert!(replayed.is_empty());
    assert_eq!(journal.path(), path);
}

#[test]
fn append_flush_reopen_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let (mut journal, _) = Journal::open(&path).unwrap();
        journal.append(&event("cmp-a", 1)).unwrap();
        journal.append(&event("cmp-a", 2)).unwrap();
        journal.flush().unwrap();
    }
    let (_, replayed) = Journal::open(&path).unwrap();
    assert_eq!(replayed.len(), 2);
    assert_eq!(replayed[0].sequence, 1);
    assert_eq!(replayed[1].sequence, 2);
    assert_eq!(replayed[0].entity_id, CampaignId::new("cmp-a"));
}

#[test]
fn torn_tail_line_is_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let (mut journal, _) = Journal::open(&path).unwrap();
        journal.append(&event("cmp-a", 1)).unwrap();
        journal.flush().unwrap();
    }
    // Simulate a crash mid-write.
    {
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"type\":\"campaign:state_ch").unwrap();
    }
    let (_, replayed) = Journal::open(&path).unwrap();
    assert_eq!(replayed.len(), 1);
}

#[test]
fn store_with_journal_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let store = MemStore::with_journal(&path).unwrap();
        store
            .transaction(|txn| -> Result<(), crate::StoreError> {
                txn.append_event(event("cmp-a", 0))?;
                txn.append_event(event("cmp-a", 0))?;
                txn.append_event(event("cmp-b", 0))?;
                Ok(())
            })
            .unwrap();
    }
    let store = MemStore::with_journal(&path).unwrap();
    store.read(|tables| {
        assert_eq!(tables.events.get(&CampaignId::new("cmp-a")).map(Vec::len), Some(2));
        assert_eq!(tables.events.get(&CampaignId::new("cmp-b")).map(Vec::len), Some(1));
    });
    // Sequencing continues where the journal left off.
    let seq = store
        .transaction(|txn| -> Result<u64, crate::StoreError> {
            Ok(txn.append_event(event("cmp-a", 0))?.sequence)
        })
        .unwrap();
    assert_eq!(seq, 3);
}

#[test]
fn rolled_back_events_never_reach_the_journal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let store = MemStore::with_journal(&path).unwrap();
        let _: Result<(), crate::StoreError> = store.transaction(|txn| {
            txn.append_event(event("cmp-a", 0))?;
            Err(crate::StoreError::Busy("forced".into()))
        });
    }
    let (_, replayed) = Journal::open(&path).unwrap();
    assert!(replayed.is_empty());
}
