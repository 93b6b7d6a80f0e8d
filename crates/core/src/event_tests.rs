// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn state_change() -> StateEvent {
    StateEvent::new(
        CampaignId::new("cmp-1"),
        EventKind::StateChanged,
        EventSource::Orchestrator,
        "tester",
        "corr-1",
        1_000,
    )
    .states(PhaseStatus::NotStarted, PhaseStatus::InProgress)
    .reason("start requested")
}

#[test]
fn event_serde_carries_type_tag() {
    let json = serde_json::to_value(state_change()).unwrap();
    assert_eq!(json["type"], "campaign:state_changed");
    assert_eq!(json["previous_state"], "not_started");
    assert_eq!(json["new_state"], "in_progress");
    assert_eq!(json["entity_id"], "cmp-1");
}

#[test]
fn event_serde_round_trip() {
    let ev = state_change().causation("evt-parent").context(serde_json::json!({"k": 1}));
    let json = serde_json::to_string(&ev).unwrap();
    let parsed: StateEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ev);
}

#[test]
fn kind_names_match_serde_tags() {
    let kinds: Vec<(EventKind, &str)> = vec![
        (
            EventKind::Created { name: "n".into(), owner: "o".into() },
            "campaign:created",
        ),
        (EventKind::StateChanged, "campaign:state_changed"),
        (EventKind::TransitionRecorded { processing_ms: 1 }, "campaign:transition_recorded"),
        (
            EventKind::ValidationFailed { validator: "v".into(), detail: "d".into() },
            "campaign:validation_failed",
        ),
        (
            EventKind::HandlerError { handler: "h".into(), detail: "d".into() },
            "campaign:handler_error",
        ),
        (
            EventKind::PhaseChanged {
                from_phase: Some(Phase::Generation),
                to_phase: Some(Phase::DnsValidation),
            },
            "campaign:phase_changed",
        ),
        (EventKind::Deleted, "campaign:deleted"),
    ];
    for (kind, expected) in kinds {
        assert_eq!(kind.name(), expected);
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], expected);
    }
}

#[test]
fn log_summary_is_single_line() {
    let mut ev = state_change();
    ev.sequence = 7;
    let line = ev.log_summary();
    assert!(line.contains("campaign:state_changed"));
    assert!(line.contains("seq=7"));
    assert!(line.contains("not_started->in_progress"));
    assert!(!line.contains('\n'));
}

#[test]
fn bus_message_channel_is_campaign_id() {
    let msg = BusMessage::Progress {
        campaign_id: CampaignId::new("cmp-9"),
        processed: 5,
        total: 10,
        percent: 50.0,
    };
    assert_eq!(msg.campaign_id(), &CampaignId::new("cmp-9"));
    assert_eq!(msg.name(), "campaign:progress");
}
