// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn random_ids_carry_prefix_and_are_unique() {
    let a = CampaignId::random();
    let b = CampaignId::random();
    assert!(a.as_str().starts_with(CampaignId::PREFIX));
    assert_eq!(a.as_str().len(), CampaignId::PREFIX.len() + ID_RANDOM_LEN);
    assert_ne!(a, b);
}

#[test]
fn display_and_from_str() {
    let id = JobId::new("job-fixed");
    assert_eq!(id.to_string(), "job-fixed");
    let from: JobId = "job-fixed".into();
    assert_eq!(from, id);
    assert_eq!(id, "job-fixed");
}

#[test]
fn serde_is_transparent() {
    let id = EventId::new("evt-x");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"evt-x\"");
    let parsed: EventId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn usable_as_map_key_via_borrow() {
    use std::collections::HashMap;
    let mut map: HashMap<CampaignId, u32> = HashMap::new();
    map.insert(CampaignId::new("cmp-a"), 1);
    assert_eq!(map.get("cmp-a"), Some(&1));
}
