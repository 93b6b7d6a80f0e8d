// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-campaign dependency edges.
//!
//! A DNS campaign depends on the generation campaign named by its
//! `source_generation_campaign_id`; an HTTP campaign depends on the DNS
//! campaign named by its `source_campaign_id`. Self-references (in-place
//! phase configuration) are not edges. The graph is a DAG by construction;
//! the visited set below only guards against corrupt rows.

use std::collections::HashSet;
use svy_core::{fingerprint, CampaignId};
use svy_store::Txn;

/// Campaigns whose parameter rows point directly at `id`.
pub fn direct_dependents(txn: &Txn<'_>, id: &CampaignId) -> Vec<CampaignId> {
    let mut out: Vec<CampaignId> = Vec::new();
    for row in txn.dns_params_rows() {
        if &row.source_generation_campaign_id == id && &row.campaign_id != id {
            out.push(row.campaign_id);
        }
    }
    for row in txn.http_params_rows() {
        if &row.source_campaign_id == id && &row.campaign_id != id {
            out.push(row.campaign_id);
        }
    }
    out.sort();
    out.dedup();
    out
}

/// All transitive dependents of `root`, deepest first, root excluded.
/// Deleting in this order removes leaves before the campaigns they feed
/// from.
pub fn dependents_depth_first(txn: &Txn<'_>, root: &CampaignId) -> Vec<CampaignId> {
    fn visit(
        txn: &Txn<'_>,
        id: &CampaignId,
        visited: &mut HashSet<CampaignId>,
        order: &mut Vec<CampaignId>,
    ) {
        for dependent in direct_dependents(txn, id) {
            if visited.insert(dependent.clone()) {
                visit(txn, &dependent, visited, order);
                order.push(dependent);
            }
        }
    }

    let mut visited = HashSet::new();
    visited.insert(root.clone());
    let mut order = Vec::new();
    visit(txn, root, &mut visited, &mut order);
    order
}

/// How many campaigns other than `excluding` still hold generation params
/// with this fingerprint. Zero means `excluding` is the pattern's last
/// holder and its offset row may be reset.
pub fn pattern_holder_count(txn: &Txn<'_>, pattern: &str, excluding: &CampaignId) -> usize {
    txn.generation_params_rows()
        .iter()
        .filter(|row| &row.campaign_id != excluding && fingerprint(row) == pattern)
        .count()
}

#[cfg(test)]
#[path = "depgraph_tests.rs"]
mod tests;
