// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders and proptest strategies shared across crates.
//!
//! Available to other crates via the `test-support` feature.

pub mod strategies {
    use crate::campaign::{Phase, PhaseStatus};
    use crate::machine::TRANSITIONS;
    use crate::params::{GenerationParams, PatternKind};
    use crate::CampaignId;
    use proptest::prelude::*;

    pub fn arb_phase() -> impl Strategy<Value = Phase> {
        prop_oneof![
            Just(Phase::Generation),
            Just(Phase::DnsValidation),
            Just(Phase::HttpKeywordValidation),
            Just(Phase::Analysis),
        ]
    }

    pub fn arb_phase_status() -> impl Strategy<Value = PhaseStatus> {
        prop_oneof![
            Just(PhaseStatus::NotStarted),
            Just(PhaseStatus::InProgress),
            Just(PhaseStatus::Paused),
            Just(PhaseStatus::Completed),
            Just(PhaseStatus::Failed),
        ]
    }

    /// A `(from, to)` pair drawn from the transition table.
    pub fn arb_valid_transition() -> impl Strategy<Value = (PhaseStatus, PhaseStatus)> {
        proptest::sample::select(TRANSITIONS.to_vec())
    }

    pub fn arb_pattern_kind() -> impl Strategy<Value = PatternKind> {
        prop_oneof![
            Just(PatternKind::Prefix),
            Just(PatternKind::Suffix),
            Just(PatternKind::Both),
        ]
    }

    pub fn arb_generation_params() -> impl Strategy<Value = GenerationParams> {
        (
            arb_pattern_kind(),
            "[a-z]{1,12}",
            1u32..8,
            "[a-z0-9]{2,16}",
            prop_oneof![Just("com"), Just("net"), Just("org")],
            1u64..100_000,
        )
            .prop_map(|(pattern_kind, constant, len, charset, tld, count)| {
                GenerationParams {
                    campaign_id: CampaignId::new("cmp-prop"),
                    pattern_kind,
                    constant_string: constant,
                    variable_length: len,
                    charset,
                    tld: tld.to_string(),
                    target_count: count,
                }
            })
    }
}
