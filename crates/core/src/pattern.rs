// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern fingerprinting for the shared generation offset.
//!
//! Two campaigns that enumerate the same pattern must land on the same
//! fingerprint so they share one offset row. The fingerprint is a sha256
//! over a normalized rendering of the generation parameters: casing,
//! charset ordering, and charset duplicates must not change it.

use crate::params::GenerationParams;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Stable normalized rendering of the pattern-defining fields.
///
/// Campaign identity and target counts are deliberately excluded: the
/// fingerprint identifies the *pattern*, not the campaign using it.
pub fn normalize(params: &GenerationParams) -> serde_json::Value {
    let mut chars: Vec<char> = params.charset.to_lowercase().chars().collect();
    chars.sort_unstable();
    chars.dedup();
    let charset: String = chars.into_iter().collect();

    json!({
        "pattern_kind": params.pattern_kind.to_string(),
        "constant_string": params.constant_string.to_lowercase(),
        "variable_length": params.variable_length,
        "charset": charset,
        "tld": params.tld.trim_start_matches('.').to_lowercase(),
    })
}

/// Hex sha256 of the normalized pattern. Key of the shared offset row.
pub fn fingerprint(params: &GenerationParams) -> String {
    let normalized = normalize(params);
    let mut hasher = Sha256::new();
    hasher.update(normalized.to_string().as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
