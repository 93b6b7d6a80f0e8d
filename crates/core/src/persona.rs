// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persona and keyword-set lookup records.
//!
//! Persona CRUD lives outside the orchestrator; these are the read-side
//! shapes the phase-configuration preconditions check against.

use crate::id::{KeywordSetId, PersonaId};
use serde::{Deserialize, Serialize};

/// Which validation phase a persona serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKind {
    Dns,
    Http,
}

crate::status_strings! {
    PersonaKind {
        Dns => "dns",
        Http => "http",
    }
}

/// A resolver or HTTP client identity used by validation workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    pub kind: PersonaKind,
    pub enabled: bool,
}

/// A named set of keywords scanned for during HTTP validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub id: KeywordSetId,
    pub name: String,
    pub enabled: bool,
    pub terms: Vec<String>,
}
