// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit-log access.

use super::Txn;
use svy_core::AuditEntry;

impl Txn<'_> {
    pub fn append_audit(&mut self, entry: AuditEntry) {
        self.tables.audit_log.push(entry);
    }

    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.tables.audit_log.clone()
    }
}
