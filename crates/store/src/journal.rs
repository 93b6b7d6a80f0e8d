// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL journal of committed state events.
//!
//! One serialized [`StateEvent`] per line. The journal is the durable
//! backing of the event log: on open, existing lines are replayed so a
//! fresh store starts with the full event history. A torn final line
//! (crash mid-write) is skipped with a warning rather than failing the
//! open.

use crate::StoreError;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use svy_core::StateEvent;

pub struct Journal {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Journal {
    /// Open (or create) the journal at `path`, returning the events read
    /// back from it.
    pub fn open(path: &Path) -> Result<(Journal, Vec<StateEvent>), StoreError> {
        let mut replayed = Vec::new();
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<StateEvent>(&line) {
                    Ok(event) => replayed.push(event),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping unparseable journal line");
                    }
                }
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let journal = Journal { path: path.to_path_buf(), writer: BufWriter::new(file) };
        Ok((journal, replayed))
    }

    /// Append one event. Buffered; call [`Journal::flush`] at commit.
    pub fn append(&mut self, event: &StateEvent) -> Result<(), StoreError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
