// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pub/sub and websocket-broadcast seams.
//!
//! Both collaborators are optional and fire-and-forget: a publish failure
//! is logged by the orchestrator and never fails the command that produced
//! the message.

use async_trait::async_trait;
use svy_core::BusMessage;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("bus error: {0}")]
pub struct BusError(pub String);

/// Fan-out notification bus (`campaign:created`, `campaign:phase_changed`, …).
#[async_trait]
pub trait PatternBus: Send + Sync {
    async fn publish(&self, msg: &BusMessage) -> Result<(), BusError>;
}

/// Sequenced per-campaign channel broadcast. The channel is the campaign
/// id; `sequence` is the event sequence that produced the message, so
/// subscribers can order and deduplicate.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, channel: &str, sequence: u64, msg: &BusMessage)
        -> Result<(), BusError>;
}

/// Discards everything. Stands in when no bus is wired up.
pub struct NoopBus;

#[async_trait]
impl PatternBus for NoopBus {
    async fn publish(&self, _msg: &BusMessage) -> Result<(), BusError> {
        Ok(())
    }
}

#[async_trait]
impl Broadcaster for NoopBus {
    async fn broadcast(
        &self,
        _channel: &str,
        _sequence: u64,
        _msg: &BusMessage,
    ) -> Result<(), BusError> {
        Ok(())
    }
}

/// Records every message; can be told to fail to exercise the
/// logged-and-swallowed path.
#[cfg(any(test, feature = "test-support"))]
pub struct RecordingBus {
    pub published: parking_lot::Mutex<Vec<BusMessage>>,
    pub broadcasts: parking_lot::Mutex<Vec<(String, u64, BusMessage)>>,
    pub fail: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingBus {
    pub fn new() -> Self {
        Self {
            published: parking_lot::Mutex::new(Vec::new()),
            broadcasts: parking_lot::Mutex::new(Vec::new()),
            fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn published_names(&self) -> Vec<&'static str> {
        self.published.lock().iter().map(|m| m.name()).collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for RecordingBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl PatternBus for RecordingBus {
    async fn publish(&self, msg: &BusMessage) -> Result<(), BusError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(BusError("injected publish failure".into()));
        }
        self.published.lock().push(msg.clone());
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl Broadcaster for RecordingBus {
    async fn broadcast(
        &self,
        channel: &str,
        sequence: u64,
        msg: &BusMessage,
    ) -> Result<(), BusError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(BusError("injected broadcast failure".into()));
        }
        self.broadcasts.lock().push((channel.to_string(), sequence, msg.clone()));
        Ok(())
    }
}
