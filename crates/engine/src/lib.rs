// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! svy-engine: the campaign orchestrator.
//!
//! Composes the store into the command surface: the state coordinator
//! (validate → event → row → validators → handlers → audit, in one
//! transaction), the job dispatcher, the per-campaign lock discipline, the
//! dependency walker, and the public create/start/pause/resume/cancel/
//! delete/completion operations.

pub mod bus;
pub mod coordinator;
pub mod ctx;
pub mod depgraph;
pub mod dispatch;
pub mod entity_locks;
pub mod error;
pub mod orchestrator;
pub mod requests;

#[cfg(any(test, feature = "test-support"))]
pub use bus::RecordingBus;
pub use bus::{Broadcaster, BusError, NoopBus, PatternBus};
pub use coordinator::StateCoordinator;
pub use ctx::OpContext;
pub use dispatch::JobDispatcher;
pub use entity_locks::EntityLocks;
pub use error::OrchestratorError;
pub use orchestrator::{ListFilter, Orchestrator, OrchestratorBuilder};
pub use requests::{
    CompletionReport, ConfigureDnsRequest, ConfigureHttpRequest, CreateCampaignRequest, DnsSpec,
    GenerationSpec, HttpSpec, UpdateCampaignRequest,
};
