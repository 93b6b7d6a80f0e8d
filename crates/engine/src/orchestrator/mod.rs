// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public command surface.
//!
//! Every command follows the same discipline: check the context, take the
//! campaign's in-process mutex, take the cross-process advisory lock, run
//! the unit of work through the transaction manager, then fire the
//! fire-and-forget notifications. Command modules:
//!
//! - `create` — campaign creation
//! - `phases` — DNS/HTTP phase configuration
//! - `control` — start/pause/resume/cancel/error/update/progress/offset
//! - `completion` — worker completion callbacks and auto-chaining
//! - `delete` — cascading delete and the offset reset

mod completion;
mod control;
mod create;
mod delete;
mod phases;

use crate::bus::{Broadcaster, PatternBus};
use crate::coordinator::StateCoordinator;
use crate::ctx::OpContext;
use crate::dispatch::JobDispatcher;
use crate::entity_locks::EntityLocks;
use crate::error::OrchestratorError;
use std::sync::Arc;
use svy_core::{
    BusMessage, Campaign, CampaignId, CampaignJob, Clock, OrchestratorConfig, Phase, PhaseStatus,
    StateEvent, SystemClock,
};
use svy_store::{LockGuard, LockManager, MemStore, OpClass, Projection, TxnManager};
use tokio::sync::OwnedMutexGuard;

/// Advisory-lock key for a campaign.
fn advisory_key(id: &CampaignId) -> String {
    format!("campaign:{id}")
}

/// Filter for [`Orchestrator::list_campaigns`].
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub phase: Option<Phase>,
    pub status: Option<PhaseStatus>,
    pub owner: Option<String>,
}

impl ListFilter {
    fn matches(&self, campaign: &Campaign) -> bool {
        if let Some(phase) = self.phase {
            if campaign.current_phase != Some(phase) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if campaign.phase_status != status {
                return false;
            }
        }
        if let Some(owner) = &self.owner {
            if &campaign.owner != owner {
                return false;
            }
        }
        true
    }
}

/// Both lock tiers for one campaign, released together on drop.
struct CommandGuard {
    _entity: OwnedMutexGuard<()>,
    _advisory: LockGuard,
}

pub struct Orchestrator<C: Clock = SystemClock> {
    store: MemStore,
    txn: TxnManager,
    coordinator: Arc<StateCoordinator>,
    dispatcher: JobDispatcher,
    locks: LockManager<C>,
    entity: EntityLocks,
    bus: Option<Arc<dyn PatternBus>>,
    broadcaster: Option<Arc<dyn Broadcaster>>,
    clock: C,
    /// Identity written into advisory lock rows.
    holder: String,
    /// False in degraded mode (no job store): phases start without a job.
    dispatch_jobs: bool,
}

impl Orchestrator<SystemClock> {
    pub fn builder() -> OrchestratorBuilder<SystemClock> {
        OrchestratorBuilder::new()
    }
}

impl<C: Clock> Orchestrator<C> {
    pub fn coordinator(&self) -> &Arc<StateCoordinator> {
        &self.coordinator
    }

    pub fn store(&self) -> &MemStore {
        &self.store
    }

    fn now(&self) -> u64 {
        self.clock.epoch_ms()
    }

    /// Context check plus both lock tiers, in order: in-process mutex,
    /// then advisory row.
    async fn guard(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
    ) -> Result<CommandGuard, OrchestratorError> {
        ctx.check()?;
        let entity = self.entity.hold(id).await;
        let advisory = self.locks.acquire(&advisory_key(id), &self.holder).await?;
        Ok(CommandGuard { _entity: entity, _advisory: advisory })
    }

    /// Fire-and-forget bus publish and channel broadcast. Failures are
    /// logged, never propagated.
    async fn notify(&self, sequence: u64, msg: BusMessage) {
        if let Some(bus) = &self.bus {
            if let Err(e) = bus.publish(&msg).await {
                tracing::warn!(error = %e, msg = msg.name(), "bus publish failed");
            }
        }
        if let Some(broadcaster) = &self.broadcaster {
            let channel = msg.campaign_id().to_string();
            if let Err(e) = broadcaster.broadcast(&channel, sequence, &msg).await {
                tracing::warn!(error = %e, msg = msg.name(), "broadcast failed");
            }
        }
    }

    // -- read surface --

    pub fn get_campaign(&self, id: &CampaignId) -> Result<Campaign, OrchestratorError> {
        self.store
            .read(|t| t.campaigns.get(id).cloned())
            .ok_or_else(|| OrchestratorError::validation("not_found", format!("campaign {id}")))
    }

    pub fn list_campaigns(&self, filter: &ListFilter) -> Vec<Campaign> {
        let mut rows: Vec<Campaign> =
            self.store.read(|t| t.campaigns.values().filter(|c| filter.matches(c)).cloned().collect());
        rows.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));
        rows
    }

    /// Event log for a campaign, ordered by sequence.
    pub fn events_for(&self, id: &CampaignId) -> Vec<StateEvent> {
        self.store.read(|t| t.events.get(id).cloned().unwrap_or_default())
    }

    pub fn jobs_for(&self, id: &CampaignId) -> Vec<CampaignJob> {
        let mut jobs: Vec<CampaignJob> = self
            .store
            .read(|t| t.jobs.values().filter(|j| &j.campaign_id == id).cloned().collect());
        jobs.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));
        jobs
    }

    /// Replay the event log (latest snapshot + tail) into a projection.
    pub fn rebuild_projection(&self, id: &CampaignId) -> Result<Projection, OrchestratorError> {
        self.store
            .transaction(|txn| svy_store::projection::rebuild(txn, id))
            .map_err(OrchestratorError::from)
    }

    /// Snapshot the campaign's projection at its current sequence.
    /// Advisory only: replay from empty stays authoritative.
    pub async fn snapshot_campaign(&self, id: &CampaignId) -> Result<u64, OrchestratorError> {
        let now = self.now();
        let entity = id.clone();
        self.txn
            .run("snapshot_campaign", OpClass::StatusUpdate, id.as_str(), move |txn| {
                let version = txn.last_sequence(&entity);
                let projection = svy_store::projection::rebuild(txn, &entity)?;
                txn.save_snapshot(&entity, version, serde_json::to_value(&projection)?, now)?;
                Ok::<u64, OrchestratorError>(version)
            })
            .await
    }

    /// The public state-coordination surface: a bare status transition with
    /// full lock and transaction discipline. The command modules use the
    /// same coordinator inside their own transactions.
    pub async fn transition_state(
        &self,
        ctx: &OpContext,
        id: &CampaignId,
        to: PhaseStatus,
        reason: Option<String>,
    ) -> Result<StateEvent, OrchestratorError> {
        let _guard = self.guard(ctx, id).await?;
        let coordinator = self.coordinator.clone();
        let now = self.now();
        let event = self
            .txn
            .run("transition_state", OpClass::StatusUpdate, id.as_str(), |txn| {
                coordinator.transition_in(
                    txn,
                    id,
                    to,
                    ctx,
                    reason.as_deref(),
                    serde_json::Value::Null,
                    now,
                )
            })
            .await?;
        self.notify(
            event.sequence,
            BusMessage::StateChanged { campaign_id: id.clone(), status: to },
        )
        .await;
        Ok(event)
    }
}

pub struct OrchestratorBuilder<C: Clock = SystemClock> {
    store: MemStore,
    cfg: OrchestratorConfig,
    clock: C,
    bus: Option<Arc<dyn PatternBus>>,
    broadcaster: Option<Arc<dyn Broadcaster>>,
    dispatch_jobs: bool,
}

impl OrchestratorBuilder<SystemClock> {
    pub fn new() -> Self {
        Self {
            store: MemStore::in_memory(),
            cfg: OrchestratorConfig::default(),
            clock: SystemClock,
            bus: None,
            broadcaster: None,
            dispatch_jobs: true,
        }
    }
}

impl Default for OrchestratorBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> OrchestratorBuilder<C> {
    pub fn store(mut self, store: MemStore) -> Self {
        self.store = store;
        self
    }

    pub fn config(mut self, cfg: OrchestratorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn clock<C2: Clock>(self, clock: C2) -> OrchestratorBuilder<C2> {
        OrchestratorBuilder {
            store: self.store,
            cfg: self.cfg,
            clock,
            bus: self.bus,
            broadcaster: self.broadcaster,
            dispatch_jobs: self.dispatch_jobs,
        }
    }

    pub fn bus(mut self, bus: Arc<dyn PatternBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Degraded mode for bootstrap and tests: no job store is wired up, so
    /// starting a phase moves it straight to `in_progress`.
    pub fn without_job_queue(mut self) -> Self {
        self.dispatch_jobs = false;
        self
    }

    pub fn build(self) -> Orchestrator<C> {
        let holder = format!("orch-{}", uuid::Uuid::new_v4());
        Orchestrator {
            txn: TxnManager::new(self.store.clone(), self.cfg.txn.clone()),
            locks: LockManager::new(self.store.clone(), self.cfg.lock.clone(), self.clock.clone()),
            store: self.store,
            coordinator: Arc::new(StateCoordinator::new()),
            dispatcher: JobDispatcher::new(self.cfg.jobs.max_attempts),
            entity: EntityLocks::new(),
            bus: self.bus,
            broadcaster: self.broadcaster,
            clock: self.clock,
            holder,
            dispatch_jobs: self.dispatch_jobs,
        }
    }
}

#[cfg(test)]
#[path = "../orchestrator_tests/mod.rs"]
mod tests;
