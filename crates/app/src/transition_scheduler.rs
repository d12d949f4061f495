//! Transition scheduler: runs transition plans on timers.
//!
//! Every active plan owns one tokio task that wakes once per period, takes the
//! next update from the plan and hands it to the [`GroupStateCoordinator`].
//! The registry enforces at most one active plan per `(bulb, key)`: creating a
//! plan for an occupied slot cancels the previous one.
//!
//! Cancellation (delete, replacement, clear) aborts the task and awaits its
//! join handle before returning, so no update of a cancelled plan is applied
//! after the call that cancelled it returns.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use lumenhub_domain::error::{LumenHubError, NotFoundError};
use lumenhub_domain::id::{BulbId, TransitionId};
use lumenhub_domain::state::GroupUpdate;
use lumenhub_domain::transition::{
    PlanKey, PlanSummary, TransitionPlan, TransitionSpec, synchronize,
};

use crate::ports::GroupStateCoordinator;

struct ActiveTransition {
    bulb: BulbId,
    key: PlanKey,
    plan: Arc<Mutex<TransitionPlan>>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Registry {
    active: HashMap<TransitionId, ActiveTransition>,
    by_key: HashMap<(BulbId, PlanKey), TransitionId>,
}

impl Registry {
    fn detach(&mut self, id: TransitionId) -> Option<ActiveTransition> {
        let active = self.active.remove(&id)?;
        let slot = (active.bulb, active.key);
        if self.by_key.get(&slot) == Some(&id) {
            self.by_key.remove(&slot);
        }
        Some(active)
    }

    fn detach_where(&mut self, predicate: impl Fn(&ActiveTransition) -> bool) -> Vec<ActiveTransition> {
        let ids: Vec<TransitionId> = self
            .active
            .iter()
            .filter(|(_, active)| predicate(active))
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter().filter_map(|id| self.detach(id)).collect()
    }
}

struct Inner<C> {
    coordinator: C,
    registry: Mutex<Registry>,
    next_id: AtomicU64,
    apply_failures: AtomicU64,
}

impl<C> Inner<C> {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        lock(&self.registry)
    }

    fn retire(&self, id: TransitionId) {
        // the handle belongs to the task that is finishing; dropping it detaches.
        // no-op when the plan was already detached by a cancellation
        self.registry().detach(id);
    }
}

/// Registry of active transitions plus their timer tasks.
///
/// Cheap to clone; clones share the same registry.
pub struct TransitionScheduler<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for TransitionScheduler<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> TransitionScheduler<C>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    /// Create a scheduler that applies ticks through `coordinator`.
    pub fn new(coordinator: C) -> Self {
        Self {
            inner: Arc::new(Inner {
                coordinator,
                registry: Mutex::new(Registry::default()),
                next_id: AtomicU64::new(1),
                apply_failures: AtomicU64::new(0),
            }),
        }
    }

    /// The coordinator ticks are applied to.
    pub fn coordinator(&self) -> &C {
        &self.inner.coordinator
    }

    /// Validate `spec` and start it, replacing any plan at the same key.
    ///
    /// # Errors
    ///
    /// Returns [`LumenHubError::Validation`] when the spec is invalid; nothing
    /// is scheduled or cancelled in that case.
    pub async fn create(&self, spec: TransitionSpec) -> Result<TransitionId, LumenHubError> {
        let mut ids = self.create_batch(vec![spec]).await?;
        Ok(ids.remove(0))
    }

    /// Start several plans that finish together.
    ///
    /// Shorter plans are padded with their final value to the length of the
    /// longest one. Specs sharing a key replace each other in order.
    ///
    /// # Errors
    ///
    /// Returns [`LumenHubError::Validation`] when any spec is invalid; nothing
    /// is scheduled or cancelled in that case.
    pub async fn create_batch(
        &self,
        specs: Vec<TransitionSpec>,
    ) -> Result<Vec<TransitionId>, LumenHubError> {
        for spec in &specs {
            spec.validate()?;
        }
        let mut plans: Vec<TransitionPlan> = specs
            .iter()
            .map(|spec| TransitionPlan::new(self.next_id(), spec))
            .collect();
        synchronize(&mut plans);

        let mut ids = Vec::with_capacity(plans.len());
        let mut replaced = Vec::new();
        {
            let mut registry = self.inner.registry();
            for plan in plans {
                let id = plan.id();
                let slot = (plan.bulb(), plan.key());
                if let Some(previous) = registry.by_key.get(&slot).copied()
                    && let Some(active) = registry.detach(previous)
                {
                    replaced.push((previous, active));
                }
                tracing::info!(
                    transition_id = %id,
                    bulb = %slot.0,
                    key = %slot.1,
                    period_ms = plan.period_ms(),
                    ticks = plan.total_ticks(),
                    "transition created"
                );
                // spawned under the registry lock so the task cannot retire before it is registered
                let active = self.spawn(plan);
                registry.by_key.insert(slot, id);
                registry.active.insert(id, active);
                ids.push(id);
            }
        }

        for (previous, active) in replaced {
            tracing::debug!(transition_id = %previous, "transition superseded");
            stop(active).await;
        }
        Ok(ids)
    }

    /// Summaries of every active plan, ordered by id.
    pub fn list(&self) -> Vec<PlanSummary> {
        let plans: Vec<Arc<Mutex<TransitionPlan>>> = self
            .inner
            .registry()
            .active
            .values()
            .map(|active| Arc::clone(&active.plan))
            .collect();
        let mut summaries: Vec<PlanSummary> = plans.iter().map(|plan| lock(plan).summary()).collect();
        summaries.sort_by_key(|summary| summary.id);
        summaries
    }

    /// Summary of one active plan.
    ///
    /// # Errors
    ///
    /// Returns [`LumenHubError::NotFound`] when `id` is not active.
    pub fn get(&self, id: TransitionId) -> Result<PlanSummary, LumenHubError> {
        let plan = self
            .inner
            .registry()
            .active
            .get(&id)
            .map(|active| Arc::clone(&active.plan))
            .ok_or_else(|| not_found(id))?;
        let summary = lock(&plan).summary();
        Ok(summary)
    }

    /// Update deferred to the last tick of the plan occupying `(bulb, key)`.
    pub fn pending_on_finish(&self, bulb: BulbId, key: PlanKey) -> Option<GroupUpdate> {
        let plan = {
            let registry = self.inner.registry();
            let id = registry.by_key.get(&(bulb, key))?;
            Arc::clone(&registry.active.get(id)?.plan)
        };
        lock(&plan).on_finish()
    }

    /// Stop and remove one plan.
    ///
    /// # Errors
    ///
    /// Returns [`LumenHubError::NotFound`] when `id` is not active.
    pub async fn delete(&self, id: TransitionId) -> Result<(), LumenHubError> {
        let active = self
            .inner
            .registry()
            .detach(id)
            .ok_or_else(|| not_found(id))?;
        stop(active).await;
        tracing::info!(transition_id = %id, "transition deleted");
        Ok(())
    }

    /// Stop the plans of `bulb` occupying any of `keys`.
    pub async fn cancel_keys(&self, bulb: BulbId, keys: &[PlanKey]) {
        let cancelled = self
            .inner
            .registry()
            .detach_where(|active| active.bulb == bulb && keys.contains(&active.key));
        stop_all(cancelled).await;
    }

    /// Stop every plan of `bulb`.
    pub async fn cancel_bulb(&self, bulb: BulbId) {
        let cancelled = self
            .inner
            .registry()
            .detach_where(|active| active.bulb == bulb);
        stop_all(cancelled).await;
    }

    /// Stop every plan.
    pub async fn clear(&self) {
        let cancelled = self.inner.registry().detach_where(|_| true);
        let count = cancelled.len();
        stop_all(cancelled).await;
        tracing::info!(count, "cleared active transitions");
    }

    /// Number of ticks the coordinator refused since startup.
    pub fn apply_failures(&self) -> u64 {
        self.inner.apply_failures.load(Ordering::Relaxed)
    }

    fn next_id(&self) -> TransitionId {
        TransitionId::new(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn spawn(&self, plan: TransitionPlan) -> ActiveTransition {
        let bulb = plan.bulb();
        let key = plan.key();
        let id = plan.id();
        let period = Duration::from_millis(plan.period_ms());
        let plan = Arc::new(Mutex::new(plan));
        let handle = tokio::spawn(run(Arc::clone(&self.inner), id, bulb, Arc::clone(&plan), period));
        ActiveTransition {
            bulb,
            key,
            plan,
            handle,
        }
    }
}

/// Timer loop of one plan. Ticks are strictly sequential: the next tick is
/// only awaited once the previous apply returned.
async fn run<C>(
    inner: Arc<Inner<C>>,
    id: TransitionId,
    bulb: BulbId,
    plan: Arc<Mutex<TransitionPlan>>,
    period: Duration,
) where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let _retire = RetireOnDrop {
        inner: Arc::clone(&inner),
        id,
        bulb,
    };
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let next = {
            let mut plan = lock(&plan);
            plan.advance()
        };
        let Some(tick) = next else {
            break;
        };
        if let Err(err) = inner.coordinator.apply(bulb, tick.update).await {
            inner.apply_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(transition_id = %id, bulb = %bulb, error = %err, "failed to apply transition tick");
        }
        if tick.is_last {
            break;
        }
    }

    tracing::debug!(transition_id = %id, bulb = %bulb, "transition completed");
}

/// Removes a plan from the registry when its task ends, however it ends.
struct RetireOnDrop<C> {
    inner: Arc<Inner<C>>,
    id: TransitionId,
    bulb: BulbId,
}

impl<C> Drop for RetireOnDrop<C> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!(transition_id = %self.id, bulb = %self.bulb, "transition task panicked");
        }
        self.inner.retire(self.id);
    }
}

async fn stop(active: ActiveTransition) {
    active.handle.abort();
    // resolves once the task is gone; a cancelled task reports a JoinError
    if let Err(err) = active.handle.await
        && err.is_panic()
    {
        tracing::error!(
            bulb = %active.bulb,
            key = %active.key,
            error = %err,
            "transition task panicked before it was stopped"
        );
    }
}

async fn stop_all(cancelled: Vec<ActiveTransition>) {
    for active in cancelled {
        stop(active).await;
    }
}

fn not_found(id: TransitionId) -> LumenHubError {
    NotFoundError {
        entity: "Transition",
        id: id.to_string(),
    }
    .into()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
