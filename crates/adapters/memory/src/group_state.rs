//! Group state map with group 0 propagation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use lumenhub_app::ports::{EventPublisher, GroupStateCoordinator};
use lumenhub_domain::error::LumenHubError;
use lumenhub_domain::event::StateChange;
use lumenhub_domain::id::BulbId;
use lumenhub_domain::state::{GroupState, GroupUpdate};
use lumenhub_domain::time::now;

/// Canonical group state kept in memory.
///
/// An update to group 0 is written to every known member group of the same
/// remote; an update to a member group is mirrored onto its group 0.
pub struct InMemoryGroupStateStore<P> {
    states: RwLock<HashMap<BulbId, GroupState>>,
    publisher: P,
}

impl<P> InMemoryGroupStateStore<P> {
    /// Create an empty store publishing changes through `publisher`.
    pub fn new(publisher: P) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            publisher,
        }
    }

    /// Number of groups with recorded state.
    pub fn len(&self) -> usize {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self, bulb: BulbId, update: &GroupUpdate) -> (GroupState, Vec<StateChange>) {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);

        let mut targets = vec![bulb];
        if bulb.is_group_zero() {
            targets.extend(
                states
                    .keys()
                    .filter(|other| bulb.same_remote(**other) && !other.is_group_zero())
                    .copied(),
            );
        } else {
            targets.push(bulb.group_zero());
        }

        let timestamp = now();
        let changes: Vec<StateChange> = targets
            .into_iter()
            .map(|target| {
                let state = states.entry(target).or_default();
                state.apply(update);
                StateChange {
                    bulb: target,
                    update: *update,
                    state: *state,
                    timestamp,
                }
            })
            .collect();
        (changes[0].state, changes)
    }
}

impl<P> GroupStateCoordinator for InMemoryGroupStateStore<P>
where
    P: EventPublisher + Send + Sync,
{
    async fn apply(&self, bulb: BulbId, update: GroupUpdate) -> Result<GroupState, LumenHubError> {
        let (state, changes) = self.write(bulb, &update);
        for change in changes {
            if let Err(err) = self.publisher.publish(change).await {
                tracing::warn!(bulb = %change.bulb, error = %err, "failed to publish state change");
            }
        }
        Ok(state)
    }

    async fn get_state(&self, bulb: BulbId) -> Result<Option<GroupState>, LumenHubError> {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        Ok(states.get(&bulb).copied())
    }

    async fn forget(&self, bulb: BulbId) -> Result<(), LumenHubError> {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&bulb);
        tracing::debug!(bulb = %bulb, "forgot group state");
        Ok(())
    }
}
