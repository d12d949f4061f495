//! Recording test double for the group state port.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use lumenhub_domain::error::{ApplyError, LumenHubError};
use lumenhub_domain::id::BulbId;
use lumenhub_domain::state::{GroupState, GroupUpdate};

use crate::ports::GroupStateCoordinator;

#[derive(Default)]
pub(crate) struct RecordingCoordinator {
    applied: Mutex<Vec<(BulbId, GroupUpdate)>>,
    states: Mutex<HashMap<BulbId, GroupState>>,
    failing: AtomicBool,
    panicking: AtomicBool,
}

impl RecordingCoordinator {
    pub(crate) fn with_state(bulb: BulbId, state: GroupState) -> Self {
        let coordinator = Self::default();
        coordinator.states.lock().unwrap().insert(bulb, state);
        coordinator
    }

    pub(crate) fn applied(&self) -> Vec<(BulbId, GroupUpdate)> {
        self.applied.lock().unwrap().clone()
    }

    pub(crate) fn state(&self, bulb: BulbId) -> GroupState {
        self.states
            .lock()
            .unwrap()
            .get(&bulb)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn fail_applies(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn panic_on_apply(&self) {
        self.panicking.store(true, Ordering::SeqCst);
    }
}

impl GroupStateCoordinator for RecordingCoordinator {
    fn apply(
        &self,
        bulb: BulbId,
        update: GroupUpdate,
    ) -> impl Future<Output = Result<GroupState, LumenHubError>> + Send {
        self.applied.lock().unwrap().push((bulb, update));
        assert!(!self.panicking.load(Ordering::SeqCst), "gateway driver crashed");
        let result: Result<GroupState, LumenHubError> = if self.failing.load(Ordering::SeqCst) {
            Err(ApplyError {
                bulb: bulb.to_string(),
                reason: "gateway offline".to_string(),
            }
            .into())
        } else {
            let mut states = self.states.lock().unwrap();
            let state = states.entry(bulb).or_default();
            state.apply(&update);
            Ok(*state)
        };
        async { result }
    }

    fn get_state(
        &self,
        bulb: BulbId,
    ) -> impl Future<Output = Result<Option<GroupState>, LumenHubError>> + Send {
        let result = self.states.lock().unwrap().get(&bulb).copied();
        async move { Ok(result) }
    }

    fn forget(&self, bulb: BulbId) -> impl Future<Output = Result<(), LumenHubError>> + Send {
        self.states.lock().unwrap().remove(&bulb);
        async { Ok(()) }
    }
}
