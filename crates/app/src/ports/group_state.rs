//! Group state port: the canonical, hierarchical light state.

use std::future::Future;

use lumenhub_domain::error::LumenHubError;
use lumenhub_domain::id::BulbId;
use lumenhub_domain::state::{GroupState, GroupUpdate};

/// Owner of the canonical per-group state.
///
/// The transition scheduler calls [`apply`](Self::apply) once per tick, so
/// implementations must be safe to call concurrently for different bulbs and
/// should return well within one transition period. Propagation between a
/// group and its group 0 is the implementation's job.
pub trait GroupStateCoordinator {
    /// Write the fields set in `update` and return the resulting state.
    fn apply(
        &self,
        bulb: BulbId,
        update: GroupUpdate,
    ) -> impl Future<Output = Result<GroupState, LumenHubError>> + Send;

    /// Last known state, or `None` when nothing was ever applied.
    fn get_state(
        &self,
        bulb: BulbId,
    ) -> impl Future<Output = Result<Option<GroupState>, LumenHubError>> + Send;

    /// Drop everything known about `bulb`.
    fn forget(&self, bulb: BulbId) -> impl Future<Output = Result<(), LumenHubError>> + Send;
}

impl<T: GroupStateCoordinator + Send + Sync> GroupStateCoordinator for std::sync::Arc<T> {
    fn apply(
        &self,
        bulb: BulbId,
        update: GroupUpdate,
    ) -> impl Future<Output = Result<GroupState, LumenHubError>> + Send {
        (**self).apply(bulb, update)
    }

    fn get_state(
        &self,
        bulb: BulbId,
    ) -> impl Future<Output = Result<Option<GroupState>, LumenHubError>> + Send {
        (**self).get_state(bulb)
    }

    fn forget(&self, bulb: BulbId) -> impl Future<Output = Result<(), LumenHubError>> + Send {
        (**self).forget(bulb)
    }
}
