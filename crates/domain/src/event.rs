//! Events emitted when a group's state changes.

use serde::{Deserialize, Serialize};

use crate::id::BulbId;
use crate::state::{GroupState, GroupUpdate};
use crate::time::Timestamp;

/// A partial update was applied to a group.
///
/// Carries both the update and the resulting full state so downstream
/// transports can forward either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub bulb: BulbId,
    pub update: GroupUpdate,
    pub state: GroupState,
    pub timestamp: Timestamp,
}
