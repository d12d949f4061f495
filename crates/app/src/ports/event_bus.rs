//! Event bus port: publish/subscribe for state changes.

use std::future::Future;

use lumenhub_domain::error::LumenHubError;
use lumenhub_domain::event::StateChange;

/// Publishes applied state changes to interested subscribers.
pub trait EventPublisher {
    /// Publish a change to all current subscribers.
    fn publish(
        &self,
        change: StateChange,
    ) -> impl Future<Output = Result<(), LumenHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        change: StateChange,
    ) -> impl Future<Output = Result<(), LumenHubError>> + Send {
        (**self).publish(change)
    }
}
