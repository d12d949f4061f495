//! Shared application state for axum handlers.

use std::sync::Arc;

use lumenhub_app::event_bus::InProcessEventBus;
use lumenhub_app::ports::GroupStateCoordinator;
use lumenhub_app::services::light_service::LightService;
use lumenhub_app::transition_scheduler::TransitionScheduler;

/// Application state shared across all axum handlers.
///
/// Generic over the group state coordinator to avoid dynamic dispatch.
/// `Clone` is implemented manually so the coordinator itself does not need
/// to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<C> {
    /// State updates, on/off fades and transition requests.
    pub light_service: Arc<LightService<C>>,
    /// Source of the SSE update feed.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            light_service: Arc::clone(&self.light_service),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<C> AppState<C>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc` services.
    pub fn new(light_service: Arc<LightService<C>>, event_bus: Arc<InProcessEventBus>) -> Self {
        Self {
            light_service,
            event_bus,
        }
    }

    pub fn scheduler(&self) -> &TransitionScheduler<C> {
        self.light_service.scheduler()
    }
}
