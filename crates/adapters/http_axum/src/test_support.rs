//! In-memory coordinator and request helpers for handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use lumenhub_app::event_bus::InProcessEventBus;
use lumenhub_app::ports::{EventPublisher, GroupStateCoordinator};
use lumenhub_app::services::light_service::LightService;
use lumenhub_app::transition_scheduler::TransitionScheduler;
use lumenhub_domain::error::LumenHubError;
use lumenhub_domain::event::StateChange;
use lumenhub_domain::id::BulbId;
use lumenhub_domain::state::{GroupState, GroupUpdate};
use lumenhub_domain::time::now;
use lumenhub_domain::transition::TransitionDefaults;

use crate::state::AppState;

pub(crate) struct StubCoordinator {
    states: Mutex<HashMap<BulbId, GroupState>>,
    bus: Arc<InProcessEventBus>,
}

impl GroupStateCoordinator for StubCoordinator {
    async fn apply(&self, bulb: BulbId, update: GroupUpdate) -> Result<GroupState, LumenHubError> {
        let state = {
            let mut states = self.states.lock().unwrap();
            let state = states.entry(bulb).or_default();
            state.apply(&update);
            *state
        };
        self.bus
            .publish(StateChange {
                bulb,
                update,
                state,
                timestamp: now(),
            })
            .await?;
        Ok(state)
    }

    async fn get_state(&self, bulb: BulbId) -> Result<Option<GroupState>, LumenHubError> {
        Ok(self.states.lock().unwrap().get(&bulb).copied())
    }

    async fn forget(&self, bulb: BulbId) -> Result<(), LumenHubError> {
        self.states.lock().unwrap().remove(&bulb);
        Ok(())
    }
}

pub(crate) fn test_state() -> AppState<Arc<StubCoordinator>> {
    let bus = Arc::new(InProcessEventBus::new(64));
    let coordinator = Arc::new(StubCoordinator {
        states: Mutex::new(HashMap::new()),
        bus: Arc::clone(&bus),
    });
    let scheduler = TransitionScheduler::new(coordinator);
    let service = LightService::new(scheduler, TransitionDefaults::default());
    AppState::new(Arc::new(service), bus)
}

pub(crate) async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
