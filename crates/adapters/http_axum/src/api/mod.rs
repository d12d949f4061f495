//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod gateways;
pub mod sse;
#[allow(clippy::missing_errors_doc)]
pub mod transitions;

use axum::Router;
use axum::routing::get;
use serde::Serialize;
use serde::de::DeserializeOwned;

use lumenhub_app::ports::GroupStateCoordinator;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    Router::new()
        // Transitions
        .route(
            "/transitions",
            get(transitions::list::<C>).post(transitions::create::<C>),
        )
        .route(
            "/transitions/{id}",
            get(transitions::get::<C>).delete(transitions::delete::<C>),
        )
        // Group state
        .route(
            "/gateways/{device_id}/{device_type}/{group_id}",
            get(gateways::get::<C>)
                .put(gateways::update::<C>)
                .delete(gateways::delete::<C>),
        )
        // Live updates
        .route("/updates/stream", get(sse::stream::<C>))
}

/// Acknowledgement body for commands without a richer result.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub const OK: Self = Self { success: true };
}

/// Decode a JSON body, reporting shape errors as `400`.
fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|err| ApiError::MalformedBody(err.to_string()))
}
