//! JSON handlers for group state, addressed the way gateways address bulbs.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use lumenhub_app::ports::GroupStateCoordinator;
use lumenhub_domain::command::StateCommand;
use lumenhub_domain::id::BulbId;
use lumenhub_domain::state::GroupState;

use super::{Success, decode};
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the get and update endpoints.
pub enum StateResponse {
    Ok(Json<GroupState>),
}

impl IntoResponse for StateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    Ok(Json<Success>),
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn bulb_id((device_id, device_type, group_id): (String, String, u8)) -> Result<BulbId, ApiError> {
    BulbId::parse(&device_id, &device_type, group_id).map_err(ApiError::from)
}

/// `GET /api/gateways/{device_id}/{device_type}/{group_id}`
pub async fn get<C>(
    State(state): State<AppState<C>>,
    Path(path): Path<(String, String, u8)>,
) -> Result<StateResponse, ApiError>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let bulb = bulb_id(path)?;
    let group = state.light_service.get_state(bulb).await?;
    Ok(StateResponse::Ok(Json(group)))
}

/// `PUT /api/gateways/{device_id}/{device_type}/{group_id}`
///
/// A body carrying `transition` (seconds) moves the fields gradually.
pub async fn update<C>(
    State(state): State<AppState<C>>,
    Path(path): Path<(String, String, u8)>,
    Json(body): Json<serde_json::Value>,
) -> Result<StateResponse, ApiError>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let bulb = bulb_id(path)?;
    let command: StateCommand = decode(body)?;
    let group = state.light_service.update_state(bulb, command).await?;
    Ok(StateResponse::Ok(Json(group)))
}

/// `DELETE /api/gateways/{device_id}/{device_type}/{group_id}`
pub async fn delete<C>(
    State(state): State<AppState<C>>,
    Path(path): Path<(String, String, u8)>,
) -> Result<DeleteResponse, ApiError>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let bulb = bulb_id(path)?;
    state.light_service.delete_state(bulb).await?;
    Ok(DeleteResponse::Ok(Json(Success::OK)))
}
