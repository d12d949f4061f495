//! JSON handlers for transitions.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use lumenhub_app::ports::GroupStateCoordinator;
use lumenhub_domain::id::{BulbId, TransitionId};
use lumenhub_domain::transition::{PlanSummary, TransitionRequest};

use super::{Success, decode};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a transition: the bulb address next to the
/// transition fields.
#[derive(Deserialize)]
pub struct CreateTransitionBody {
    #[serde(flatten)]
    pub bulb: BulbId,
    #[serde(flatten)]
    pub request: TransitionRequest,
}

#[derive(Serialize)]
pub struct TransitionList {
    pub transitions: Vec<PlanSummary>,
}

#[derive(Serialize)]
pub struct Created {
    pub success: bool,
    pub id: TransitionId,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<TransitionList>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<PlanSummary>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Ok(Json<Created>),
}

impl IntoResponse for CreateResponse {
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

/// `GET /api/transitions`
pub async fn list<C>(State(state): State<AppState<C>>) -> Result<ListResponse, ApiError>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let transitions = state.scheduler().list();
    Ok(ListResponse::Ok(Json(TransitionList { transitions })))
}

/// `GET /api/transitions/{id}`
pub async fn get<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let id = TransitionId::from_str(&id)?;
    let summary = state.scheduler().get(id)?;
    Ok(GetResponse::Ok(Json(summary)))
}

/// `POST /api/transitions`
pub async fn create<C>(
    State(state): State<AppState<C>>,
    Json(body): Json<serde_json::Value>,
) -> Result<CreateResponse, ApiError>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let body: CreateTransitionBody = decode(body)?;
    let id = state
        .light_service
        .create_transition(body.bulb, &body.request)
        .await?;
    Ok(CreateResponse::Ok(Json(Created { success: true, id })))
}

/// `DELETE /api/transitions/{id}`
pub async fn delete<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    let id = TransitionId::from_str(&id)?;
    state.scheduler().delete(id).await?;
    Ok(DeleteResponse::Ok(Json(Success::OK)))
}
