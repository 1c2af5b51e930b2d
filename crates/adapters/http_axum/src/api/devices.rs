//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use telebridge_app::ports::CommandPublisher;
use telebridge_domain::command::DeviceCommand;
use telebridge_domain::device::{DeviceRecord, DeviceStatus, RegistrySnapshot};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for the list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    /// Restrict the snapshot to devices with this status.
    pub status: Option<DeviceStatus>,
}

/// Body for the bulk dispatch endpoint.
#[derive(Deserialize)]
pub struct BulkDispatchRequest {
    /// Target device ids.
    pub devices: Vec<String>,
    /// Command sent to every target.
    pub command: DeviceCommand,
}

/// Body returned by a single dispatch.
#[derive(Serialize)]
pub struct DispatchBody {
    pub success: bool,
}

/// Body returned by a bulk dispatch: aggregate counts only.
#[derive(Serialize)]
pub struct BulkDispatchBody {
    pub success: bool,
    pub dispatched: usize,
    pub failed: usize,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<RegistrySnapshot>),
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
    Ok(Json<DeviceRecord>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the dispatch endpoint.
pub enum DispatchResponse {
    Ok(Json<DispatchBody>),
}

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the bulk dispatch endpoint.
pub enum BulkDispatchResponse {
    Ok(Json<BulkDispatchBody>),
}

impl IntoResponse for BulkDispatchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /devices`
///
/// The full registry snapshot keyed by device id; `?status=` filters
/// server-side while keeping the same map shape.
pub async fn list<P>(
    State(state): State<AppState<P>>,
    Query(query): Query<ListQuery>,
) -> ListResponse
where
    P: CommandPublisher + Send + Sync + 'static,
{
    let devices = state.query.snapshot(query.status).await;
    ListResponse::Ok(Json(devices))
}

/// `GET /devices/{id}`
pub async fn get<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    P: CommandPublisher + Send + Sync + 'static,
{
    let device = state.query.get(&id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /devices/{id}/commands`
pub async fn dispatch<P>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
    Json(command): Json<DeviceCommand>,
) -> Result<DispatchResponse, ApiError>
where
    P: CommandPublisher + Send + Sync + 'static,
{
    state.dispatcher.dispatch(&id, command).await?;
    Ok(DispatchResponse::Ok(Json(DispatchBody { success: true })))
}

/// `POST /devices/commands`
///
/// One command to many devices; per-target failures only lower the
/// aggregate counts, they never fail the request.
pub async fn dispatch_bulk<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<BulkDispatchRequest>,
) -> BulkDispatchResponse
where
    P: CommandPublisher + Send + Sync + 'static,
{
    let outcome = state
        .dispatcher
        .dispatch_bulk(&request.devices, request.command)
        .await;
    BulkDispatchResponse::Ok(Json(BulkDispatchBody {
        success: outcome.failed == 0,
        dispatched: outcome.dispatched,
        failed: outcome.failed,
    }))
}
