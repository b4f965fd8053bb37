use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateMachineRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LogDowntimeRequest {
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EndDowntimeRequest {
    pub ended_at: DateTime<Utc>,
}

pub async fn create_machine(
    State(state): State<AppState>,
    Json(payload): Json<CreateMachineRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let machine = state.services.machines.create(payload.name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(machine))))
}

pub async fn get_machine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.machines.get(id).await? {
        Some(machine) => Ok(Json(ApiResponse::success(machine))),
        None => Err(ServiceError::NotFound(format!("machine {} not found", id))),
    }
}

pub async fn list_machines(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let machines = state.services.machines.list().await?;
    Ok(Json(ApiResponse::success(machines)))
}

pub async fn deactivate_machine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let machine = state.services.machines.deactivate(id).await?;
    Ok(Json(ApiResponse::success(machine)))
}

pub async fn log_downtime(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LogDowntimeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let downtime = state
        .services
        .machines
        .log_downtime(
            id,
            payload.started_at,
            payload.ended_at,
            payload.reason,
            actor_id(&auth_user),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(downtime))))
}

pub async fn end_downtime(
    State(state): State<AppState>,
    Path((_, downtime_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<EndDowntimeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let downtime = state
        .services
        .machines
        .end_downtime(downtime_id, payload.ended_at)
        .await?;
    Ok(Json(ApiResponse::success(downtime)))
}

pub async fn list_downtimes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let downtimes = state.services.machines.list_downtimes(id).await?;
    Ok(Json(ApiResponse::success(downtimes)))
}
