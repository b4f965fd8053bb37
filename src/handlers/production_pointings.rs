use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::production_pointing::PointingStatus;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::production_pointings::CreatePointingInput;
use crate::{ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePointingRequest {
    #[validate(length(min = 1))]
    pub sheet_number: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub raw_material_id: Uuid,
    pub quantity_kg: Decimal,
    #[serde(default)]
    pub operator_ids: Vec<Uuid>,
    #[serde(default)]
    pub silo_ids: Vec<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PointingFilters {
    pub status: Option<String>,
    pub raw_material_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAttachmentRequest {
    #[validate(length(min = 1))]
    pub name: String,
}

fn map_status_str(status: &str) -> Result<PointingStatus, ServiceError> {
    match status.to_ascii_lowercase().as_str() {
        "open" => Ok(PointingStatus::Open),
        "closed" => Ok(PointingStatus::Closed),
        "voided" => Ok(PointingStatus::Voided),
        other => Err(ServiceError::InvalidStatus(format!(
            "unknown pointing status: {other}"
        ))),
    }
}

/// Create a production pointing; opens its reservation in the same
/// transaction.
#[utoipa::path(
    post,
    path = "/api/v1/production-pointings",
    request_body = CreatePointingRequest,
    responses(
        (status = 201, description = "Pointing created with open reservation"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "production-pointings"
)]
pub async fn create_pointing(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreatePointingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;

    let details = state
        .services
        .production_pointings
        .create(CreatePointingInput {
            sheet_number: payload.sheet_number,
            started_at: payload.started_at,
            ended_at: payload.ended_at,
            raw_material_id: payload.raw_material_id,
            quantity_kg: payload.quantity_kg,
            operator_ids: payload.operator_ids,
            silo_ids: payload.silo_ids,
            notes: payload.notes,
            created_by: actor_id(&auth_user),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(details))))
}

/// Get a pointing with its crew, silos, and reservation.
#[utoipa::path(
    get,
    path = "/api/v1/production-pointings/{id}",
    params(("id" = Uuid, Path, description = "Pointing ID")),
    responses(
        (status = 200, description = "Pointing details"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production-pointings"
)]
pub async fn get_pointing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.production_pointings.get(id).await? {
        Some(details) => Ok(Json(ApiResponse::success(details))),
        None => Err(ServiceError::NotFound(format!(
            "production pointing {} not found",
            id
        ))),
    }
}

/// List pointings with optional status/material filters.
#[utoipa::path(
    get,
    path = "/api/v1/production-pointings",
    params(PointingFilters),
    responses((status = 200, description = "List pointings")),
    tag = "production-pointings"
)]
pub async fn list_pointings(
    State(state): State<AppState>,
    Query(filters): Query<PointingFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = filters.status.as_deref().map(map_status_str).transpose()?;
    let (items, total) = state
        .services
        .production_pointings
        .list(status, filters.raw_material_id, filters.page, filters.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(filters.limit),
        items,
        total,
        page: filters.page,
        limit: filters.limit,
    })))
}

/// Close a pointing.
#[utoipa::path(
    post,
    path = "/api/v1/production-pointings/{id}/close",
    params(("id" = Uuid, Path, description = "Pointing ID")),
    responses(
        (status = 200, description = "Pointing closed"),
        (status = 400, description = "Pointing not open", body = crate::errors::ErrorResponse)
    ),
    tag = "production-pointings"
)]
pub async fn close_pointing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.production_pointings.close(id).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Void a pointing and cancel its reservation.
#[utoipa::path(
    post,
    path = "/api/v1/production-pointings/{id}/void",
    params(("id" = Uuid, Path, description = "Pointing ID")),
    responses(
        (status = 200, description = "Pointing voided, reservation canceled"),
        (status = 400, description = "Pointing not open", body = crate::errors::ErrorResponse)
    ),
    tag = "production-pointings"
)]
pub async fn void_pointing(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .production_pointings
        .void(id, actor_id(&auth_user))
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn create_operator(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttachmentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let operator = state
        .services
        .production_pointings
        .create_operator(payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(operator))))
}

pub async fn list_operators(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let operators = state.services.production_pointings.list_operators().await?;
    Ok(Json(ApiResponse::success(operators)))
}

pub async fn create_silo(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttachmentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let silo = state
        .services
        .production_pointings
        .create_silo(payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(silo))))
}

pub async fn list_silos(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let silos = state.services.production_pointings.list_silos().await?;
    Ok(Json(ApiResponse::success(silos)))
}
