use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::block_productions::CreateBlockProductionInput;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBlockProductionRequest {
    pub production_pointing_id: Uuid,
    pub block_type_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub weight_kg: Decimal,
    pub length_mm: i32,
    pub width_mm: i32,
    pub height_mm: i32,
    #[serde(default)]
    pub is_scrap: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBlockTypeRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub density_kg_m3: Decimal,
}

/// Record a block batch against a pointing.
#[utoipa::path(
    post,
    path = "/api/v1/block-productions",
    request_body = CreateBlockProductionRequest,
    responses(
        (status = 201, description = "Block batch recorded with derived weight figures"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "block-productions"
)]
pub async fn create_block_production(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateBlockProductionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let details = state
        .services
        .block_productions
        .create(CreateBlockProductionInput {
            production_pointing_id: payload.production_pointing_id,
            block_type_id: payload.block_type_id,
            started_at: payload.started_at,
            ended_at: payload.ended_at,
            weight_kg: payload.weight_kg,
            length_mm: payload.length_mm,
            width_mm: payload.width_mm,
            height_mm: payload.height_mm,
            is_scrap: payload.is_scrap,
            created_by: actor_id(&auth_user),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(details))))
}

/// Get a block batch with derived deviation figures.
#[utoipa::path(
    get,
    path = "/api/v1/block-productions/{id}",
    params(("id" = Uuid, Path, description = "Block production ID")),
    responses(
        (status = 200, description = "Block batch"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "block-productions"
)]
pub async fn get_block_production(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.block_productions.get(id).await? {
        Some(details) => Ok(Json(ApiResponse::success(details))),
        None => Err(ServiceError::NotFound(format!(
            "block production {} not found",
            id
        ))),
    }
}

/// List block batches for a pointing.
#[utoipa::path(
    get,
    path = "/api/v1/production-pointings/{id}/block-productions",
    params(("id" = Uuid, Path, description = "Pointing ID")),
    responses((status = 200, description = "Block batches")),
    tag = "block-productions"
)]
pub async fn list_for_pointing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let records = state.services.block_productions.list_by_pointing(id).await?;
    Ok(Json(ApiResponse::success(records)))
}

pub async fn create_block_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateBlockTypeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let block_type = state
        .services
        .block_productions
        .create_block_type(payload.name, payload.density_kg_m3)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(block_type))))
}

pub async fn list_block_types(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let block_types = state.services.block_productions.list_block_types().await?;
    Ok(Json(ApiResponse::success(block_types)))
}
