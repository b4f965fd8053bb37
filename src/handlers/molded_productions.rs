use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::molded_productions::CreateMoldedProductionInput;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateMoldedProductionRequest {
    pub production_pointing_id: Uuid,
    pub mold_type_id: Uuid,
    pub quantity: i32,
    pub package_weight: Decimal,
    pub package_quantity: i32,
    #[serde(default)]
    pub loss_factor_enabled: bool,
    #[serde(default)]
    pub loss_factor: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddScrapRequest {
    pub quantity: i32,
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateMoldTypeRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub cavity_count: i32,
}

/// Record a molded batch; unit and total considered weights are derived
/// and persisted.
#[utoipa::path(
    post,
    path = "/api/v1/molded-productions",
    request_body = CreateMoldedProductionRequest,
    responses(
        (status = 201, description = "Molded batch recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "molded-productions"
)]
pub async fn create_molded_production(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateMoldedProductionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .services
        .molded_productions
        .create(CreateMoldedProductionInput {
            production_pointing_id: payload.production_pointing_id,
            mold_type_id: payload.mold_type_id,
            quantity: payload.quantity,
            package_weight: payload.package_weight,
            package_quantity: payload.package_quantity,
            loss_factor_enabled: payload.loss_factor_enabled,
            loss_factor: payload.loss_factor,
            created_by: actor_id(&auth_user),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

/// Get a molded batch.
#[utoipa::path(
    get,
    path = "/api/v1/molded-productions/{id}",
    params(("id" = Uuid, Path, description = "Molded production ID")),
    responses(
        (status = 200, description = "Molded batch"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "molded-productions"
)]
pub async fn get_molded_production(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.molded_productions.get(id).await? {
        Some(record) => Ok(Json(ApiResponse::success(record))),
        None => Err(ServiceError::NotFound(format!(
            "molded production {} not found",
            id
        ))),
    }
}

/// List molded batches for a pointing.
#[utoipa::path(
    get,
    path = "/api/v1/production-pointings/{id}/molded-productions",
    params(("id" = Uuid, Path, description = "Pointing ID")),
    responses((status = 200, description = "Molded batches")),
    tag = "molded-productions"
)]
pub async fn list_for_pointing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let records = state
        .services
        .molded_productions
        .list_by_pointing(id)
        .await?;
    Ok(Json(ApiResponse::success(records)))
}

/// Record scrap against a molded batch.
#[utoipa::path(
    post,
    path = "/api/v1/molded-productions/{id}/scraps",
    params(("id" = Uuid, Path, description = "Molded production ID")),
    request_body = AddScrapRequest,
    responses(
        (status = 201, description = "Scrap recorded"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "molded-productions"
)]
pub async fn add_scrap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddScrapRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let scrap = state
        .services
        .molded_productions
        .add_scrap(id, payload.quantity, payload.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(scrap))))
}

pub async fn list_scraps(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let scraps = state.services.molded_productions.list_scraps(id).await?;
    Ok(Json(ApiResponse::success(scraps)))
}

pub async fn create_mold_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateMoldTypeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let mold_type = state
        .services
        .molded_productions
        .create_mold_type(payload.name, payload.cavity_count)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(mold_type))))
}

pub async fn list_mold_types(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mold_types = state.services.molded_productions.list_mold_types().await?;
    Ok(Json(ApiResponse::success(mold_types)))
}
