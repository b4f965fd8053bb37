use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::CatalogStatus;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::{ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RawMaterialRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RawMaterialFilters {
    pub status: Option<String>,
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

fn map_status_str(status: &str) -> Result<CatalogStatus, ServiceError> {
    match status.to_ascii_lowercase().as_str() {
        "active" => Ok(CatalogStatus::Active),
        "inactive" => Ok(CatalogStatus::Inactive),
        other => Err(ServiceError::InvalidStatus(format!(
            "unknown status: {other}"
        ))),
    }
}

pub async fn create_raw_material(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<RawMaterialRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let material = state
        .services
        .raw_materials
        .create(payload.name, actor_id(&auth_user))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(material))))
}

pub async fn get_raw_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.raw_materials.get(id).await? {
        Some(material) => Ok(Json(ApiResponse::success(material))),
        None => Err(ServiceError::NotFound(format!(
            "raw material {} not found",
            id
        ))),
    }
}

pub async fn list_raw_materials(
    State(state): State<AppState>,
    Query(query): Query<RawMaterialFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = query.status.as_deref().map(map_status_str).transpose()?;
    let (items, total) = state
        .services
        .raw_materials
        .list(status, query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(query.limit),
        items,
        total,
        page: query.page,
        limit: query.limit,
    })))
}

pub async fn rename_raw_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RawMaterialRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let material = state.services.raw_materials.rename(id, payload.name).await?;
    Ok(Json(ApiResponse::success(material)))
}

pub async fn deactivate_raw_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let material = state.services.raw_materials.deactivate(id).await?;
    Ok(Json(ApiResponse::success(material)))
}
