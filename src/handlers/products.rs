use axum::{
    extract::{Path, Query, State},
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
use crate::entities::CatalogStatus;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::products::CreateProductInput;
use crate::{ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePriceRequest {
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddComponentRequest {
    pub component_product_id: Uuid,
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductFilters {
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

pub async fn create_product(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let product = state
        .services
        .products
        .create(CreateProductInput {
            name: payload.name,
            sku: payload.sku,
            unit_price: payload.unit_price,
            created_by: actor_id(&auth_user),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.products.get(id).await? {
        Some(product) => Ok(Json(ApiResponse::success(product))),
        None => Err(ServiceError::NotFound(format!("product {} not found", id))),
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = filters.status.as_deref().map(map_status_str).transpose()?;
    let (items, total) = state
        .services
        .products
        .list(status, filters.page, filters.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(filters.limit),
        items,
        total,
        page: filters.page,
        limit: filters.limit,
    })))
}

pub async fn update_product_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePriceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state
        .services
        .products
        .update_price(id, payload.unit_price)
        .await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn deactivate_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.services.products.deactivate(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn add_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddComponentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let component = state
        .services
        .products
        .add_component(id, payload.component_product_id, payload.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(component))))
}

pub async fn list_components(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let components = state.services.products.list_components(id).await?;
    Ok(Json(ApiResponse::success(components)))
}
