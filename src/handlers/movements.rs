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

use crate::auth::AuthUser;
use crate::entities::inventory_movement::{ItemType, LocationType, MovementDirection};
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::movements::{MovementFilter, NewMovement};
use crate::{ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RecordMovementRequest {
    pub occurred_at: Option<DateTime<Utc>>,
    pub item_type: String,
    pub item_id: Uuid,
    pub location_type: String,
    pub location_id: Option<Uuid>,
    pub direction: String,
    pub quantity: Decimal,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
}

fn default_unit() -> String {
    "kg".to_string()
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovementQuery {
    pub item_type: Option<String>,
    pub item_id: Option<Uuid>,
    pub direction: Option<String>,
    pub occurred_from: Option<DateTime<Utc>>,
    pub occurred_to: Option<DateTime<Utc>>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    50
}

fn map_item_type(raw: &str) -> Result<ItemType, ServiceError> {
    match raw.to_ascii_lowercase().as_str() {
        "raw_material" => Ok(ItemType::RawMaterial),
        "product" => Ok(ItemType::Product),
        other => Err(ServiceError::InvalidInput(format!(
            "unknown item type: {other}"
        ))),
    }
}

fn map_location_type(raw: &str) -> Result<LocationType, ServiceError> {
    match raw.to_ascii_lowercase().as_str() {
        "silo" => Ok(LocationType::Silo),
        "warehouse" => Ok(LocationType::Warehouse),
        other => Err(ServiceError::InvalidInput(format!(
            "unknown location type: {other}"
        ))),
    }
}

fn map_direction(raw: &str) -> Result<MovementDirection, ServiceError> {
    match raw.to_ascii_lowercase().as_str() {
        "in" => Ok(MovementDirection::In),
        "out" => Ok(MovementDirection::Out),
        "reserve" => Ok(MovementDirection::Reserve),
        "release" => Ok(MovementDirection::Release),
        "adjust" => Ok(MovementDirection::Adjust),
        other => Err(ServiceError::InvalidInput(format!(
            "unknown movement direction: {other}"
        ))),
    }
}

/// Append one movement to the ledger. The ledger exposes no update or
/// delete routes.
#[utoipa::path(
    post,
    path = "/api/v1/movements",
    request_body = RecordMovementRequest,
    responses(
        (status = 201, description = "Movement recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<RecordMovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let movement = state
        .services
        .movements
        .record(NewMovement {
            occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
            item_type: map_item_type(&payload.item_type)?,
            item_id: payload.item_id,
            location_type: map_location_type(&payload.location_type)?,
            location_id: payload.location_id,
            direction: map_direction(&payload.direction)?,
            quantity: payload.quantity,
            unit: payload.unit,
            reference_type: payload.reference_type,
            reference_id: payload.reference_id,
            created_by: actor_id(&auth_user),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(movement))))
}

/// Get one ledger entry.
#[utoipa::path(
    get,
    path = "/api/v1/movements/{id}",
    params(("id" = Uuid, Path, description = "Movement ID")),
    responses(
        (status = 200, description = "Movement"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.movements.get(id).await? {
        Some(movement) => Ok(Json(ApiResponse::success(movement))),
        None => Err(ServiceError::NotFound(format!("movement {} not found", id))),
    }
}

/// List ledger entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/movements",
    params(MovementQuery),
    responses((status = 200, description = "List movements")),
    tag = "movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = MovementFilter {
        item_type: query.item_type.as_deref().map(map_item_type).transpose()?,
        item_id: query.item_id,
        direction: query.direction.as_deref().map(map_direction).transpose()?,
        occurred_from: query.occurred_from,
        occurred_to: query.occurred_to,
    };

    let (items, total) = state
        .services
        .movements
        .list(filter, query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(query.limit),
        items,
        total,
        page: query.page,
        limit: query.limit,
    })))
}
