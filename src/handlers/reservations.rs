use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::entities::inventory_reservation::ReservationStatus;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::{ApiResponse, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ConsumeRequest {
    pub quantity_kg: Decimal,
    pub silo_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationFilters {
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

fn map_status_str(status: &str) -> Result<ReservationStatus, ServiceError> {
    match status.to_ascii_lowercase().as_str() {
        "active" => Ok(ReservationStatus::Active),
        "closed" => Ok(ReservationStatus::Closed),
        "canceled" | "cancelled" => Ok(ReservationStatus::Canceled),
        other => Err(ServiceError::InvalidStatus(format!(
            "unknown reservation status: {other}"
        ))),
    }
}

/// Get a reservation by ID.
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.reservations.get(id).await? {
        Some(reservation) => Ok(Json(ApiResponse::success(reservation))),
        None => Err(ServiceError::NotFound(format!(
            "reservation {} not found",
            id
        ))),
    }
}

/// List reservations with optional filters.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    params(ReservationFilters),
    responses((status = 200, description = "List reservations")),
    tag = "reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(filters): Query<ReservationFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = filters.status.as_deref().map(map_status_str).transpose()?;
    let (items, total) = state
        .services
        .reservations
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

/// Draw material against a reservation.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/consume",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = ConsumeRequest,
    responses(
        (status = 200, description = "Consumption recorded"),
        (status = 400, description = "Reservation not active", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn consume_reservation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConsumeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .reservations
        .consume(id, payload.quantity_kg, payload.silo_id, actor_id(&auth_user))
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Cancel a reservation; releases the unconsumed remainder.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation canceled"),
        (status = 400, description = "Reservation not active", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .reservations
        .cancel(id, actor_id(&auth_user))
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Get the reservation anchored to a pointing (1:1).
#[utoipa::path(
    get,
    path = "/api/v1/production-pointings/{id}/reservation",
    params(("id" = Uuid, Path, description = "Pointing ID")),
    responses(
        (status = 200, description = "Reservation for the pointing"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn get_reservation_for_pointing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.reservations.get_by_pointing(id).await? {
        Some(reservation) => Ok(Json(ApiResponse::success(reservation))),
        None => Err(ServiceError::NotFound(format!(
            "no reservation for production pointing {}",
            id
        ))),
    }
}

/// Reservation counts by lifecycle state.
#[utoipa::path(
    get,
    path = "/api/v1/reservations/stats",
    responses((status = 200, description = "Reservation statistics")),
    tag = "reservations"
)]
pub async fn reservation_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let stats = state.services.reservations.stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
