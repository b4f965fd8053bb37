use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::order::OrderStatus;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::orders::{CreateOrderInput, NewOrderItem};
use crate::{ApiResponse, AppState, PaginatedResponse};

fn map_status_str(status: &str) -> Result<OrderStatus, ServiceError> {
    match status.to_ascii_lowercase().as_str() {
        "pending" => Ok(OrderStatus::Pending),
        "confirmed" => Ok(OrderStatus::Confirmed),
        "in_production" => Ok(OrderStatus::InProduction),
        "delivered" => Ok(OrderStatus::Delivered),
        "cancelled" | "canceled" => Ok(OrderStatus::Canceled),
        other => Err(ServiceError::InvalidStatus(format!(
            "unknown order status: {other}"
        ))),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    pub order_number: Option<String>,
    pub client_id: Uuid,
    #[validate(length(min = 1))]
    pub items: Vec<CreateOrderItem>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderItem {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderFilters {
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
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

pub async fn create_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;

    let (order, items) = state
        .services
        .orders
        .create(CreateOrderInput {
            order_number: payload.order_number,
            client_id: payload.client_id,
            items: payload
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
            notes: payload.notes,
            created_by: actor_id(&auth_user),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(serde_json::json!({
            "order": order,
            "items": items,
        }))),
    ))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.orders.get(id).await? {
        Some(order) => {
            let items = state.services.orders.get_items(order.id).await?;
            Ok(Json(ApiResponse::success(serde_json::json!({
                "order": order,
                "items": items,
            }))))
        }
        None => Err(ServiceError::NotFound(format!("order {} not found", id))),
    }
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(filters): Query<OrderFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = filters.status.as_deref().map(map_status_str).transpose()?;
    let (items, total) = state
        .services
        .orders
        .list(status, filters.client_id, filters.page, filters.limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(filters.limit),
        items,
        total,
        page: filters.page,
        limit: filters.limit,
    })))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let next = map_status_str(&payload.status)?;
    let updated = state.services.orders.update_status(id, next).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
