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
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::clients::ClientInput;
use crate::{ApiResponse, AppState, ListQuery, PaginatedResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ClientRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub async fn create_client(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<ClientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let client = state
        .services
        .clients
        .create(
            ClientInput {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
            },
            actor_id(&auth_user),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(client))))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.clients.get(id).await? {
        Some(client) => Ok(Json(ApiResponse::success(client))),
        None => Err(ServiceError::NotFound(format!("client {} not found", id))),
    }
}

pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state.services.clients.list(query.page, query.limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(query.limit),
        items,
        total,
        page: query.page,
        limit: query.limit,
    })))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let client = state
        .services
        .clients
        .update(
            id,
            ClientInput {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(client)))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
