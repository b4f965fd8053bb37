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

use crate::entities::user::UserRole;
use crate::errors::ServiceError;
use crate::{ApiResponse, AppState, ListQuery, PaginatedResponse};

fn map_role_str(role: &str) -> Result<UserRole, ServiceError> {
    match role.to_ascii_lowercase().as_str() {
        "admin" => Ok(UserRole::Admin),
        "manager" => Ok(UserRole::Manager),
        "operator" => Ok(UserRole::Operator),
        other => Err(ServiceError::InvalidInput(format!(
            "unknown role: {other}"
        ))),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetRoleRequest {
    pub role: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let role = map_role_str(&payload.role)?;
    let user = state
        .services
        .users
        .create(payload.name, payload.email, role)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.users.get(id).await? {
        Some(user) => Ok(Json(ApiResponse::success(user))),
        None => Err(ServiceError::NotFound(format!("user {} not found", id))),
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state.services.users.list(query.page, query.limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(query.limit),
        items,
        total,
        page: query.page,
        limit: query.limit,
    })))
}

pub async fn set_user_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let role = map_role_str(&payload.role)?;
    let user = state.services.users.set_role(id, role).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.deactivate(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
