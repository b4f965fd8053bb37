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
use crate::entities::lead::LeadStatus;
use crate::errors::ServiceError;
use crate::handlers::actor_id;
use crate::services::leads::CreateLeadInput;
use crate::{ApiResponse, AppState, PaginatedResponse};

fn map_status_str(status: &str) -> Result<LeadStatus, ServiceError> {
    match status.to_ascii_lowercase().as_str() {
        "new" => Ok(LeadStatus::New),
        "contacted" => Ok(LeadStatus::Contacted),
        "qualified" => Ok(LeadStatus::Qualified),
        "lost" => Ok(LeadStatus::Lost),
        other => Err(ServiceError::InvalidStatus(format!(
            "unknown lead status: {other}"
        ))),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub estimated_value: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateLeadStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeadFilters {
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

pub async fn create_lead(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateLeadRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let lead = state
        .services
        .leads
        .create(CreateLeadInput {
            name: payload.name,
            company: payload.company,
            email: payload.email,
            estimated_value: payload.estimated_value,
            notes: payload.notes,
            created_by: actor_id(&auth_user),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(lead))))
}

pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.leads.get(id).await? {
        Some(lead) => Ok(Json(ApiResponse::success(lead))),
        None => Err(ServiceError::NotFound(format!("lead {} not found", id))),
    }
}

pub async fn list_leads(
    State(state): State<AppState>,
    Query(filters): Query<LeadFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = filters.status.as_deref().map(map_status_str).transpose()?;
    let (items, total) = state
        .services
        .leads
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

pub async fn update_lead_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = map_status_str(&payload.status)?;
    let lead = state.services.leads.update_status(id, status).await?;
    Ok(Json(ApiResponse::success(lead)))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.leads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
