//! Moldline API Library
//!
//! Back-office service for a molded/block plastics plant: production
//! pointings, the inventory reservation ledger, yield records, and plant
//! administration.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing_ctx;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::{Ability, AuthRouterExt, Resource};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing_ctx::current_request_id()
                .map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

// Enhanced API routes function
pub fn api_v1_routes() -> Router<AppState> {
    // Raw materials with permission gating
    let raw_materials_read = Router::new()
        .route(
            "/raw-materials",
            get(handlers::raw_materials::list_raw_materials),
        )
        .route(
            "/raw-materials/:id",
            get(handlers::raw_materials::get_raw_material),
        )
        .with_permission(Resource::RawMaterials, Ability::Read);

    let raw_materials_create = Router::new()
        .route(
            "/raw-materials",
            axum::routing::post(handlers::raw_materials::create_raw_material),
        )
        .with_permission(Resource::RawMaterials, Ability::Create);

    let raw_materials_update = Router::new()
        .route(
            "/raw-materials/:id",
            axum::routing::put(handlers::raw_materials::rename_raw_material),
        )
        .route(
            "/raw-materials/:id/deactivate",
            axum::routing::post(handlers::raw_materials::deactivate_raw_material),
        )
        .with_permission(Resource::RawMaterials, Ability::Update);

    // Production pointings (crew and silo catalogs included)
    let pointings_read = Router::new()
        .route(
            "/production-pointings",
            get(handlers::production_pointings::list_pointings),
        )
        .route(
            "/production-pointings/:id",
            get(handlers::production_pointings::get_pointing),
        )
        .route(
            "/operators",
            get(handlers::production_pointings::list_operators),
        )
        .route("/silos", get(handlers::production_pointings::list_silos))
        .with_permission(Resource::ProductionPointings, Ability::Read);

    let pointings_create = Router::new()
        .route(
            "/production-pointings",
            axum::routing::post(handlers::production_pointings::create_pointing),
        )
        .route(
            "/operators",
            axum::routing::post(handlers::production_pointings::create_operator),
        )
        .route(
            "/silos",
            axum::routing::post(handlers::production_pointings::create_silo),
        )
        .with_permission(Resource::ProductionPointings, Ability::Create);

    let pointings_update = Router::new()
        .route(
            "/production-pointings/:id/close",
            axum::routing::post(handlers::production_pointings::close_pointing),
        )
        .route(
            "/production-pointings/:id/void",
            axum::routing::post(handlers::production_pointings::void_pointing),
        )
        .with_permission(Resource::ProductionPointings, Ability::Update);

    // Reservations
    let reservations_read = Router::new()
        .route(
            "/reservations",
            get(handlers::reservations::list_reservations),
        )
        .route(
            "/reservations/stats",
            get(handlers::reservations::reservation_stats),
        )
        .route(
            "/reservations/:id",
            get(handlers::reservations::get_reservation),
        )
        .route(
            "/production-pointings/:id/reservation",
            get(handlers::reservations::get_reservation_for_pointing),
        )
        .with_permission(Resource::Reservations, Ability::Read);

    let reservations_update = Router::new()
        .route(
            "/reservations/:id/consume",
            axum::routing::post(handlers::reservations::consume_reservation),
        )
        .route(
            "/reservations/:id/cancel",
            axum::routing::post(handlers::reservations::cancel_reservation),
        )
        .with_permission(Resource::Reservations, Ability::Update);

    // Movement ledger: append and read only
    let movements_read = Router::new()
        .route("/movements", get(handlers::movements::list_movements))
        .route("/movements/:id", get(handlers::movements::get_movement))
        .with_permission(Resource::Movements, Ability::Read);

    let movements_create = Router::new()
        .route(
            "/movements",
            axum::routing::post(handlers::movements::record_movement),
        )
        .with_permission(Resource::Movements, Ability::Create);

    // Block productions
    let blocks_read = Router::new()
        .route(
            "/block-productions/:id",
            get(handlers::block_productions::get_block_production),
        )
        .route(
            "/production-pointings/:id/block-productions",
            get(handlers::block_productions::list_for_pointing),
        )
        .route(
            "/block-types",
            get(handlers::block_productions::list_block_types),
        )
        .with_permission(Resource::BlockProductions, Ability::Read);

    let blocks_create = Router::new()
        .route(
            "/block-productions",
            axum::routing::post(handlers::block_productions::create_block_production),
        )
        .route(
            "/block-types",
            axum::routing::post(handlers::block_productions::create_block_type),
        )
        .with_permission(Resource::BlockProductions, Ability::Create);

    // Molded productions
    let molded_read = Router::new()
        .route(
            "/molded-productions/:id",
            get(handlers::molded_productions::get_molded_production),
        )
        .route(
            "/molded-productions/:id/scraps",
            get(handlers::molded_productions::list_scraps),
        )
        .route(
            "/production-pointings/:id/molded-productions",
            get(handlers::molded_productions::list_for_pointing),
        )
        .route(
            "/mold-types",
            get(handlers::molded_productions::list_mold_types),
        )
        .with_permission(Resource::MoldedProductions, Ability::Read);

    let molded_create = Router::new()
        .route(
            "/molded-productions",
            axum::routing::post(handlers::molded_productions::create_molded_production),
        )
        .route(
            "/molded-productions/:id/scraps",
            axum::routing::post(handlers::molded_productions::add_scrap),
        )
        .route(
            "/mold-types",
            axum::routing::post(handlers::molded_productions::create_mold_type),
        )
        .with_permission(Resource::MoldedProductions, Ability::Create);

    // Machines and downtime log
    let machines_read = Router::new()
        .route("/machines", get(handlers::machines::list_machines))
        .route("/machines/:id", get(handlers::machines::get_machine))
        .route(
            "/machines/:id/downtimes",
            get(handlers::machines::list_downtimes),
        )
        .with_permission(Resource::Machines, Ability::Read);

    let machines_create = Router::new()
        .route(
            "/machines",
            axum::routing::post(handlers::machines::create_machine),
        )
        .route(
            "/machines/:id/downtimes",
            axum::routing::post(handlers::machines::log_downtime),
        )
        .with_permission(Resource::Machines, Ability::Create);

    let machines_update = Router::new()
        .route(
            "/machines/:id/deactivate",
            axum::routing::post(handlers::machines::deactivate_machine),
        )
        .route(
            "/machines/:id/downtimes/:downtime_id/end",
            axum::routing::put(handlers::machines::end_downtime),
        )
        .with_permission(Resource::Machines, Ability::Update);

    // Orders
    let orders_read = Router::new()
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/:id", get(handlers::orders::get_order))
        .with_permission(Resource::Orders, Ability::Read);

    let orders_create = Router::new()
        .route(
            "/orders",
            axum::routing::post(handlers::orders::create_order),
        )
        .with_permission(Resource::Orders, Ability::Create);

    let orders_update = Router::new()
        .route(
            "/orders/:id/status",
            axum::routing::put(handlers::orders::update_order_status),
        )
        .with_permission(Resource::Orders, Ability::Update);

    let orders_delete = Router::new()
        .route(
            "/orders/:id",
            axum::routing::delete(handlers::orders::delete_order),
        )
        .with_permission(Resource::Orders, Ability::Delete);

    // Products and bill of materials
    let products_read = Router::new()
        .route("/products", get(handlers::products::list_products))
        .route("/products/:id", get(handlers::products::get_product))
        .route(
            "/products/:id/components",
            get(handlers::products::list_components),
        )
        .with_permission(Resource::Products, Ability::Read);

    let products_create = Router::new()
        .route(
            "/products",
            axum::routing::post(handlers::products::create_product),
        )
        .with_permission(Resource::Products, Ability::Create);

    let products_update = Router::new()
        .route(
            "/products/:id/price",
            axum::routing::put(handlers::products::update_product_price),
        )
        .route(
            "/products/:id/deactivate",
            axum::routing::post(handlers::products::deactivate_product),
        )
        .route(
            "/products/:id/components",
            axum::routing::post(handlers::products::add_component),
        )
        .with_permission(Resource::Products, Ability::Update);

    // Clients
    let clients_read = Router::new()
        .route("/clients", get(handlers::clients::list_clients))
        .route("/clients/:id", get(handlers::clients::get_client))
        .with_permission(Resource::Clients, Ability::Read);

    let clients_create = Router::new()
        .route(
            "/clients",
            axum::routing::post(handlers::clients::create_client),
        )
        .with_permission(Resource::Clients, Ability::Create);

    let clients_update = Router::new()
        .route(
            "/clients/:id",
            axum::routing::put(handlers::clients::update_client),
        )
        .with_permission(Resource::Clients, Ability::Update);

    let clients_delete = Router::new()
        .route(
            "/clients/:id",
            axum::routing::delete(handlers::clients::delete_client),
        )
        .with_permission(Resource::Clients, Ability::Delete);

    // Users
    let users_read = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users/:id", get(handlers::users::get_user))
        .with_permission(Resource::Users, Ability::Read);

    let users_create = Router::new()
        .route("/users", axum::routing::post(handlers::users::create_user))
        .with_permission(Resource::Users, Ability::Create);

    let users_update = Router::new()
        .route(
            "/users/:id/role",
            axum::routing::put(handlers::users::set_user_role),
        )
        .route(
            "/users/:id/deactivate",
            axum::routing::post(handlers::users::deactivate_user),
        )
        .with_permission(Resource::Users, Ability::Update);

    let users_delete = Router::new()
        .route(
            "/users/:id",
            axum::routing::delete(handlers::users::delete_user),
        )
        .with_permission(Resource::Users, Ability::Delete);

    // CRM leads
    let leads_read = Router::new()
        .route("/leads", get(handlers::leads::list_leads))
        .route("/leads/:id", get(handlers::leads::get_lead))
        .with_permission(Resource::Leads, Ability::Read);

    let leads_create = Router::new()
        .route("/leads", axum::routing::post(handlers::leads::create_lead))
        .with_permission(Resource::Leads, Ability::Create);

    let leads_update = Router::new()
        .route(
            "/leads/:id/status",
            axum::routing::put(handlers::leads::update_lead_status),
        )
        .with_permission(Resource::Leads, Ability::Update);

    let leads_delete = Router::new()
        .route(
            "/leads/:id",
            axum::routing::delete(handlers::leads::delete_lead),
        )
        .with_permission(Resource::Leads, Ability::Delete);

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Raw materials
        .merge(raw_materials_read)
        .merge(raw_materials_create)
        .merge(raw_materials_update)
        // Production pointings
        .merge(pointings_read)
        .merge(pointings_create)
        .merge(pointings_update)
        // Reservations
        .merge(reservations_read)
        .merge(reservations_update)
        // Movement ledger
        .merge(movements_read)
        .merge(movements_create)
        // Yield records
        .merge(blocks_read)
        .merge(blocks_create)
        .merge(molded_read)
        .merge(molded_create)
        // Machines
        .merge(machines_read)
        .merge(machines_create)
        .merge(machines_update)
        // Orders
        .merge(orders_read)
        .merge(orders_create)
        .merge(orders_update)
        .merge(orders_delete)
        // Products
        .merge(products_read)
        .merge(products_create)
        .merge(products_update)
        // Clients
        .merge(clients_read)
        .merge(clients_create)
        .merge(clients_update)
        .merge(clients_delete)
        // Users
        .merge(users_read)
        .merge(users_create)
        .merge(users_update)
        .merge(users_delete)
        // CRM leads
        .merge(leads_read)
        .merge(leads_create)
        .merge(leads_update)
        .merge(leads_delete)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "moldline-api",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response = crate::tracing_ctx::scope_request_id(
            crate::tracing_ctx::RequestId::new("meta-123"),
            async { ApiResponse::success("ok") },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response = crate::tracing_ctx::scope_request_id(
            crate::tracing_ctx::RequestId::new("meta-err"),
            async { ApiResponse::<()>::error("oops".into()) },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }
}
