//! OpenAPI documentation for the inventory/production core.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "moldline-api",
        description = "Manufacturing back-office API: production pointings, inventory reservations, movement ledger, and yield records.",
    ),
    paths(
        crate::handlers::production_pointings::create_pointing,
        crate::handlers::production_pointings::get_pointing,
        crate::handlers::production_pointings::list_pointings,
        crate::handlers::production_pointings::close_pointing,
        crate::handlers::production_pointings::void_pointing,
        crate::handlers::reservations::get_reservation,
        crate::handlers::reservations::get_reservation_for_pointing,
        crate::handlers::reservations::list_reservations,
        crate::handlers::reservations::consume_reservation,
        crate::handlers::reservations::cancel_reservation,
        crate::handlers::reservations::reservation_stats,
        crate::handlers::movements::record_movement,
        crate::handlers::movements::get_movement,
        crate::handlers::movements::list_movements,
        crate::handlers::block_productions::create_block_production,
        crate::handlers::block_productions::get_block_production,
        crate::handlers::block_productions::list_for_pointing,
        crate::handlers::molded_productions::create_molded_production,
        crate::handlers::molded_productions::get_molded_production,
        crate::handlers::molded_productions::list_for_pointing,
        crate::handlers::molded_productions::add_scrap,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::production_pointings::CreatePointingRequest,
        crate::handlers::reservations::ConsumeRequest,
        crate::handlers::movements::RecordMovementRequest,
        crate::handlers::block_productions::CreateBlockProductionRequest,
        crate::handlers::molded_productions::CreateMoldedProductionRequest,
        crate::handlers::molded_productions::AddScrapRequest,
    )),
    tags(
        (name = "production-pointings", description = "Production run records"),
        (name = "reservations", description = "Raw material soft holds"),
        (name = "movements", description = "Append-only inventory ledger"),
        (name = "block-productions", description = "Block yield records"),
        (name = "molded-productions", description = "Molded yield records"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the spec at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
