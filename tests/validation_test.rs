//! Boundary validation that fires before any database access.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use moldline_api::entities::inventory_movement::{ItemType, LocationType, MovementDirection};
use moldline_api::errors::ServiceError;
use moldline_api::events;
use moldline_api::services::movements::{MovementService, NewMovement};
use moldline_api::services::production_pointings::{
    CreatePointingInput, ProductionPointingService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
    Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

fn pointing_input() -> CreatePointingInput {
    let now = Utc::now();
    CreatePointingInput {
        sheet_number: "SH-100".to_string(),
        started_at: now,
        ended_at: now + Duration::hours(8),
        raw_material_id: Uuid::new_v4(),
        quantity_kg: dec!(500),
        operator_ids: vec![],
        silo_ids: vec![],
        notes: None,
        created_by: None,
    }
}

#[tokio::test]
async fn pointing_with_reversed_window_is_rejected() {
    let (event_sender, _rx) = events::channel(8);
    let service = ProductionPointingService::new(empty_db(), event_sender);

    let mut input = pointing_input();
    input.ended_at = input.started_at - Duration::minutes(1);

    let err = service.create(input).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn pointing_window_with_equal_endpoints_passes_window_validation() {
    // Equal start and end is allowed; the create then fails on the raw
    // material lookup because the mock database returns nothing, which is
    // exactly the next validation in line.
    let (event_sender, _rx) = events::channel(8);
    let service = ProductionPointingService::new(
        Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<moldline_api::entities::raw_material::Model>::new()])
                .into_connection(),
        ),
        event_sender,
    );

    let mut input = pointing_input();
    input.ended_at = input.started_at;

    let err = service.create(input).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(ref msg) if msg.contains("raw material"));
}

#[tokio::test]
async fn pointing_with_non_positive_quantity_is_rejected() {
    let (event_sender, _rx) = events::channel(8);
    let service = ProductionPointingService::new(empty_db(), event_sender);

    let mut input = pointing_input();
    input.quantity_kg = Decimal::ZERO;

    let err = service.create(input).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(ref msg) if msg.contains("quantity"));
}

#[tokio::test]
async fn movement_with_non_positive_quantity_is_rejected() {
    let (event_sender, _rx) = events::channel(8);
    let service = MovementService::new(empty_db(), event_sender);

    for quantity in [Decimal::ZERO, dec!(-5)] {
        let err = service
            .record(NewMovement {
                occurred_at: Utc::now(),
                item_type: ItemType::RawMaterial,
                item_id: Uuid::new_v4(),
                location_type: LocationType::Silo,
                location_id: None,
                direction: MovementDirection::Out,
                quantity,
                unit: "kg".to_string(),
                reference_type: None,
                reference_id: None,
                created_by: None,
            })
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(_));
    }
}

#[tokio::test]
async fn reservation_consume_rejects_non_positive_quantity() {
    let (event_sender, _rx) = events::channel(8);
    let service = moldline_api::services::reservations::ReservationService::new(
        empty_db(),
        event_sender,
    );

    let err = service
        .consume(Uuid::new_v4(), Decimal::ZERO, None, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}
