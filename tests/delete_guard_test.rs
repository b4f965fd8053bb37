//! Deletion guards: records that anchor other records cannot be removed.
//! Exercised against a mock database; the guards fire before any delete
//! statement is issued.

use std::collections::BTreeMap;
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use moldline_api::entities::client;
use moldline_api::entities::order::{self, OrderStatus};
use moldline_api::entities::user::{self, UserRole};
use moldline_api::entities::CatalogStatus;
use moldline_api::errors::ServiceError;
use moldline_api::events;
use moldline_api::services::clients::{ClientService, DELETE_BLOCKED_HAS_ORDERS};
use moldline_api::services::orders::{OrderService, DELETE_BLOCKED_NOT_PENDING};
use moldline_api::services::users::{UserService, DELETE_BLOCKED_HAS_RELATED_RECORDS};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

fn confirmed_order(id: Uuid) -> order::Model {
    order::Model {
        id,
        order_number: "ORD-TEST".to_string(),
        client_id: Uuid::new_v4(),
        status: OrderStatus::Confirmed,
        total_amount: dec!(1200.00),
        notes: None,
        created_by: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[tokio::test]
async fn deleting_non_pending_order_is_blocked() {
    let order_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![confirmed_order(order_id)]])
        .into_connection();
    let (event_sender, _rx) = events::channel(8);
    let service = OrderService::new(Arc::new(db), event_sender);

    let err = service.delete(order_id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(ref msg) if msg == DELETE_BLOCKED_NOT_PENDING);
}

#[tokio::test]
async fn deleting_missing_order_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<order::Model>::new()])
        .into_connection();
    let (event_sender, _rx) = events::channel(8);
    let service = OrderService::new(Arc::new(db), event_sender);

    let err = service.delete(Uuid::new_v4()).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn deleting_user_with_related_records_is_blocked() {
    let user_id = Uuid::new_v4();
    let model = user::Model {
        id: user_id,
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        role: UserRole::Manager,
        active: true,
        created_at: Utc::now(),
        updated_at: None,
    };

    // One owned client is enough to block, regardless of the other counts.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .append_query_results([
            vec![count_row(1)],
            vec![count_row(0)],
            vec![count_row(0)],
        ])
        .into_connection();
    let (event_sender, _rx) = events::channel(8);
    let service = UserService::new(Arc::new(db), event_sender);

    let err = service.delete(user_id).await.unwrap_err();
    assert_matches!(
        err,
        ServiceError::InvalidOperation(ref msg) if msg == DELETE_BLOCKED_HAS_RELATED_RECORDS
    );
}

#[tokio::test]
async fn deleting_client_with_orders_is_blocked() {
    let client_id = Uuid::new_v4();
    let model = client::Model {
        id: client_id,
        name: "Acme Foam".to_string(),
        email: None,
        phone: None,
        status: CatalogStatus::Active,
        created_by: None,
        created_at: Utc::now(),
        updated_at: None,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .append_query_results([vec![count_row(3)]])
        .into_connection();
    let (event_sender, _rx) = events::channel(8);
    let service = ClientService::new(Arc::new(db), event_sender);

    let err = service.delete(client_id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(ref msg) if msg == DELETE_BLOCKED_HAS_ORDERS);
}
