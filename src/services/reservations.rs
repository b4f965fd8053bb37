//! Inventory Reservation Service
//!
//! Lifecycle of the soft hold opened for each production pointing:
//! open at pointing creation, accumulate consumption from `out` movements,
//! close when fully consumed, cancel when the pointing is voided.
//!
//! Concurrent consumes against one reservation can race on `consumed_kg`;
//! no lock is taken. The intended `consumed_kg <= reserved_kg` ceiling is
//! not enforced anywhere in the consume path.

use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::inventory_movement::{ItemType, LocationType, MovementDirection};
use crate::entities::inventory_reservation::{
    self, status_after_consume, Entity as ReservationEntity, ReservationStatus,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::movements::{insert_movement, NewMovement};

const RESERVATION_REFERENCE: &str = "inventory_reservation";

/// Counts per lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStats {
    pub total: u64,
    pub active: u64,
    pub closed: u64,
    pub canceled: u64,
}

/// Opens the reservation for a freshly created pointing on an open
/// transaction, together with its `reserve` ledger entry.
pub(crate) async fn open_in_txn<C>(
    txn: &C,
    production_pointing_id: Uuid,
    raw_material_id: Uuid,
    reserved_kg: Decimal,
    silo_id: Option<Uuid>,
    created_by: Option<Uuid>,
) -> Result<inventory_reservation::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let reservation = inventory_reservation::ActiveModel {
        production_pointing_id: Set(production_pointing_id),
        raw_material_id: Set(raw_material_id),
        reserved_kg: Set(reserved_kg),
        consumed_kg: Set(Decimal::ZERO),
        status: Set(ReservationStatus::Active),
        ..Default::default()
    };
    let reservation = reservation.insert(txn).await.map_err(ServiceError::db_error)?;

    insert_movement(
        txn,
        NewMovement {
            occurred_at: Utc::now(),
            item_type: ItemType::RawMaterial,
            item_id: raw_material_id,
            location_type: LocationType::Silo,
            location_id: silo_id,
            direction: MovementDirection::Reserve,
            quantity: reserved_kg,
            unit: "kg".to_string(),
            reference_type: Some(RESERVATION_REFERENCE.to_string()),
            reference_id: Some(reservation.id),
            created_by,
        },
    )
    .await?;

    Ok(reservation)
}

#[derive(Clone)]
pub struct ReservationService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ReservationService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<inventory_reservation::Model>, ServiceError> {
        ReservationEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_by_pointing(
        &self,
        production_pointing_id: Uuid,
    ) -> Result<Option<inventory_reservation::Model>, ServiceError> {
        ReservationEntity::find()
            .filter(
                inventory_reservation::Column::ProductionPointingId.eq(production_pointing_id),
            )
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<ReservationStatus>,
        raw_material_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<inventory_reservation::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "page number must be greater than 0".to_string(),
            ));
        }
        if limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "limit must be between 1 and 1000".to_string(),
            ));
        }

        let mut query = ReservationEntity::find();
        if let Some(status) = status {
            query = query.filter(inventory_reservation::Column::Status.eq(status));
        }
        if let Some(raw_material_id) = raw_material_id {
            query = query.filter(inventory_reservation::Column::RawMaterialId.eq(raw_material_id));
        }
        query = query.order_by_desc(inventory_reservation::Column::CreatedAt);

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }

    /// Draws material against a reservation: appends an `out` movement and
    /// accumulates `consumed_kg` in one transaction. Reaching or passing
    /// `reserved_kg` closes the reservation.
    ///
    /// There is no ceiling check: a draw larger than the remainder is
    /// accepted and leaves `consumed_kg > reserved_kg`.
    #[instrument(skip(self))]
    pub async fn consume(
        &self,
        reservation_id: Uuid,
        quantity_kg: Decimal,
        silo_id: Option<Uuid>,
        consumed_by: Option<Uuid>,
    ) -> Result<inventory_reservation::Model, ServiceError> {
        if quantity_kg <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "consumed quantity must be positive".to_string(),
            ));
        }

        let updated = self
            .db
            .transaction::<_, inventory_reservation::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let reservation = ReservationEntity::find_by_id(reservation_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "reservation {} not found",
                                reservation_id
                            ))
                        })?;

                    if reservation.status != ReservationStatus::Active {
                        return Err(ServiceError::InvalidOperation(format!(
                            "cannot consume on a {} reservation",
                            reservation.status.as_str()
                        )));
                    }

                    insert_movement(
                        txn,
                        NewMovement {
                            occurred_at: Utc::now(),
                            item_type: ItemType::RawMaterial,
                            item_id: reservation.raw_material_id,
                            location_type: LocationType::Silo,
                            location_id: silo_id,
                            direction: MovementDirection::Out,
                            quantity: quantity_kg,
                            unit: "kg".to_string(),
                            reference_type: Some(RESERVATION_REFERENCE.to_string()),
                            reference_id: Some(reservation.id),
                            created_by: consumed_by,
                        },
                    )
                    .await?;

                    let consumed_total = reservation.consumed_kg + quantity_kg;
                    let next_status =
                        status_after_consume(reservation.reserved_kg, consumed_total);

                    let mut active: inventory_reservation::ActiveModel = reservation.into();
                    active.consumed_kg = Set(consumed_total);
                    active.status = Set(next_status);
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        counter!("moldline_inventory.reservation_consumed", 1);
        info!(
            reservation_id = %updated.id,
            consumed_kg = %updated.consumed_kg,
            reserved_kg = %updated.reserved_kg,
            status = updated.status.as_str(),
            "consumed against reservation"
        );

        self.event_sender
            .send(Event::ReservationConsumed {
                reservation_id: updated.id,
                quantity_kg,
                consumed_total_kg: updated.consumed_kg,
            })
            .await
            .map_err(ServiceError::EventError)?;

        if updated.status == ReservationStatus::Closed {
            self.event_sender
                .send(Event::ReservationClosed(updated.id))
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(updated)
    }

    /// Cancels an active reservation. Consumed totals are untouched; the
    /// unconsumed remainder is released back to the ledger.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        reservation_id: Uuid,
        canceled_by: Option<Uuid>,
    ) -> Result<inventory_reservation::Model, ServiceError> {
        let updated = self
            .db
            .transaction::<_, inventory_reservation::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    cancel_in_txn(txn, reservation_id, canceled_by).await
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        info!(reservation_id = %updated.id, "canceled reservation");

        self.event_sender
            .send(Event::ReservationCanceled(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<ReservationStats, ServiceError> {
        let db = &*self.db;

        let total = ReservationEntity::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut by_status = [0u64; 3];
        for (i, status) in [
            ReservationStatus::Active,
            ReservationStatus::Closed,
            ReservationStatus::Canceled,
        ]
        .into_iter()
        .enumerate()
        {
            by_status[i] = ReservationEntity::find()
                .filter(inventory_reservation::Column::Status.eq(status))
                .count(db)
                .await
                .map_err(ServiceError::db_error)?;
        }

        Ok(ReservationStats {
            total,
            active: by_status[0],
            closed: by_status[1],
            canceled: by_status[2],
        })
    }
}

/// Cancel body shared with the pointing void flow.
pub(crate) async fn cancel_in_txn<C>(
    txn: &C,
    reservation_id: Uuid,
    canceled_by: Option<Uuid>,
) -> Result<inventory_reservation::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let reservation = ReservationEntity::find_by_id(reservation_id)
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("reservation {} not found", reservation_id))
        })?;

    if reservation.status != ReservationStatus::Active {
        return Err(ServiceError::InvalidOperation(format!(
            "cannot cancel a {} reservation",
            reservation.status.as_str()
        )));
    }

    let remaining = reservation.remaining_kg();
    if remaining > Decimal::ZERO {
        insert_movement(
            txn,
            NewMovement {
                occurred_at: Utc::now(),
                item_type: ItemType::RawMaterial,
                item_id: reservation.raw_material_id,
                location_type: LocationType::Silo,
                location_id: None,
                direction: MovementDirection::Release,
                quantity: remaining,
                unit: "kg".to_string(),
                reference_type: Some(RESERVATION_REFERENCE.to_string()),
                reference_id: Some(reservation.id),
                created_by: canceled_by,
            },
        )
        .await?;
    }

    let mut active: inventory_reservation::ActiveModel = reservation.into();
    active.status = Set(ReservationStatus::Canceled);
    active.update(txn).await.map_err(ServiceError::db_error)
}
