//! Production Pointing Service
//!
//! A pointing is the anchor record of a production run. Creating one is a
//! single transaction: pointing row, operator/silo pivots, and the opening
//! of its inventory reservation commit or roll back together.

use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::inventory_reservation;
use crate::entities::pointing_operator::{self, Entity as PointingOperatorEntity};
use crate::entities::pointing_silo::{self, Entity as PointingSiloEntity};
use crate::entities::production_pointing::{
    self, Entity as PointingEntity, PointingStatus,
};
use crate::entities::raw_material::Entity as RawMaterialEntity;
use crate::entities::{operator, silo, CatalogStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::reservations;

/// Input for creating a production pointing.
#[derive(Debug, Clone)]
pub struct CreatePointingInput {
    pub sheet_number: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub raw_material_id: Uuid,
    pub quantity_kg: Decimal,
    pub operator_ids: Vec<Uuid>,
    pub silo_ids: Vec<Uuid>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

/// A pointing with its attachments and reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointingDetails {
    pub pointing: production_pointing::Model,
    pub operator_ids: Vec<Uuid>,
    pub silo_ids: Vec<Uuid>,
    pub reservation: Option<inventory_reservation::Model>,
}

/// The time window must not run backwards.
pub fn validate_window(
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> Result<(), ServiceError> {
    if ended_at < started_at {
        return Err(ServiceError::ValidationError(
            "ended_at must not precede started_at".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProductionPointingService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ProductionPointingService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Creates the pointing, attaches crew and silos, and opens the
    /// reservation, all in one transaction.
    #[instrument(skip(self, input), fields(sheet_number = %input.sheet_number))]
    pub async fn create(
        &self,
        input: CreatePointingInput,
    ) -> Result<PointingDetails, ServiceError> {
        validate_window(input.started_at, input.ended_at)?;
        if input.quantity_kg <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "quantity_kg must be positive".to_string(),
            ));
        }

        let material = RawMaterialEntity::find_by_id(input.raw_material_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "raw material {} does not exist",
                    input.raw_material_id
                ))
            })?;
        if !material.status.is_active() {
            return Err(ServiceError::ValidationError(format!(
                "raw material '{}' is inactive",
                material.name
            )));
        }

        self.ensure_active_operators(&input.operator_ids).await?;
        self.ensure_active_silos(&input.silo_ids).await?;

        let first_silo = input.silo_ids.first().copied();
        let details = self
            .db
            .transaction::<_, PointingDetails, ServiceError>(move |txn| {
                Box::pin(async move {
                    let pointing = production_pointing::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        sheet_number: Set(input.sheet_number.clone()),
                        started_at: Set(input.started_at),
                        ended_at: Set(input.ended_at),
                        raw_material_id: Set(input.raw_material_id),
                        quantity_kg: Set(input.quantity_kg),
                        status: Set(PointingStatus::Open),
                        notes: Set(input.notes.clone()),
                        created_by: Set(input.created_by),
                        created_at: Set(Utc::now()),
                        updated_at: Set(None),
                    };
                    let pointing = pointing.insert(txn).await.map_err(ServiceError::db_error)?;

                    for operator_id in &input.operator_ids {
                        pointing_operator::ActiveModel {
                            production_pointing_id: Set(pointing.id),
                            operator_id: Set(*operator_id),
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    }
                    for silo_id in &input.silo_ids {
                        pointing_silo::ActiveModel {
                            production_pointing_id: Set(pointing.id),
                            silo_id: Set(*silo_id),
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    }

                    let reservation = reservations::open_in_txn(
                        txn,
                        pointing.id,
                        input.raw_material_id,
                        input.quantity_kg,
                        first_silo,
                        input.created_by,
                    )
                    .await?;

                    Ok(PointingDetails {
                        pointing,
                        operator_ids: input.operator_ids,
                        silo_ids: input.silo_ids,
                        reservation: Some(reservation),
                    })
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        counter!("moldline_production.pointings_created", 1);
        info!(
            pointing_id = %details.pointing.id,
            sheet_number = %details.pointing.sheet_number,
            "created production pointing"
        );

        self.event_sender
            .send(Event::PointingCreated(details.pointing.id))
            .await
            .map_err(ServiceError::EventError)?;
        if let Some(reservation) = &details.reservation {
            self.event_sender
                .send(Event::ReservationOpened {
                    reservation_id: reservation.id,
                    production_pointing_id: details.pointing.id,
                    reserved_kg: reservation.reserved_kg,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(details)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<PointingDetails>, ServiceError> {
        let Some(pointing) = PointingEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(None);
        };

        let operator_ids = PointingOperatorEntity::find()
            .filter(pointing_operator::Column::ProductionPointingId.eq(id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|row| row.operator_id)
            .collect();

        let silo_ids = PointingSiloEntity::find()
            .filter(pointing_silo::Column::ProductionPointingId.eq(id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|row| row.silo_id)
            .collect();

        let reservation = inventory_reservation::Entity::find()
            .filter(inventory_reservation::Column::ProductionPointingId.eq(id))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(Some(PointingDetails {
            pointing,
            operator_ids,
            silo_ids,
            reservation,
        }))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<PointingStatus>,
        raw_material_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<production_pointing::Model>, u64), ServiceError> {
        if page == 0 || limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "invalid pagination parameters".to_string(),
            ));
        }

        let mut query = PointingEntity::find();
        if let Some(status) = status {
            query = query.filter(production_pointing::Column::Status.eq(status));
        }
        if let Some(raw_material_id) = raw_material_id {
            query = query.filter(production_pointing::Column::RawMaterialId.eq(raw_material_id));
        }
        query = query.order_by_desc(production_pointing::Column::StartedAt);

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }

    /// Marks an open pointing closed. The reservation is left as-is:
    /// closing the run does not force full consumption.
    #[instrument(skip(self))]
    pub async fn close(&self, id: Uuid) -> Result<production_pointing::Model, ServiceError> {
        let pointing = self.require_open(id).await?;

        let mut active: production_pointing::ActiveModel = pointing.into();
        active.status = Set(PointingStatus::Closed);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&*self.db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::PointingClosed(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    /// Voids an open pointing and cancels its active reservation in the
    /// same transaction.
    #[instrument(skip(self))]
    pub async fn void(
        &self,
        id: Uuid,
        voided_by: Option<Uuid>,
    ) -> Result<production_pointing::Model, ServiceError> {
        let pointing = self.require_open(id).await?;

        let (updated, canceled_reservation_id) = self
            .db
            .transaction::<_, (production_pointing::Model, Option<Uuid>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let reservation = inventory_reservation::Entity::find()
                            .filter(
                                inventory_reservation::Column::ProductionPointingId
                                    .eq(pointing.id),
                            )
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?;

                        let canceled_id = match reservation {
                            Some(r)
                                if r.status == inventory_reservation::ReservationStatus::Active =>
                            {
                                let canceled =
                                    reservations::cancel_in_txn(txn, r.id, voided_by).await?;
                                Some(canceled.id)
                            }
                            _ => None,
                        };

                        let mut active: production_pointing::ActiveModel = pointing.into();
                        active.status = Set(PointingStatus::Voided);
                        active.updated_at = Set(Some(Utc::now()));
                        let updated =
                            active.update(txn).await.map_err(ServiceError::db_error)?;

                        Ok((updated, canceled_id))
                    })
                },
            )
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        info!(pointing_id = %updated.id, "voided production pointing");

        self.event_sender
            .send(Event::PointingVoided(updated.id))
            .await
            .map_err(ServiceError::EventError)?;
        if let Some(reservation_id) = canceled_reservation_id {
            self.event_sender
                .send(Event::ReservationCanceled(reservation_id))
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(updated)
    }

    // Crew and silo reference data live under this module; they are only
    // ever attached to pointings.

    #[instrument(skip(self))]
    pub async fn create_operator(&self, name: String) -> Result<operator::Model, ServiceError> {
        operator::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            status: Set(CatalogStatus::Active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_operators(&self) -> Result<Vec<operator::Model>, ServiceError> {
        operator::Entity::find()
            .order_by_asc(operator::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn create_silo(&self, name: String) -> Result<silo::Model, ServiceError> {
        silo::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            status: Set(CatalogStatus::Active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_silos(&self) -> Result<Vec<silo::Model>, ServiceError> {
        silo::Entity::find()
            .order_by_asc(silo::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    async fn require_open(&self, id: Uuid) -> Result<production_pointing::Model, ServiceError> {
        let pointing = PointingEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("production pointing {} not found", id))
            })?;

        if pointing.status != PointingStatus::Open {
            return Err(ServiceError::InvalidOperation(format!(
                "production pointing is {}",
                pointing.status.as_str()
            )));
        }
        Ok(pointing)
    }

    async fn ensure_active_operators(&self, ids: &[Uuid]) -> Result<(), ServiceError> {
        for id in ids {
            let found = operator::Entity::find_by_id(*id)
                .one(&*self.db)
                .await
                .map_err(ServiceError::db_error)?;
            match found {
                Some(op) if op.status.is_active() => {}
                Some(op) => {
                    return Err(ServiceError::ValidationError(format!(
                        "operator '{}' is inactive",
                        op.name
                    )))
                }
                None => {
                    return Err(ServiceError::ValidationError(format!(
                        "operator {} does not exist",
                        id
                    )))
                }
            }
        }
        Ok(())
    }

    async fn ensure_active_silos(&self, ids: &[Uuid]) -> Result<(), ServiceError> {
        for id in ids {
            let found = silo::Entity::find_by_id(*id)
                .one(&*self.db)
                .await
                .map_err(ServiceError::db_error)?;
            match found {
                Some(s) if s.status.is_active() => {}
                Some(s) => {
                    return Err(ServiceError::ValidationError(format!(
                        "silo '{}' is inactive",
                        s.name
                    )))
                }
                None => {
                    return Err(ServiceError::ValidationError(format!(
                        "silo {} does not exist",
                        id
                    )))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn window_accepts_equal_endpoints() {
        let now = Utc::now();
        assert!(validate_window(now, now).is_ok());
    }

    #[test]
    fn window_rejects_reversed_endpoints() {
        let now = Utc::now();
        let err = validate_window(now, now - Duration::seconds(1)).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
