//! Molded Production Service
//!
//! Molded batches produced against a pointing. The considered unit weight
//! and batch total are derived once at creation and persisted with the
//! record.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::mold_type::{self, Entity as MoldTypeEntity};
use crate::entities::molded_production::{self, Entity as MoldedProductionEntity};
use crate::entities::molded_production_scrap::{self, Entity as ScrapEntity};
use crate::entities::production_pointing::{Entity as PointingEntity, PointingStatus};
use crate::entities::CatalogStatus;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Input for recording a molded batch.
#[derive(Debug, Clone)]
pub struct CreateMoldedProductionInput {
    pub production_pointing_id: Uuid,
    pub mold_type_id: Uuid,
    pub quantity: i32,
    pub package_weight: Decimal,
    pub package_quantity: i32,
    pub loss_factor_enabled: bool,
    pub loss_factor: Decimal,
    pub created_by: Option<Uuid>,
}

/// Unit weight considered for one piece: package weight split across the
/// package, minus the configured loss share when enabled.
pub fn weight_considered_unit(
    package_weight: Decimal,
    package_quantity: i32,
    loss_factor_enabled: bool,
    loss_factor: Decimal,
) -> Result<Decimal, ServiceError> {
    if package_quantity <= 0 {
        return Err(ServiceError::ValidationError(
            "package_quantity must be positive".to_string(),
        ));
    }
    if package_weight <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "package_weight must be positive".to_string(),
        ));
    }
    if loss_factor_enabled && (loss_factor < Decimal::ZERO || loss_factor >= Decimal::ONE) {
        return Err(ServiceError::ValidationError(
            "loss_factor must be within [0, 1)".to_string(),
        ));
    }

    let mut unit = package_weight / Decimal::from(package_quantity);
    if loss_factor_enabled {
        unit -= unit * loss_factor;
    }
    Ok(unit)
}

/// Batch total from quantity and considered unit weight.
pub fn total_weight_considered(quantity: i32, unit: Decimal) -> Decimal {
    Decimal::from(quantity) * unit
}

#[derive(Clone)]
pub struct MoldedProductionService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl MoldedProductionService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(pointing_id = %input.production_pointing_id))]
    pub async fn create(
        &self,
        input: CreateMoldedProductionInput,
    ) -> Result<molded_production::Model, ServiceError> {
        if input.quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "quantity must be positive".to_string(),
            ));
        }

        let unit = weight_considered_unit(
            input.package_weight,
            input.package_quantity,
            input.loss_factor_enabled,
            input.loss_factor,
        )?;
        let total = total_weight_considered(input.quantity, unit);

        let pointing = PointingEntity::find_by_id(input.production_pointing_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "production pointing {} does not exist",
                    input.production_pointing_id
                ))
            })?;
        if pointing.status != PointingStatus::Open {
            return Err(ServiceError::InvalidOperation(format!(
                "cannot record production on a {} pointing",
                pointing.status.as_str()
            )));
        }

        let mold_type = MoldTypeEntity::find_by_id(input.mold_type_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "mold type {} does not exist",
                    input.mold_type_id
                ))
            })?;
        if !mold_type.status.is_active() {
            return Err(ServiceError::ValidationError(format!(
                "mold type '{}' is inactive",
                mold_type.name
            )));
        }

        let record = molded_production::ActiveModel {
            id: Set(Uuid::new_v4()),
            production_pointing_id: Set(input.production_pointing_id),
            mold_type_id: Set(input.mold_type_id),
            quantity: Set(input.quantity),
            package_weight: Set(input.package_weight),
            package_quantity: Set(input.package_quantity),
            loss_factor_enabled: Set(input.loss_factor_enabled),
            loss_factor: Set(input.loss_factor),
            weight_considered_unit: Set(unit),
            total_weight_considered: Set(total),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(
            molded_production_id = %record.id,
            total_weight_considered = %record.total_weight_considered,
            "recorded molded production"
        );

        self.event_sender
            .send(Event::MoldedProductionRecorded(record.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<molded_production::Model>, ServiceError> {
        MoldedProductionEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_by_pointing(
        &self,
        production_pointing_id: Uuid,
    ) -> Result<Vec<molded_production::Model>, ServiceError> {
        MoldedProductionEntity::find()
            .filter(
                molded_production::Column::ProductionPointingId.eq(production_pointing_id),
            )
            .order_by_asc(molded_production::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn add_scrap(
        &self,
        molded_production_id: Uuid,
        quantity: i32,
        reason: String,
    ) -> Result<molded_production_scrap::Model, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "scrap quantity must be positive".to_string(),
            ));
        }
        if reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "scrap reason is required".to_string(),
            ));
        }

        let parent = MoldedProductionEntity::find_by_id(molded_production_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "molded production {} not found",
                    molded_production_id
                ))
            })?;

        molded_production_scrap::ActiveModel {
            id: Set(Uuid::new_v4()),
            molded_production_id: Set(parent.id),
            quantity: Set(quantity),
            reason: Set(reason),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_scraps(
        &self,
        molded_production_id: Uuid,
    ) -> Result<Vec<molded_production_scrap::Model>, ServiceError> {
        ScrapEntity::find()
            .filter(
                molded_production_scrap::Column::MoldedProductionId.eq(molded_production_id),
            )
            .order_by_asc(molded_production_scrap::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn create_mold_type(
        &self,
        name: String,
        cavity_count: i32,
    ) -> Result<mold_type::Model, ServiceError> {
        if cavity_count <= 0 {
            return Err(ServiceError::ValidationError(
                "cavity_count must be positive".to_string(),
            ));
        }
        mold_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            cavity_count: Set(cavity_count),
            status: Set(CatalogStatus::Active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_mold_types(&self) -> Result<Vec<mold_type::Model>, ServiceError> {
        MoldTypeEntity::find()
            .order_by_asc(mold_type::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unit_weight_without_loss_is_plain_division() {
        let unit = weight_considered_unit(dec!(50), 10, false, Decimal::ZERO).unwrap();
        assert_eq!(unit, dec!(5));
    }

    #[test]
    fn unit_weight_with_loss_matches_reference_case() {
        // 50kg package of 10 pieces, 20% loss: (50/10) - (50/10 * 0.2) = 4.0
        let unit = weight_considered_unit(dec!(50), 10, true, dec!(0.2)).unwrap();
        assert_eq!(unit, dec!(4.0));
        assert_eq!(total_weight_considered(100, unit), dec!(400.0));
    }

    #[test]
    fn zero_package_quantity_is_rejected() {
        let err = weight_considered_unit(dec!(50), 0, false, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn full_loss_factor_is_rejected() {
        let err = weight_considered_unit(dec!(50), 10, true, dec!(1)).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn disabled_loss_factor_is_ignored_even_when_set() {
        let unit = weight_considered_unit(dec!(50), 10, false, dec!(0.9)).unwrap();
        assert_eq!(unit, dec!(5));
    }
}
