//! Block Production Service
//!
//! Block batches cut against a production pointing, with weight deviation
//! derived from block-type density and the measured dimensions.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::block_production::{self, Entity as BlockProductionEntity};
use crate::entities::block_type::{self, Entity as BlockTypeEntity};
use crate::entities::production_pointing::{Entity as PointingEntity, PointingStatus};
use crate::entities::CatalogStatus;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::production_pointings::validate_window;

/// Input for recording a block batch.
#[derive(Debug, Clone)]
pub struct CreateBlockProductionInput {
    pub production_pointing_id: Uuid,
    pub block_type_id: Uuid,
    pub started_at: chrono::DateTime<Utc>,
    pub ended_at: chrono::DateTime<Utc>,
    pub weight_kg: Decimal,
    pub length_mm: i32,
    pub width_mm: i32,
    pub height_mm: i32,
    pub is_scrap: bool,
    pub created_by: Option<Uuid>,
}

/// Block batch with derived figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockProductionDetails {
    pub record: block_production::Model,
    pub volume_m3: Decimal,
    pub theoretical_weight_kg: Decimal,
    pub deviation_kg: Decimal,
}

/// Block volume from millimeter dimensions.
pub fn volume_m3(length_mm: i32, width_mm: i32, height_mm: i32) -> Decimal {
    let cubic_mm = Decimal::from(length_mm as i64 * width_mm as i64 * height_mm as i64);
    cubic_mm / dec!(1_000_000_000)
}

/// Weight the block should have at the type's nominal density.
pub fn theoretical_weight_kg(volume_m3: Decimal, density_kg_m3: Decimal) -> Decimal {
    volume_m3 * density_kg_m3
}

fn derive_details(
    record: block_production::Model,
    density_kg_m3: Decimal,
) -> BlockProductionDetails {
    let volume = volume_m3(record.length_mm, record.width_mm, record.height_mm);
    let theoretical = theoretical_weight_kg(volume, density_kg_m3);
    let deviation = record.weight_kg - theoretical;
    BlockProductionDetails {
        record,
        volume_m3: volume,
        theoretical_weight_kg: theoretical,
        deviation_kg: deviation,
    }
}

#[derive(Clone)]
pub struct BlockProductionService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl BlockProductionService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(pointing_id = %input.production_pointing_id))]
    pub async fn create(
        &self,
        input: CreateBlockProductionInput,
    ) -> Result<BlockProductionDetails, ServiceError> {
        validate_window(input.started_at, input.ended_at)?;
        if input.weight_kg <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "weight_kg must be positive".to_string(),
            ));
        }
        if input.length_mm <= 0 || input.width_mm <= 0 || input.height_mm <= 0 {
            return Err(ServiceError::ValidationError(
                "block dimensions must be positive".to_string(),
            ));
        }

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

        let block_type = self.require_active_block_type(input.block_type_id).await?;

        let record = block_production::ActiveModel {
            id: Set(Uuid::new_v4()),
            production_pointing_id: Set(input.production_pointing_id),
            block_type_id: Set(input.block_type_id),
            started_at: Set(input.started_at),
            ended_at: Set(input.ended_at),
            weight_kg: Set(input.weight_kg),
            length_mm: Set(input.length_mm),
            width_mm: Set(input.width_mm),
            height_mm: Set(input.height_mm),
            is_scrap: Set(input.is_scrap),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(block_production_id = %record.id, "recorded block production");

        self.event_sender
            .send(Event::BlockProductionRecorded(record.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(derive_details(record, block_type.density_kg_m3))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<BlockProductionDetails>, ServiceError> {
        let Some(record) = BlockProductionEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(None);
        };

        let block_type = BlockTypeEntity::find_by_id(record.block_type_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "block type {} missing for block production {}",
                    record.block_type_id, record.id
                ))
            })?;

        Ok(Some(derive_details(record, block_type.density_kg_m3)))
    }

    #[instrument(skip(self))]
    pub async fn list_by_pointing(
        &self,
        production_pointing_id: Uuid,
    ) -> Result<Vec<block_production::Model>, ServiceError> {
        BlockProductionEntity::find()
            .filter(
                block_production::Column::ProductionPointingId.eq(production_pointing_id),
            )
            .order_by_asc(block_production::Column::StartedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn create_block_type(
        &self,
        name: String,
        density_kg_m3: Decimal,
    ) -> Result<block_type::Model, ServiceError> {
        if density_kg_m3 <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "density must be positive".to_string(),
            ));
        }
        block_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            density_kg_m3: Set(density_kg_m3),
            status: Set(CatalogStatus::Active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_block_types(&self) -> Result<Vec<block_type::Model>, ServiceError> {
        BlockTypeEntity::find()
            .order_by_asc(block_type::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    async fn require_active_block_type(
        &self,
        id: Uuid,
    ) -> Result<block_type::Model, ServiceError> {
        let block_type = BlockTypeEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("block type {} does not exist", id))
            })?;
        if !block_type.status.is_active() {
            return Err(ServiceError::ValidationError(format!(
                "block type '{}' is inactive",
                block_type.name
            )));
        }
        Ok(block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_of_a_cubic_meter_block() {
        assert_eq!(volume_m3(1000, 1000, 1000), dec!(1));
    }

    #[test]
    fn theoretical_weight_scales_with_density() {
        let volume = volume_m3(2000, 1000, 500);
        assert_eq!(volume, dec!(1));
        assert_eq!(theoretical_weight_kg(volume, dec!(18.5)), dec!(18.5));
    }

    #[test]
    fn deviation_is_measured_minus_theoretical() {
        let record = block_production::Model {
            id: Uuid::new_v4(),
            production_pointing_id: Uuid::new_v4(),
            block_type_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            weight_kg: dec!(20),
            length_mm: 2000,
            width_mm: 1000,
            height_mm: 500,
            is_scrap: false,
            created_by: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let details = derive_details(record, dec!(18.5));
        assert_eq!(details.deviation_kg, dec!(1.5));
    }
}
