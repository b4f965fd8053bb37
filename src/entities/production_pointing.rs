use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "pointing_status")]
pub enum PointingStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "voided")]
    Voided,
}

impl PointingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointingStatus::Open => "open",
            PointingStatus::Closed => "closed",
            PointingStatus::Voided => "voided",
        }
    }
}

/// Operational record of one production run: a time window, a raw material
/// draw, and the crew/silos involved. Anchors the reservation and every
/// downstream yield record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_pointings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sheet_number: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub raw_material_id: Uuid,
    pub quantity_kg: Decimal,
    pub status: PointingStatus,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
