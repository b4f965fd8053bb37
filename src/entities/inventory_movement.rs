use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_item_type")]
pub enum ItemType {
    #[sea_orm(string_value = "raw_material")]
    RawMaterial,
    #[sea_orm(string_value = "product")]
    Product,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_location_type")]
pub enum LocationType {
    #[sea_orm(string_value = "silo")]
    Silo,
    #[sea_orm(string_value = "warehouse")]
    Warehouse,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_direction")]
pub enum MovementDirection {
    #[sea_orm(string_value = "in")]
    In,
    #[sea_orm(string_value = "out")]
    Out,
    #[sea_orm(string_value = "reserve")]
    Reserve,
    #[sea_orm(string_value = "release")]
    Release,
    #[sea_orm(string_value = "adjust")]
    Adjust,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
            MovementDirection::Reserve => "reserve",
            MovementDirection::Release => "release",
            MovementDirection::Adjust => "adjust",
        }
    }
}

/// Append-only audit ledger of inventory quantity changes.
///
/// Quantities are always positive; the direction encodes the sign. Rows are
/// never updated or deleted and there is no updated_at column.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub item_type: ItemType,
    pub item_id: Uuid,
    pub location_type: LocationType,
    pub location_id: Option<Uuid>,
    pub direction: MovementDirection,
    pub quantity: Decimal,
    pub unit: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
