use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One molded batch produced against a production pointing.
///
/// `weight_considered_unit` and `total_weight_considered` are derived at
/// creation time from package weight, package quantity, and the optional
/// loss factor; they are persisted, not recomputed on read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "molded_productions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub production_pointing_id: Uuid,
    pub mold_type_id: Uuid,
    pub quantity: i32,
    pub package_weight: Decimal,
    pub package_quantity: i32,
    pub loss_factor_enabled: bool,
    pub loss_factor: Decimal,
    pub weight_considered_unit: Decimal,
    pub total_weight_considered: Decimal,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
