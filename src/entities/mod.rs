//! Database entities (sea-orm models).

pub mod block_production;
pub mod block_type;
pub mod client;
pub mod inventory_movement;
pub mod inventory_reservation;
pub mod lead;
pub mod machine;
pub mod machine_downtime;
pub mod mold_type;
pub mod molded_production;
pub mod molded_production_scrap;
pub mod operator;
pub mod order;
pub mod order_item;
pub mod pointing_operator;
pub mod pointing_silo;
pub mod product;
pub mod product_component;
pub mod production_pointing;
pub mod raw_material;
pub mod silo;
pub mod user;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activation flag shared by the reference catalogs (raw materials,
/// operators, silos, machines, block/mold types, products, clients).
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "catalog_status")]
pub enum CatalogStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl CatalogStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CatalogStatus::Active)
    }
}
