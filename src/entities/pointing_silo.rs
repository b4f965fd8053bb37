use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pivot: silos feeding a production pointing.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pointing_silos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub production_pointing_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub silo_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
