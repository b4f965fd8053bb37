use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status for inventory reservations
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reservation_status")]
pub enum ReservationStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Closed => "closed",
            ReservationStatus::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Active)
    }
}

/// Soft hold of raw material for one production pointing (1:1).
///
/// `consumed_kg` accumulates as `out` movements are recorded. The intended
/// invariant `consumed_kg <= reserved_kg` is NOT enforced here or in the
/// service layer; over-consumption remains representable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub production_pointing_id: Uuid,
    pub raw_material_id: Uuid,
    pub reserved_kg: Decimal,
    pub consumed_kg: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Unconsumed remainder. Negative when the reservation was over-consumed.
    pub fn remaining_kg(&self) -> Decimal {
        self.reserved_kg - self.consumed_kg
    }
}

/// Status a reservation lands in after `consumed_kg` reaches the given total.
pub fn status_after_consume(reserved_kg: Decimal, consumed_total_kg: Decimal) -> ReservationStatus {
    if consumed_total_kg >= reserved_kg {
        ReservationStatus::Closed
    } else {
        ReservationStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            active_model.created_at = Set(now);

            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
        }

        active_model.updated_at = Set(Some(now));

        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn consuming_below_reserved_stays_active() {
        assert_eq!(
            status_after_consume(dec!(100), dec!(99.999)),
            ReservationStatus::Active
        );
    }

    #[test]
    fn consuming_to_or_past_reserved_closes() {
        assert_eq!(
            status_after_consume(dec!(100), dec!(100)),
            ReservationStatus::Closed
        );
        assert_eq!(
            status_after_consume(dec!(100), dec!(130)),
            ReservationStatus::Closed
        );
    }

    #[test]
    fn remaining_goes_negative_on_over_consumption() {
        let model = Model {
            id: Uuid::new_v4(),
            production_pointing_id: Uuid::new_v4(),
            raw_material_id: Uuid::new_v4(),
            reserved_kg: dec!(50),
            consumed_kg: dec!(60),
            status: ReservationStatus::Closed,
            created_at: Utc::now(),
            updated_at: None,
        };
        assert_eq!(model.remaining_kg(), dec!(-10));
    }
}
