//! Inventory Movement Service
//!
//! Append-only ledger of inventory quantity changes. Rows are inserted and
//! read, never updated or deleted; no balance aggregation is derived here.

use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::inventory_movement::{
    self, Entity as MovementEntity, ItemType, LocationType, MovementDirection,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Input for one ledger entry.
#[derive(Debug, Clone)]
pub struct NewMovement {
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
}

/// Filters for listing ledger entries.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub item_type: Option<ItemType>,
    pub item_id: Option<Uuid>,
    pub direction: Option<MovementDirection>,
    pub occurred_from: Option<DateTime<Utc>>,
    pub occurred_to: Option<DateTime<Utc>>,
}

/// Inserts one ledger row on the given connection (plain connection or
/// open transaction). Quantity must be strictly positive; the direction
/// encodes the sign.
pub(crate) async fn insert_movement<C>(
    conn: &C,
    new: NewMovement,
) -> Result<inventory_movement::Model, ServiceError>
where
    C: ConnectionTrait,
{
    if new.quantity <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "movement quantity must be positive".to_string(),
        ));
    }

    let model = inventory_movement::ActiveModel {
        id: Set(Uuid::new_v4()),
        occurred_at: Set(new.occurred_at),
        item_type: Set(new.item_type),
        item_id: Set(new.item_id),
        location_type: Set(new.location_type),
        location_id: Set(new.location_id),
        direction: Set(new.direction),
        quantity: Set(new.quantity),
        unit: Set(new.unit),
        reference_type: Set(new.reference_type),
        reference_id: Set(new.reference_id),
        created_by: Set(new.created_by),
        created_at: Set(Utc::now()),
    };

    let inserted = MovementEntity::insert(model)
        .exec_with_returning(conn)
        .await
        .map_err(ServiceError::db_error)?;

    counter!(
        "moldline_inventory.movements_recorded",
        1,
        "direction" => inserted.direction.as_str()
    );

    Ok(inserted)
}

#[derive(Clone)]
pub struct MovementService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl MovementService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Appends one movement and emits `MovementRecorded`.
    #[instrument(skip(self, new))]
    pub async fn record(&self, new: NewMovement) -> Result<inventory_movement::Model, ServiceError> {
        let movement = insert_movement(&*self.db, new).await?;

        info!(
            movement_id = %movement.id,
            direction = movement.direction.as_str(),
            quantity = %movement.quantity,
            "recorded inventory movement"
        );

        self.event_sender
            .send(Event::MovementRecorded {
                movement_id: movement.id,
                direction: movement.direction.as_str().to_string(),
                quantity: movement.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(movement)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<inventory_movement::Model>, ServiceError> {
        MovementEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Lists ledger entries newest-first with pagination.
    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        filter: MovementFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<inventory_movement::Model>, u64), ServiceError> {
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

        let mut query = MovementEntity::find();

        if let Some(item_type) = filter.item_type {
            query = query.filter(inventory_movement::Column::ItemType.eq(item_type));
        }
        if let Some(item_id) = filter.item_id {
            query = query.filter(inventory_movement::Column::ItemId.eq(item_id));
        }
        if let Some(direction) = filter.direction {
            query = query.filter(inventory_movement::Column::Direction.eq(direction));
        }
        if let Some(from) = filter.occurred_from {
            query = query.filter(inventory_movement::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.occurred_to {
            query = query.filter(inventory_movement::Column::OccurredAt.lte(to));
        }

        query = query.order_by_desc(inventory_movement::Column::OccurredAt);

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }
}
