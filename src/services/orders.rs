//! Order Service
//!
//! Orders and their lines. Deletion is guarded: only pending orders can be
//! removed, and the guard message key is stable for API consumers.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::client::Entity as ClientEntity;
use crate::entities::order::{self, Entity as OrderEntity, OrderStatus};
use crate::entities::order_item::{self, Entity as OrderItemEntity};
use crate::entities::product::Entity as ProductEntity;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

pub const DELETE_BLOCKED_NOT_PENDING: &str = "order.delete_blocked_not_pending";

/// One requested order line.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub order_number: Option<String>,
    pub client_id: Uuid,
    pub items: Vec<NewOrderItem>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(client_id = %input.client_id))]
    pub async fn create(
        &self,
        input: CreateOrderInput,
    ) -> Result<(order::Model, Vec<order_item::Model>), ServiceError> {
        if input.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "an order needs at least one item".to_string(),
            ));
        }

        let client = ClientEntity::find_by_id(input.client_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "client {} does not exist",
                    input.client_id
                ))
            })?;
        if !client.status.is_active() {
            return Err(ServiceError::ValidationError(format!(
                "client '{}' is inactive",
                client.name
            )));
        }

        // Resolve products and price lines before opening the transaction.
        let mut lines: Vec<(NewOrderItem, Decimal)> = Vec::with_capacity(input.items.len());
        for item in &input.items {
            if item.quantity <= 0 {
                return Err(ServiceError::ValidationError(
                    "item quantity must be positive".to_string(),
                ));
            }
            let product = ProductEntity::find_by_id(item.product_id)
                .one(&*self.db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "product {} does not exist",
                        item.product_id
                    ))
                })?;
            if !product.status.is_active() {
                return Err(ServiceError::ValidationError(format!(
                    "product '{}' is inactive",
                    product.name
                )));
            }
            lines.push((item.clone(), product.unit_price));
        }

        let order_id = Uuid::new_v4();
        let CreateOrderInput {
            order_number,
            client_id,
            notes,
            created_by,
            ..
        } = input;
        let order_number =
            order_number.unwrap_or_else(|| format!("ORD-{}", &order_id.simple().to_string()[..8]));

        let total: Decimal = lines
            .iter()
            .map(|(item, unit_price)| *unit_price * Decimal::from(item.quantity))
            .sum();

        let created = self
            .db
            .transaction::<_, (order::Model, Vec<order_item::Model>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let order = order::ActiveModel {
                            id: Set(order_id),
                            order_number: Set(order_number),
                            client_id: Set(client_id),
                            status: Set(OrderStatus::Pending),
                            total_amount: Set(total),
                            notes: Set(notes),
                            created_by: Set(created_by),
                            created_at: Set(Utc::now()),
                            updated_at: Set(None),
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                        let mut items = Vec::with_capacity(lines.len());
                        for (item, unit_price) in lines {
                            let line_total = unit_price * Decimal::from(item.quantity);
                            let inserted = order_item::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                order_id: Set(order.id),
                                product_id: Set(item.product_id),
                                quantity: Set(item.quantity),
                                unit_price: Set(unit_price),
                                line_total: Set(line_total),
                            }
                            .insert(txn)
                            .await
                            .map_err(ServiceError::db_error)?;
                            items.push(inserted);
                        }

                        Ok((order, items))
                    })
                },
            )
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        info!(order_id = %created.0.id, order_number = %created.0.order_number, "created order");

        self.event_sender
            .send(Event::OrderCreated(created.0.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<order::Model>, ServiceError> {
        OrderEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_items(&self, order_id: Uuid) -> Result<Vec<order_item::Model>, ServiceError> {
        OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        client_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        if page == 0 || limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "invalid pagination parameters".to_string(),
            ));
        }

        let mut query = OrderEntity::find();
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status));
        }
        if let Some(client_id) = client_id {
            query = query.filter(order::Column::ClientId.eq(client_id));
        }
        query = query.order_by_desc(order::Column::CreatedAt);

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: Uuid,
        next: OrderStatus,
    ) -> Result<order::Model, ServiceError> {
        let order = self.require(id).await?;

        if !order.status.can_transition_to(&next) {
            return Err(ServiceError::InvalidStatus(format!(
                "cannot move order from {} to {}",
                order.status.as_str(),
                next.as_str()
            )));
        }

        let old_status = order.status.clone();
        let mut active: order::ActiveModel = order.into();
        active.status = Set(next.clone());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&*self.db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::OrderStatusChanged {
                order_id: updated.id,
                old_status: old_status.as_str().to_string(),
                new_status: next.as_str().to_string(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    /// Deletes an order and its lines. Blocked unless the order is still
    /// pending.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let order = self.require(id).await?;

        if order.status != OrderStatus::Pending {
            return Err(ServiceError::InvalidOperation(
                DELETE_BLOCKED_NOT_PENDING.to_string(),
            ));
        }

        self.db
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    OrderItemEntity::delete_many()
                        .filter(order_item::Column::OrderId.eq(order.id))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    order
                        .delete(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        self.event_sender
            .send(Event::OrderDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }

    async fn require(&self, id: Uuid) -> Result<order::Model, ServiceError> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))
    }
}
