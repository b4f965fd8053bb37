//! Client Service
//!
//! Client administration. A client with orders on file cannot be deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::client::{self, Entity as ClientEntity};
use crate::entities::order::{self as order_entity, Entity as OrderEntity};
use crate::entities::CatalogStatus;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

pub const DELETE_BLOCKED_HAS_ORDERS: &str = "client.delete_blocked_has_orders";

/// Input for creating or updating a client.
#[derive(Debug, Clone)]
pub struct ClientInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ClientService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: ClientInput,
        created_by: Option<Uuid>,
    ) -> Result<client::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "client name is required".to_string(),
            ));
        }

        let created = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            email: Set(input.email),
            phone: Set(input.phone),
            status: Set(CatalogStatus::Active),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::ClientCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<client::Model>, ServiceError> {
        ClientEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<client::Model>, u64), ServiceError> {
        if page == 0 || limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "invalid pagination parameters".to_string(),
            ));
        }

        let paginator = ClientEntity::find()
            .order_by_asc(client::Column::Name)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: ClientInput,
    ) -> Result<client::Model, ServiceError> {
        let model = self.require(id).await?;
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "client name is required".to_string(),
            ));
        }

        let mut active: client::ActiveModel = model.into();
        active.name = Set(input.name.trim().to_string());
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    /// Deletes a client. Blocked while any order references them.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let model = self.require(id).await?;

        let order_count = OrderEntity::find()
            .filter(order_entity::Column::ClientId.eq(id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if order_count > 0 {
            return Err(ServiceError::InvalidOperation(
                DELETE_BLOCKED_HAS_ORDERS.to_string(),
            ));
        }

        model.delete(&*self.db).await.map_err(ServiceError::db_error)?;
        Ok(())
    }

    async fn require(&self, id: Uuid) -> Result<client::Model, ServiceError> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("client {} not found", id)))
    }
}
