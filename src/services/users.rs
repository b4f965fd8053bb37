//! User Service
//!
//! Back-office user administration. A user who created clients, products,
//! or orders cannot be deleted; those audit trails must survive.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::client::{self as client_entity, Entity as ClientEntity};
use crate::entities::order::{self as order_entity, Entity as OrderEntity};
use crate::entities::product::{self as product_entity, Entity as ProductEntity};
use crate::entities::user::{self, Entity as UserEntity, UserRole};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

pub const DELETE_BLOCKED_HAS_RELATED_RECORDS: &str = "user.delete_blocked_has_related_records";

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        name: String,
        email: String,
        role: UserRole,
    ) -> Result<user::Model, ServiceError> {
        let email = email.trim().to_lowercase();
        if name.trim().is_empty() || email.is_empty() {
            return Err(ServiceError::ValidationError(
                "user name and email are required".to_string(),
            ));
        }

        let duplicate = UserEntity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "user with email '{}' already exists",
                email
            )));
        }

        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            email: Set(email),
            role: Set(role),
            active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        UserEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        if page == 0 || limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "invalid pagination parameters".to_string(),
            ));
        }

        let paginator = UserEntity::find()
            .order_by_asc(user::Column::Name)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, id: Uuid, role: UserRole) -> Result<user::Model, ServiceError> {
        let model = self.require(id).await?;
        let mut active: user::ActiveModel = model.into();
        active.role = Set(role);
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        let model = self.require(id).await?;
        let mut active: user::ActiveModel = model.into();
        active.active = Set(false);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&*self.db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::UserDeactivated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    /// Deletes a user. Blocked while clients, products, or orders carry
    /// this user as their creator.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let model = self.require(id).await?;

        let owned_clients = ClientEntity::find()
            .filter(client_entity::Column::CreatedBy.eq(id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        let owned_products = ProductEntity::find()
            .filter(product_entity::Column::CreatedBy.eq(id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        let owned_orders = OrderEntity::find()
            .filter(order_entity::Column::CreatedBy.eq(id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        if owned_clients + owned_products + owned_orders > 0 {
            return Err(ServiceError::InvalidOperation(
                DELETE_BLOCKED_HAS_RELATED_RECORDS.to_string(),
            ));
        }

        info!(user_id = %model.id, "deleting user");
        model.delete(&*self.db).await.map_err(ServiceError::db_error)?;
        Ok(())
    }

    async fn require(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {} not found", id)))
    }
}
