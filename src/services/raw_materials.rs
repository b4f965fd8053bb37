//! Raw material catalog service.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::raw_material::{self, Entity as RawMaterialEntity};
use crate::entities::CatalogStatus;
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct RawMaterialService {
    db: Arc<DbPool>,
}

impl RawMaterialService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        name: String,
        created_by: Option<Uuid>,
    ) -> Result<raw_material::Model, ServiceError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "raw material name is required".to_string(),
            ));
        }

        let duplicate = RawMaterialEntity::find()
            .filter(raw_material::Column::Name.eq(name.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "raw material '{}' already exists",
                name
            )));
        }

        raw_material::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            status: Set(CatalogStatus::Active),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<raw_material::Model>, ServiceError> {
        RawMaterialEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<CatalogStatus>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<raw_material::Model>, u64), ServiceError> {
        if page == 0 || limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "invalid pagination parameters".to_string(),
            ));
        }

        let mut query = RawMaterialEntity::find();
        if let Some(status) = status {
            query = query.filter(raw_material::Column::Status.eq(status));
        }
        query = query.order_by_asc(raw_material::Column::Name);

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }

    #[instrument(skip(self))]
    pub async fn rename(
        &self,
        id: Uuid,
        name: String,
    ) -> Result<raw_material::Model, ServiceError> {
        let material = self.require(id).await?;
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "raw material name is required".to_string(),
            ));
        }

        let duplicate = RawMaterialEntity::find()
            .filter(raw_material::Column::Name.eq(name.clone()))
            .filter(raw_material::Column::Id.ne(id))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "raw material '{}' already exists",
                name
            )));
        }

        let mut active: raw_material::ActiveModel = material.into();
        active.name = Set(name);
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: Uuid) -> Result<raw_material::Model, ServiceError> {
        let material = self.require(id).await?;
        let mut active: raw_material::ActiveModel = material.into();
        active.status = Set(CatalogStatus::Inactive);
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    async fn require(&self, id: Uuid) -> Result<raw_material::Model, ServiceError> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("raw material {} not found", id)))
    }
}
