//! Lead Service — the lightweight CRM register.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::lead::{self, Entity as LeadEntity, LeadStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Input for registering a lead.
#[derive(Debug, Clone)]
pub struct CreateLeadInput {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub estimated_value: Option<Decimal>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Clone)]
pub struct LeadService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl LeadService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateLeadInput) -> Result<lead::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "lead name is required".to_string(),
            ));
        }
        if let Some(value) = input.estimated_value {
            if value < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "estimated_value must not be negative".to_string(),
                ));
            }
        }

        let created = lead::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            company: Set(input.company),
            email: Set(input.email),
            status: Set(LeadStatus::New),
            estimated_value: Set(input.estimated_value),
            notes: Set(input.notes),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::LeadCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<lead::Model>, ServiceError> {
        LeadEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<LeadStatus>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<lead::Model>, u64), ServiceError> {
        if page == 0 || limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "invalid pagination parameters".to_string(),
            ));
        }

        let mut query = LeadEntity::find();
        if let Some(status) = status {
            query = query.filter(lead::Column::Status.eq(status));
        }
        query = query.order_by_desc(lead::Column::CreatedAt);

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
        status: LeadStatus,
    ) -> Result<lead::Model, ServiceError> {
        let model = self.require(id).await?;
        let mut active: lead::ActiveModel = model.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let model = self.require(id).await?;
        model.delete(&*self.db).await.map_err(ServiceError::db_error)?;
        Ok(())
    }

    async fn require(&self, id: Uuid) -> Result<lead::Model, ServiceError> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("lead {} not found", id)))
    }
}
