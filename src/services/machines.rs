//! Machine Service
//!
//! Machines and their downtime log.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::machine::{self, Entity as MachineEntity};
use crate::entities::machine_downtime::{self, Entity as DowntimeEntity};
use crate::entities::CatalogStatus;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::production_pointings::validate_window;

#[derive(Clone)]
pub struct MachineService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl MachineService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: String) -> Result<machine::Model, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "machine name is required".to_string(),
            ));
        }
        machine::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            status: Set(CatalogStatus::Active),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<machine::Model>, ServiceError> {
        MachineEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<machine::Model>, ServiceError> {
        MachineEntity::find()
            .order_by_asc(machine::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: Uuid) -> Result<machine::Model, ServiceError> {
        let model = self.require(id).await?;
        let mut active: machine::ActiveModel = model.into();
        active.status = Set(CatalogStatus::Inactive);
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    /// Logs a downtime window. An open-ended stoppage omits `ended_at` and
    /// is closed later with [`end_downtime`](Self::end_downtime).
    #[instrument(skip(self))]
    pub async fn log_downtime(
        &self,
        machine_id: Uuid,
        started_at: DateTime<Utc>,
        ended_at: Option<DateTime<Utc>>,
        reason: String,
        created_by: Option<Uuid>,
    ) -> Result<machine_downtime::Model, ServiceError> {
        if reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "downtime reason is required".to_string(),
            ));
        }
        if let Some(ended_at) = ended_at {
            validate_window(started_at, ended_at)?;
        }

        let machine = self.require(machine_id).await?;
        if !machine.status.is_active() {
            return Err(ServiceError::ValidationError(format!(
                "machine '{}' is inactive",
                machine.name
            )));
        }

        let downtime = machine_downtime::ActiveModel {
            id: Set(Uuid::new_v4()),
            machine_id: Set(machine_id),
            started_at: Set(started_at),
            ended_at: Set(ended_at),
            reason: Set(reason.trim().to_string()),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(
            machine_id = %machine_id,
            downtime_id = %downtime.id,
            "logged machine downtime"
        );

        self.event_sender
            .send(Event::MachineDowntimeLogged {
                machine_id,
                downtime_id: downtime.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(downtime)
    }

    /// Closes an open downtime window.
    #[instrument(skip(self))]
    pub async fn end_downtime(
        &self,
        downtime_id: Uuid,
        ended_at: DateTime<Utc>,
    ) -> Result<machine_downtime::Model, ServiceError> {
        let downtime = DowntimeEntity::find_by_id(downtime_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("downtime {} not found", downtime_id))
            })?;

        if !downtime.is_open() {
            return Err(ServiceError::InvalidOperation(
                "downtime is already ended".to_string(),
            ));
        }
        validate_window(downtime.started_at, ended_at)?;

        let mut active: machine_downtime::ActiveModel = downtime.into();
        active.ended_at = Set(Some(ended_at));
        active.updated_at = Set(Some(Utc::now()));
        active.update(&*self.db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_downtimes(
        &self,
        machine_id: Uuid,
    ) -> Result<Vec<machine_downtime::Model>, ServiceError> {
        DowntimeEntity::find()
            .filter(machine_downtime::Column::MachineId.eq(machine_id))
            .order_by_desc(machine_downtime::Column::StartedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    async fn require(&self, id: Uuid) -> Result<machine::Model, ServiceError> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("machine {} not found", id)))
    }
}
