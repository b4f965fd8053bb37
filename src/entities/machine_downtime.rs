use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Downtime window logged against a machine. `ended_at` is null while the
/// stoppage is still open.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machine_downtimes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub machine_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub reason: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn duration_minutes(&self) -> Option<i64> {
        self.ended_at
            .map(|end| (end - self.started_at).num_minutes())
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn duration_is_none_while_open() {
        let model = Model {
            id: Uuid::new_v4(),
            machine_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            reason: "belt jam".to_string(),
            created_by: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        assert!(model.is_open());
        assert_eq!(model.duration_minutes(), None);
    }

    #[test]
    fn duration_counts_whole_minutes() {
        let started = Utc::now();
        let model = Model {
            id: Uuid::new_v4(),
            machine_id: Uuid::new_v4(),
            started_at: started,
            ended_at: Some(started + Duration::minutes(42) + Duration::seconds(30)),
            reason: "mold change".to_string(),
            created_by: None,
            created_at: started,
            updated_at: None,
        };
        assert_eq!(model.duration_minutes(), Some(42));
    }
}
