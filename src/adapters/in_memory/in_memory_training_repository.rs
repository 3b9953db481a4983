// In memory implementation of the TrainingRepository port.
//
// Rows hold the owner id only; owners are resolved by the service.

use crate::core::ports::{RepositoryError, TrainingRepository};
use crate::core::training::{ActivityType, Training};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct TrainingTable {
    rows: BTreeMap<i64, Training>,
    last_id: i64,
}

#[derive(Default)]
pub struct InMemoryTrainingRepository {
    table: RwLock<TrainingTable>,
    is_offline: bool,
}

impl InMemoryTrainingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    async fn scan(
        &self,
        keep: impl Fn(&Training) -> bool,
    ) -> Result<Vec<Training>, RepositoryError> {
        if self.is_offline {
            return Err(RepositoryError::Backend(
                "Training repository offline".into(),
            ));
        }
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|t| keep(t)).cloned().collect())
    }
}

#[async_trait::async_trait]
impl TrainingRepository for InMemoryTrainingRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Training>, RepositoryError> {
        Ok(self.scan(|t| t.id == Some(id)).await?.pop())
    }

    async fn find_all(&self) -> Result<Vec<Training>, RepositoryError> {
        self.scan(|_| true).await
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Training>, RepositoryError> {
        self.scan(|t| t.user_id == user_id).await
    }

    async fn find_by_end_time_after(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Training>, RepositoryError> {
        self.scan(|t| t.end_time > instant).await
    }

    async fn find_by_activity_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>, RepositoryError> {
        self.scan(|t| t.activity_type == activity_type).await
    }

    async fn save(&self, mut training: Training) -> Result<Training, RepositoryError> {
        if self.is_offline {
            return Err(RepositoryError::Backend(
                "Training repository offline".into(),
            ));
        }
        let mut table = self.table.write().await;
        let id = match training.id {
            Some(id) => {
                table.last_id = table.last_id.max(id);
                id
            }
            None => {
                table.last_id += 1;
                table.last_id
            }
        };
        training.id = Some(id);
        table.rows.insert(id, training.clone());
        Ok(training)
    }
}
