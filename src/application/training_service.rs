// Training lifecycle service.
//
// Responsibilities
// - Resolve the owning user through the UserProvider read port on every write.
// - Join every read with the current state of the owners; trainings whose owner is gone are not returned.
// - Build new trainings and merge updates; nothing is written when resolution or validation fails.

use crate::application::errors::ApplicationError;
use crate::application::user_service::UserProvider;
use crate::core::ports::TrainingRepository;
use crate::core::training::{ActivityType, OwnedTraining, Training, TrainingRequest, start_of_day};
use crate::core::user::User;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct TrainingLifecycleService<TRepository>
where
    TRepository: TrainingRepository + 'static,
{
    repository: Arc<TRepository>,
    users: Arc<dyn UserProvider>,
}

impl<TRepository> TrainingLifecycleService<TRepository>
where
    TRepository: TrainingRepository + 'static,
{
    pub fn new(repository: Arc<TRepository>, users: Arc<dyn UserProvider>) -> Self {
        Self { repository, users }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<OwnedTraining>, ApplicationError> {
        let Some(training) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };
        let owner = self.users.get_by_id(Some(training.user_id)).await?;
        Ok(owner.map(|user| OwnedTraining { training, user }))
    }

    pub async fn find_all(&self) -> Result<Vec<OwnedTraining>, ApplicationError> {
        info!("getting all trainings");
        self.with_owners(self.repository.find_all().await?).await
    }

    pub async fn find_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<OwnedTraining>, ApplicationError> {
        info!(user_id, "getting trainings for user");
        self.with_owners(self.repository.find_by_user_id(user_id).await?)
            .await
    }

    /// Trainings that ended after the start of `date` in the local time zone.
    pub async fn find_finished_after(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<OwnedTraining>, ApplicationError> {
        info!(%date, "getting trainings finished after");
        let instant = start_of_day(date)?;
        self.with_owners(self.repository.find_by_end_time_after(instant).await?)
            .await
    }

    pub async fn find_by_activity_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<OwnedTraining>, ApplicationError> {
        info!(%activity_type, "getting trainings by activity type");
        self.with_owners(self.repository.find_by_activity_type(activity_type).await?)
            .await
    }

    pub async fn create(&self, request: TrainingRequest) -> Result<OwnedTraining, ApplicationError> {
        let (user_id, user) = self.resolve_user(request.user_id).await?;
        let training = request.into_training(user_id)?;
        info!(user_id = training.user_id, activity_type = %training.activity_type, "creating training");
        let training = self.repository.save(training).await?;
        Ok(OwnedTraining { training, user })
    }

    pub async fn update(
        &self,
        id: i64,
        request: TrainingRequest,
    ) -> Result<OwnedTraining, ApplicationError> {
        let mut training = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::TrainingNotFound(id))?;
        let (user_id, user) = self.resolve_user(request.user_id).await?;
        request.apply_to(&mut training, user_id)?;
        info!(id, "updating training");
        let training = self.repository.save(training).await?;
        Ok(OwnedTraining { training, user })
    }

    async fn resolve_user(&self, user_id: Option<i64>) -> Result<(i64, User), ApplicationError> {
        match (user_id, self.users.get_by_id(user_id).await?) {
            (Some(id), Some(user)) => Ok((id, user)),
            _ => Err(ApplicationError::UserNotFound(user_id.unwrap_or_default())),
        }
    }

    async fn with_owners(
        &self,
        trainings: Vec<Training>,
    ) -> Result<Vec<OwnedTraining>, ApplicationError> {
        if trainings.is_empty() {
            return Ok(Vec::new());
        }
        let owners: HashMap<i64, User> = self
            .users
            .find_all()
            .await?
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, user)))
            .collect();
        Ok(trainings
            .into_iter()
            .filter_map(|training| match owners.get(&training.user_id) {
                Some(user) => Some(OwnedTraining {
                    user: user.clone(),
                    training,
                }),
                None => {
                    debug!(id = ?training.id, user_id = training.user_id, "skipping training without owner");
                    None
                }
            })
            .collect())
    }
}
