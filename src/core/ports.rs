// Ports define what the core needs from persistence, without implementing it.
//
// Responsibilities
// - Describe the lookups and writes the services rely on as async traits.
// - Keep the filtering semantics here; how an adapter satisfies them (scan or index) is its own concern.
//
// Testing guidance
// - The in memory adapters implement these traits for tests and local development.

use crate::core::training::{ActivityType, Training};
use crate::core::user::User;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<User>, RepositoryError>;

    /// Exact match, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Substring match, ignoring case.
    async fn find_all_by_email_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<User>, RepositoryError>;

    /// Users born strictly before `date`.
    async fn find_by_birthdate_before(&self, date: NaiveDate) -> Result<Vec<User>, RepositoryError>;

    /// Stores the user, assigning an id when it has none.
    async fn save(&self, user: User) -> Result<User, RepositoryError>;

    async fn delete(&self, user: &User) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait TrainingRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Training>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Training>, RepositoryError>;

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Training>, RepositoryError>;

    /// Trainings whose end time is strictly after `instant`.
    async fn find_by_end_time_after(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Training>, RepositoryError>;

    async fn find_by_activity_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>, RepositoryError>;

    /// Stores the training, assigning an id when it has none.
    async fn save(&self, training: Training) -> Result<Training, RepositoryError>;
}
