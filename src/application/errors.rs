use crate::core::ports::RepositoryError;
use crate::core::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("User with ID: {0} not found")]
    UserNotFound(i64),

    #[error("Training with ID: {0} not found")]
    TrainingNotFound(i64),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}
