use crate::adapters::in_memory::in_memory_training_repository::InMemoryTrainingRepository;
use crate::adapters::in_memory::in_memory_user_repository::InMemoryUserRepository;
use crate::application::training_service::TrainingLifecycleService;
use crate::application::user_service::UserLifecycleService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserLifecycleService<InMemoryUserRepository>>,
    pub trainings: Arc<TrainingLifecycleService<InMemoryTrainingRepository>>,
}

impl AppState {
    pub fn in_memory() -> Self {
        let users = Arc::new(UserLifecycleService::new(Arc::new(
            InMemoryUserRepository::new(),
        )));
        let trainings = Arc::new(TrainingLifecycleService::new(
            Arc::new(InMemoryTrainingRepository::new()),
            users.clone(),
        ));
        Self { users, trainings }
    }
}
