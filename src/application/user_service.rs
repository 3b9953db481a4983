// User lifecycle service.
//
// Responsibilities
// - Validate candidates, patches and search criteria before touching the repository.
// - Distinguish an invalid request (error) from an absent user (empty result) on reads.
// - Read, decide and write back. There is no optimistic concurrency check, so callers
//   that need per-user serialization must provide it.

use crate::application::errors::ApplicationError;
use crate::core::ports::UserRepository;
use crate::core::user::search::{UserSearch, matches, validate_search};
use crate::core::user::{CreateUser, User, UserPatch};
use crate::core::validation::{today, validate_email_fragment};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// Read side of the user lifecycle. Other modules resolve users through this port only.
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn get_by_id(&self, id: Option<i64>) -> Result<Option<User>, ApplicationError>;

    async fn get_by_email(&self, email: Option<&str>) -> Result<Option<User>, ApplicationError>;

    async fn find_all(&self) -> Result<Vec<User>, ApplicationError>;
}

/// Write and search side of the user lifecycle.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, candidate: CreateUser) -> Result<User, ApplicationError>;

    async fn find_matching_users_by_partial_email(
        &self,
        fragment: Option<&str>,
    ) -> Result<Vec<User>, ApplicationError>;

    async fn find_older_than(&self, date: Option<NaiveDate>) -> Result<Vec<User>, ApplicationError>;

    async fn find_matching(&self, search: &UserSearch) -> Result<Vec<User>, ApplicationError>;

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, ApplicationError>;

    async fn delete(&self, id: i64) -> Result<User, ApplicationError>;
}

pub struct UserLifecycleService<TRepository>
where
    TRepository: UserRepository + 'static,
{
    repository: Arc<TRepository>,
}

impl<TRepository> UserLifecycleService<TRepository>
where
    TRepository: UserRepository + 'static,
{
    pub fn new(repository: Arc<TRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TRepository> UserProvider for UserLifecycleService<TRepository>
where
    TRepository: UserRepository + 'static,
{
    async fn get_by_id(&self, id: Option<i64>) -> Result<Option<User>, ApplicationError> {
        let id = match id {
            Some(id) if id >= 1 => id,
            _ => {
                warn!(?id, "rejected user lookup");
                return Err(ApplicationError::invalid_argument("Invalid id"));
            }
        };
        info!(id, "getting user details by id");
        Ok(self.repository.find_by_id(id).await?)
    }

    async fn get_by_email(&self, email: Option<&str>) -> Result<Option<User>, ApplicationError> {
        let email = match email {
            Some(email) if !email.trim().is_empty() => email,
            _ => {
                warn!("rejected user lookup without email");
                return Err(ApplicationError::invalid_argument("Invalid email"));
            }
        };
        info!(email, "getting user details by email");
        Ok(self.repository.find_by_email(email).await?)
    }

    async fn find_all(&self) -> Result<Vec<User>, ApplicationError> {
        Ok(self.repository.find_all().await?)
    }
}

#[async_trait]
impl<TRepository> UserService for UserLifecycleService<TRepository>
where
    TRepository: UserRepository + 'static,
{
    async fn create(&self, candidate: CreateUser) -> Result<User, ApplicationError> {
        let user = candidate.validate(today())?;
        if user.id.is_some() {
            return Err(ApplicationError::invalid_argument(
                "User has already DB ID, update is not permitted!",
            ));
        }
        info!(email = %user.email, "creating user");
        Ok(self.repository.save(user).await?)
    }

    async fn find_matching_users_by_partial_email(
        &self,
        fragment: Option<&str>,
    ) -> Result<Vec<User>, ApplicationError> {
        validate_email_fragment(fragment)?;
        let fragment = fragment.unwrap_or_default();
        info!(fragment, "getting users by email fragment");
        Ok(self.repository.find_all_by_email_containing(fragment).await?)
    }

    async fn find_older_than(&self, date: Option<NaiveDate>) -> Result<Vec<User>, ApplicationError> {
        let date = date.ok_or_else(|| ApplicationError::invalid_argument("The date is required."))?;
        info!(%date, "getting users older than");
        Ok(self.repository.find_by_birthdate_before(date).await?)
    }

    async fn find_matching(&self, search: &UserSearch) -> Result<Vec<User>, ApplicationError> {
        validate_search(search, today())?;
        info!(?search, "getting users matching search");
        let users = self.repository.find_all().await?;
        Ok(users
            .into_iter()
            .filter(|user| matches(user, search))
            .collect())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, ApplicationError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::UserNotFound(id))?;
        patch.validate(today())?;
        patch.apply_to(&mut user);
        info!(id, "updating user");
        Ok(self.repository.save(user).await?)
    }

    async fn delete(&self, id: i64) -> Result<User, ApplicationError> {
        let mut users = self.repository.find_all_by_id(&[id]).await?;
        if users.len() > 1 {
            warn!(id, count = users.len(), "identity shared by several users");
            return Err(ApplicationError::Conflict(format!(
                "There is more than one user with id: {id}"
            )));
        }
        let user = users.pop().ok_or(ApplicationError::UserNotFound(id))?;
        self.repository.delete(&user).await?;
        info!(id, "deleted user");
        Ok(user)
    }
}

#[cfg(test)]
mod user_lifecycle_service_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_user_repository::InMemoryUserRepository;
    use crate::core::ports::RepositoryError;
    use crate::core::validation::ValidationError;
    use crate::test_support::fixtures::CreateUserBuilder;
    use chrono::{Days, NaiveDate};
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    type BeforeEachReturn = (
        Arc<InMemoryUserRepository>,
        UserLifecycleService<InMemoryUserRepository>,
    );

    #[fixture]
    fn before_each() -> BeforeEachReturn {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserLifecycleService::new(repository.clone());
        (repository, service)
    }

    async fn seed(service: &UserLifecycleService<InMemoryUserRepository>) -> Vec<User> {
        let candidates = [
            CreateUserBuilder::new()
                .first_name("John")
                .last_name("Doe")
                .birthdate(date(1980, 3, 14))
                .email("john.doe@example.com"),
            CreateUserBuilder::new()
                .first_name("John")
                .last_name("Smith")
                .birthdate(date(1995, 7, 1))
                .email("JOHN.SMITH@work.org"),
            CreateUserBuilder::new()
                .first_name("Jane")
                .last_name("Doe")
                .birthdate(date(2001, 12, 24))
                .email("jane.doe@example.com"),
        ];
        let mut users = Vec::new();
        for candidate in candidates {
            users.push(service.create(candidate.build()).await.unwrap());
        }
        users
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_create_a_valid_user_and_assign_an_id(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let candidate = CreateUserBuilder::new().build();
        let created = service.create(candidate.clone()).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(Some(created.first_name.clone()), candidate.first_name);
        assert_eq!(Some(created.last_name.clone()), candidate.last_name);
        assert_eq!(Some(created.birthdate), candidate.birthdate);
        assert_eq!(Some(created.email.clone()), candidate.email);

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_create_without_a_first_name(before_each: BeforeEachReturn) {
        let (repository, service) = before_each;
        let result = service
            .create(CreateUserBuilder::new().no_first_name().build())
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "First name is required."
        );
        assert!(repository.find_all().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_create_with_invalid_characters(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let result = service
            .create(CreateUserBuilder::new().first_name("!@#$%%").build())
            .await;
        assert_eq!(
            result,
            Err(ApplicationError::Validation(ValidationError::FirstNameInvalid))
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "First name contains invalid characters."
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_accept_a_birthdate_of_today(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let created = service
            .create(CreateUserBuilder::new().birthdate(today()).build())
            .await;
        assert!(created.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_create_with_a_future_birthdate(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let tomorrow = today().checked_add_days(Days::new(1)).unwrap();
        let result = service
            .create(CreateUserBuilder::new().birthdate(tomorrow).build())
            .await;
        assert_eq!(
            result,
            Err(ApplicationError::Validation(ValidationError::BirthdateInFuture))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_to_create_a_user_that_already_has_an_id(
        before_each: BeforeEachReturn,
    ) {
        let (repository, service) = before_each;
        let result = service.create(CreateUserBuilder::new().id(7).build()).await;
        assert!(matches!(result, Err(ApplicationError::InvalidArgument(_))));
        assert!(repository.find_all().await.unwrap().is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(0))]
    #[case(Some(-3))]
    #[tokio::test]
    async fn it_should_reject_an_invalid_id(
        before_each: BeforeEachReturn,
        #[case] id: Option<i64>,
    ) {
        let (_, service) = before_each;
        assert_eq!(
            service.get_by_id(id).await,
            Err(ApplicationError::InvalidArgument("Invalid id".into()))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_nothing_for_an_unknown_id(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        assert_eq!(service.get_by_id(Some(5)).await, Ok(None));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_get_a_user_by_email_ignoring_case(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let found = service
            .get_by_email(Some("john.smith@WORK.org"))
            .await
            .unwrap();
        assert_eq!(found.as_ref(), users.get(1));
        assert_eq!(service.get_by_email(Some("nobody@example.com")).await, Ok(None));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[tokio::test]
    async fn it_should_reject_a_missing_email(
        before_each: BeforeEachReturn,
        #[case] email: Option<&'static str>,
    ) {
        let (_, service) = before_each;
        assert_eq!(
            service.get_by_email(email).await,
            Err(ApplicationError::InvalidArgument("Invalid email".into()))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_find_all_users(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        assert_eq!(service.find_all().await.unwrap(), users);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_find_users_by_partial_email(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let found = service
            .find_matching_users_by_partial_email(Some("John."))
            .await
            .unwrap();
        assert_eq!(found, users[..2].to_vec());

        let found = service
            .find_matching_users_by_partial_email(Some("@example.com"))
            .await
            .unwrap();
        assert_eq!(found, vec![users[0].clone(), users[2].clone()]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_an_invalid_email_fragment(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        assert_eq!(
            service.find_matching_users_by_partial_email(None).await,
            Err(ApplicationError::Validation(ValidationError::EmailFragmentRequired))
        );
        assert_eq!(
            service
                .find_matching_users_by_partial_email(Some("john*"))
                .await,
            Err(ApplicationError::Validation(ValidationError::EmailFragmentInvalid))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_find_users_born_strictly_before_a_date(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let found = service
            .find_older_than(Some(date(1995, 7, 1)))
            .await
            .unwrap();
        assert_eq!(found, vec![users[0].clone()]);
        assert_eq!(
            service.find_older_than(None).await,
            Err(ApplicationError::InvalidArgument("The date is required.".into()))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_everyone_for_an_empty_search(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let found = service.find_matching(&UserSearch::default()).await.unwrap();
        assert_eq!(found, users);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_match_first_names_exactly(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let search = UserSearch {
            first_name: Some("John".into()),
            ..UserSearch::default()
        };
        assert_eq!(service.find_matching(&search).await.unwrap(), users[..2].to_vec());

        let lower = UserSearch {
            first_name: Some("john".into()),
            ..UserSearch::default()
        };
        assert!(service.find_matching(&lower).await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_a_search_before_reading_when_criteria_are_invalid() {
        let mut repository = InMemoryUserRepository::new();
        repository.toggle_offline();
        let service = UserLifecycleService::new(Arc::new(repository));
        let search = UserSearch {
            email: Some("not-an-email".into()),
            ..UserSearch::default()
        };
        assert_eq!(
            service.find_matching(&search).await,
            Err(ApplicationError::Validation(ValidationError::EmailInvalid))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_update_only_the_supplied_fields(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let id = users[0].id.unwrap();
        let patch = UserPatch {
            last_name: Some("Doe-Smith".into()),
            ..UserPatch::default()
        };
        let updated = service.update(id, patch).await.unwrap();
        assert_eq!(updated.last_name, "Doe-Smith");
        assert_eq!(updated.first_name, users[0].first_name);
        assert_eq!(updated.email, users[0].email);
        assert_eq!(service.get_by_id(Some(id)).await.unwrap(), Some(updated));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_update_an_unknown_user(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        assert_eq!(
            service.update(42, UserPatch::default()).await,
            Err(ApplicationError::UserNotFound(42))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_persist_an_invalid_patch(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let id = users[0].id.unwrap();
        let patch = UserPatch {
            first_name: Some("Jim".into()),
            email: Some("broken".into()),
            ..UserPatch::default()
        };
        assert_eq!(
            service.update(id, patch).await,
            Err(ApplicationError::Validation(ValidationError::EmailInvalid))
        );
        assert_eq!(service.get_by_id(Some(id)).await.unwrap(), Some(users[0].clone()));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_delete_a_user_and_return_it(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        let users = seed(&service).await;
        let id = users[1].id.unwrap();
        assert_eq!(service.delete(id).await, Ok(users[1].clone()));
        assert_eq!(service.get_by_id(Some(id)).await, Ok(None));
        assert_eq!(service.find_all().await.unwrap().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_delete_an_unknown_user(before_each: BeforeEachReturn) {
        let (_, service) = before_each;
        assert_eq!(service.delete(9).await, Err(ApplicationError::UserNotFound(9)));
    }

    /// Repository whose identity lookups return every row twice.
    struct DuplicatingUserRepository {
        inner: InMemoryUserRepository,
    }

    #[async_trait]
    impl UserRepository for DuplicatingUserRepository {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
            self.inner.find_by_id(id).await
        }
        async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
            self.inner.find_all().await
        }
        async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<User>, RepositoryError> {
            let users = self.inner.find_all_by_id(ids).await?;
            Ok(users.iter().chain(users.iter()).cloned().collect())
        }
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            self.inner.find_by_email(email).await
        }
        async fn find_all_by_email_containing(
            &self,
            fragment: &str,
        ) -> Result<Vec<User>, RepositoryError> {
            self.inner.find_all_by_email_containing(fragment).await
        }
        async fn find_by_birthdate_before(
            &self,
            date: NaiveDate,
        ) -> Result<Vec<User>, RepositoryError> {
            self.inner.find_by_birthdate_before(date).await
        }
        async fn save(&self, user: User) -> Result<User, RepositoryError> {
            self.inner.save(user).await
        }
        async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
            self.inner.delete(user).await
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_to_delete_when_an_id_is_shared() {
        let repository = Arc::new(DuplicatingUserRepository {
            inner: InMemoryUserRepository::new(),
        });
        let service = UserLifecycleService::new(repository.clone());
        let user = service.create(CreateUserBuilder::new().build()).await.unwrap();
        let id = user.id.unwrap();
        assert_eq!(
            service.delete(id).await,
            Err(ApplicationError::Conflict(format!(
                "There is more than one user with id: {id}"
            )))
        );
        assert_eq!(service.get_by_id(Some(id)).await, Ok(Some(user)));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_repository_failures() {
        let mut repository = InMemoryUserRepository::new();
        repository.toggle_offline();
        let service = UserLifecycleService::new(Arc::new(repository));
        let result = service.find_all().await;
        assert_eq!(
            result,
            Err(ApplicationError::Repository(RepositoryError::Backend(
                "User repository offline".into()
            )))
        );
    }
}
