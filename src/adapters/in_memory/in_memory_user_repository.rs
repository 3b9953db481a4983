// In memory implementation of the UserRepository port.
//
// Purpose
// - Support service tests and local development without a database.
//
// Responsibilities
// - Store users keyed by id and hand out increasing ids on first save.
// - Answer the filtered queries by scanning the stored rows.

use crate::core::ports::{RepositoryError, UserRepository};
use crate::core::user::User;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
    is_offline: bool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn ensure_online(&self) -> Result<(), RepositoryError> {
        if self.is_offline {
            return Err(RepositoryError::Backend("User repository offline".into()));
        }
        Ok(())
    }

    async fn scan(&self, keep: impl Fn(&User) -> bool) -> Result<Vec<User>, RepositoryError> {
        self.ensure_online()?;
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|u| keep(u)).cloned().collect())
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        self.ensure_online()?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        self.scan(|_| true).await
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<User>, RepositoryError> {
        self.scan(|u| u.id.is_some_and(|id| ids.contains(&id))).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let email = email.to_lowercase();
        let mut found = self.scan(|u| u.email.to_lowercase() == email).await?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    async fn find_all_by_email_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<User>, RepositoryError> {
        let fragment = fragment.to_lowercase();
        self.scan(|u| u.email.to_lowercase().contains(&fragment))
            .await
    }

    async fn find_by_birthdate_before(&self, date: NaiveDate) -> Result<Vec<User>, RepositoryError> {
        self.scan(|u| u.birthdate < date).await
    }

    async fn save(&self, mut user: User) -> Result<User, RepositoryError> {
        self.ensure_online()?;
        let mut table = self.table.write().await;
        let id = match user.id {
            Some(id) => {
                table.last_id = table.last_id.max(id);
                id
            }
            None => {
                table.last_id += 1;
                table.last_id
            }
        };
        user.id = Some(id);
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
        self.ensure_online()?;
        if let Some(id) = user.id {
            self.table.write().await.rows.remove(&id);
        }
        Ok(())
    }
}
