use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_line_user_id(&self, line_user_id: &str) -> UserResult<Option<User>>;

    /// Insert a user for `line_user_id` unless one already exists, and return
    /// the stored row. Concurrent calls for the same id yield one row.
    async fn insert_if_absent(&self, line_user_id: &str, display_name: &str) -> UserResult<User>;

    /// LINE user id of the user with primary key `user_id`, if any.
    async fn line_user_id_for(&self, user_id: Uuid) -> UserResult<Option<String>>;
}

/// In-memory implementation of UserRepository (for testing and local runs)
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_line_user_id(&self, line_user_id: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.line_user_id == line_user_id)
            .cloned())
    }

    async fn insert_if_absent(&self, line_user_id: &str, display_name: &str) -> UserResult<User> {
        let mut users = self.users.write().await;

        if let Some(existing) = users.values().find(|u| u.line_user_id == line_user_id) {
            return Ok(existing.clone());
        }

        let user = User::new(line_user_id, display_name);
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, line_user_id = %line_user_id, "Created user");
        Ok(user)
    }

    async fn line_user_id_for(&self, user_id: Uuid) -> UserResult<Option<String>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).map(|u| u.line_user_id.clone()))
    }
}
