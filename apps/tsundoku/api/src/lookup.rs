//! Resolves book owners to LINE recipients through the users store.

use async_trait::async_trait;
use domain_books::{RecipientLookup, RecipientLookupError};
use domain_users::UserRepository;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserRecipientLookup<R: UserRepository> {
    users: Arc<R>,
}

impl<R: UserRepository> UserRecipientLookup<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R: UserRepository + 'static> RecipientLookup for UserRecipientLookup<R> {
    async fn recipient_for(&self, user_id: Uuid) -> Result<Option<String>, RecipientLookupError> {
        self.users
            .line_user_id_for(user_id)
            .await
            .map_err(|e| RecipientLookupError(e.to_string()))
    }
}
