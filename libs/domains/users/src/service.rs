use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::UserResult;
use crate::models::{LineAuthRequest, User};
use crate::repository::UserRepository;

/// Display name given to users created through LINE bootstrap.
pub const DEFAULT_DISPLAY_NAME: &str = "LINE User";

#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Make sure a user row exists for the LINE identity and return it.
    ///
    /// The access token is trusted as-is; identity is established client-side.
    #[instrument(skip(self, input), fields(line_user_id = %input.line_user_id))]
    pub async fn bootstrap_line_user(&self, input: LineAuthRequest) -> UserResult<User> {
        input.validate()?;

        if input.line_access_token.is_none() {
            tracing::debug!("Bootstrap request without a LINE access token");
        }

        self.repository
            .insert_if_absent(&input.line_user_id, DEFAULT_DISPLAY_NAME)
            .await
    }
}
