//! Messaging provider implementations.

mod line;

pub use line::{DEFAULT_LINE_API_URL, LineConfig, LineProvider};

use crate::error::NotificationResult;
use async_trait::async_trait;

/// Pushes a single text message to a recipient identified by an opaque
/// platform id.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn push_text(&self, to: &str, text: &str) -> NotificationResult<()>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
