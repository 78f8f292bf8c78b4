//! Outbound push messaging.
//!
//! The [`MessagingProvider`] trait is the seam the deadline sweep delivers
//! through; [`LineProvider`] implements it against the LINE Messaging API.

pub mod error;
pub mod providers;

pub use error::{NotificationError, NotificationResult};
pub use providers::{LineConfig, LineProvider, MessagingProvider};
