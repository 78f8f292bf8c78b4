//! Users Domain
//!
//! Users are created lazily the first time a LINE identity bootstraps
//! against the API and are never deleted here.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /auth/line
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, default display name
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + Postgres / in-memory implementations
//! └─────────────┘
//! ```
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::AuthApiDoc;
pub use models::{AuthResponse, LineAuthRequest, User};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{DEFAULT_DISPLAY_NAME, UserService};
