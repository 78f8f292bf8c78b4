//! HTTP middleware: CORS, the OPTIONS short-circuit, security headers and
//! the shared-secret bearer guard.
//!
//! ```ignore
//! use axum_helpers::http::{answer_preflight, create_permissive_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(axum::middleware::from_fn(answer_preflight))
//!     .layer(create_permissive_cors_layer());
//! ```

pub mod bearer;
pub mod cors;
pub mod security;

pub use bearer::{SharedSecret, require_shared_secret};
pub use cors::{answer_preflight, create_permissive_cors_layer};
pub use security::security_headers;
