//! Optional shared-secret bearer guard for machine-triggered endpoints.

use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// A bearer secret that may or may not be configured.
///
/// When unset, every request passes. When set, the request must carry
/// `Authorization: Bearer <secret>` exactly.
#[derive(Clone, Default)]
pub struct SharedSecret(Option<Arc<str>>);

impl SharedSecret {
    pub fn new(secret: Option<String>) -> Self {
        Self(secret.filter(|s| !s.is_empty()).map(Arc::from))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    pub fn verify(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let Some(expected) = self.0.as_deref() else {
            return Ok(());
        };

        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match presented {
            Some(token) if token == expected => Ok(()),
            Some(_) => Err(AppError::Unauthorized("Invalid bearer token".to_string())),
            None => Err(AppError::Unauthorized("Missing bearer token".to_string())),
        }
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedSecret")
            .field(&self.0.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Route layer rejecting requests that fail [`SharedSecret::verify`] with 401.
///
/// ```ignore
/// Router::new()
///     .route("/check", get(check).post(check))
///     .route_layer(middleware::from_fn_with_state(secret, require_shared_secret))
/// ```
pub async fn require_shared_secret(
    State(secret): State<SharedSecret>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    secret.verify(request.headers())?;
    Ok(next.run(request).await)
}
