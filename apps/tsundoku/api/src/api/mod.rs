use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::{Router, routing::get};
use axum_helpers::{SharedSecret, create_router, health_router};

pub mod health;

pub const GREETING: &str = "Hello from tsundoku!";

/// The complete application: root routes, `/api` routes, docs and middleware.
pub fn app(state: &AppState) -> Router {
    create_router::<ApiDoc>(root_routes(state.clone()), routes(state))
}

/// Creates the API routes without the `/api` prefix.
///
/// Every sub-router has its state applied, so the result is stateless.
pub fn routes(state: &AppState) -> Router {
    let secret = SharedSecret::new(state.config.cron.secret.clone());
    if !secret.is_enabled() {
        tracing::warn!("CRON_SECRET not set; /api/cron/check accepts unauthenticated requests");
    }

    Router::new()
        .nest("/auth", domain_users::handlers::router(state.users.clone()))
        .nest("/books", domain_books::handlers::router(state.books.clone()))
        .nest(
            "/cron",
            domain_books::handlers::cron_router(state.books.clone(), secret),
        )
}

/// Routes served from the root: greeting, `/health` and `/ready`.
pub fn root_routes(state: AppState) -> Router {
    let ready = Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state.clone());

    Router::new()
        .route("/", get(|| async { GREETING }))
        .merge(health_router(state.config.app))
        .merge(ready)
}
