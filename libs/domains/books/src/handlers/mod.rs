mod books;
mod cron;

use axum::{Router, middleware, routing::get, routing::post};
use axum_helpers::errors::responses::{
    BadRequestJsonResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    NotFoundResponse, UnauthorizedResponse,
};
use axum_helpers::{ErrorResponse, SharedSecret, require_shared_secret};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

use crate::models::{
    Book, BookMutationResponse, BookRef, BookStatus, CompleteBook, CreateBook, CronCheckResponse,
    UpdateBook,
};
use crate::repository::BookRepository;
use crate::service::BookService;

pub use books::{complete_book, create_book, delete_book, list_books, update_book};
pub use cron::check_deadlines;

#[derive(OpenApi)]
#[openapi(
    paths(
        books::list_books,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::complete_book,
    ),
    components(
        schemas(
            Book,
            BookStatus,
            CreateBook,
            UpdateBook,
            BookRef,
            CompleteBook,
            BookMutationResponse,
            ErrorResponse
        ),
        responses(
            BadRequestJsonResponse,
            BadRequestValidationResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "books", description = "Reading list management")
    )
)]
pub struct BooksApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(cron::check_deadlines),
    components(
        schemas(CronCheckResponse),
        responses(UnauthorizedResponse, InternalServerErrorResponse)
    ),
    modifiers(&CronSecurity),
    tags(
        (name = "cron", description = "Scheduler-triggered jobs")
    )
)]
pub struct CronApiDoc;

struct CronSecurity;

impl utoipa::Modify for CronSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cron_secret",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Book CRUD routes, meant to be nested at `/books`.
pub fn router<R: BookRepository + 'static>(service: BookService<R>) -> Router {
    Router::new()
        .route(
            "/",
            get(list_books::<R>)
                .post(create_book::<R>)
                .put(update_book::<R>)
                .delete(delete_book::<R>),
        )
        .route("/complete", post(complete_book::<R>))
        .with_state(Arc::new(service))
}

/// Sweep trigger, meant to be nested at `/cron`. Requests must carry the
/// bearer secret when one is configured.
pub fn cron_router<R: BookRepository + 'static>(
    service: BookService<R>,
    secret: SharedSecret,
) -> Router {
    Router::new()
        .route("/check", get(check_deadlines::<R>).post(check_deadlines::<R>))
        .route_layer(middleware::from_fn_with_state(secret, require_shared_secret))
        .with_state(Arc::new(service))
}
