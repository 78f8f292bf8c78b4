use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_helpers::{ValidatedJson, ValidatedQuery};
use std::sync::Arc;

use crate::error::BookResult;
use crate::models::{
    Book, BookMutationResponse, BookRef, CompleteBook, CreateBook, ListBooksQuery, UpdateBook,
};
use crate::repository::BookRepository;
use crate::service::BookService;

/// List a user's books
#[utoipa::path(
    get,
    path = "",
    tag = "books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "Books owned by the user", body = Vec<Book>),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn list_books<R: BookRepository>(
    State(service): State<Arc<BookService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ListBooksQuery>,
) -> BookResult<Json<Vec<Book>>> {
    let books = service.list_books(query).await?;
    Ok(Json(books))
}

/// Register a book
#[utoipa::path(
    post,
    path = "",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book registered", body = BookMutationResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn create_book<R: BookRepository>(
    State(service): State<Arc<BookService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateBook>,
) -> BookResult<impl IntoResponse> {
    let book = service.register_book(input).await?;
    Ok((StatusCode::CREATED, Json(BookMutationResponse::created(book))))
}

/// Replace a book's fields, scoped to its owner
#[utoipa::path(
    put,
    path = "",
    tag = "books",
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Update applied; `affected` is 0 when nothing matched", body = BookMutationResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn update_book<R: BookRepository>(
    State(service): State<Arc<BookService<R>>>,
    ValidatedJson(input): ValidatedJson<UpdateBook>,
) -> BookResult<Json<BookMutationResponse>> {
    let affected = service.update_book(input).await?;
    Ok(Json(BookMutationResponse::affected(
        "Book updated successfully",
        affected,
    )))
}

/// Delete a book, scoped to its owner
#[utoipa::path(
    delete,
    path = "",
    tag = "books",
    request_body = BookRef,
    responses(
        (status = 200, description = "Delete applied; `affected` is 0 when nothing matched", body = BookMutationResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn delete_book<R: BookRepository>(
    State(service): State<Arc<BookService<R>>>,
    ValidatedJson(input): ValidatedJson<BookRef>,
) -> BookResult<Json<BookMutationResponse>> {
    let affected = service.delete_book(input).await?;
    Ok(Json(BookMutationResponse::affected(
        "Book deleted successfully",
        affected,
    )))
}

/// Mark a book as completed
#[utoipa::path(
    post,
    path = "/complete",
    tag = "books",
    request_body = CompleteBook,
    responses(
        (status = 200, description = "Completion applied", body = BookMutationResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn complete_book<R: BookRepository>(
    State(service): State<Arc<BookService<R>>>,
    ValidatedJson(input): ValidatedJson<CompleteBook>,
) -> BookResult<Json<BookMutationResponse>> {
    let affected = service.complete_book(input).await?;
    Ok(Json(BookMutationResponse::affected(
        "Book marked as completed",
        affected,
    )))
}
