use axum::{Json, extract::State};
use std::sync::Arc;

use crate::error::BookResult;
use crate::models::CronCheckResponse;
use crate::repository::BookRepository;
use crate::service::BookService;

/// Run the deadline sweep now
#[utoipa::path(
    post,
    path = "/check",
    tag = "cron",
    security(("cron_secret" = [])),
    responses(
        (status = 200, description = "Sweep finished", body = CronCheckResponse),
        (status = 401, response = axum_helpers::errors::responses::UnauthorizedResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn check_deadlines<R: BookRepository>(
    State(service): State<Arc<BookService<R>>>,
) -> BookResult<Json<CronCheckResponse>> {
    let report = service.sweep_now().await?;
    Ok(Json(report.into()))
}
