use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::ValidatedJson;
use axum_helpers::errors::responses::{
    BadRequestJsonResponse, BadRequestValidationResponse, InternalServerErrorResponse,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{AuthResponse, LineAuthRequest, User};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(line_auth),
    components(
        schemas(User, LineAuthRequest, AuthResponse),
        responses(
            BadRequestJsonResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "auth", description = "LINE identity bootstrap")
    )
)]
pub struct AuthApiDoc;

/// Register the LINE user on first sight
#[utoipa::path(
    post,
    path = "/line",
    tag = "auth",
    request_body = LineAuthRequest,
    responses(
        (status = 200, description = "User exists (created if needed)", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn line_auth<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LineAuthRequest>,
) -> UserResult<Json<AuthResponse>> {
    let user = service.bootstrap_line_user(input).await?;
    Ok(Json(AuthResponse {
        message: "Auth pre-check successful".to_string(),
        user,
    }))
}

/// Router meant to be nested at `/auth`.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/line", post(line_auth::<R>))
        .with_state(Arc::new(service))
}
