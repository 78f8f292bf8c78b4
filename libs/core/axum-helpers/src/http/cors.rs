use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

/// Methods advertised to browsers.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::POST,
    Method::GET,
    Method::OPTIONS,
    Method::PUT,
    Method::DELETE,
];

/// CORS layer that accepts any origin.
///
/// Allows `Accept`, `Content-Type`, `Content-Length`, `Accept-Encoding`,
/// `X-CSRF-Token` and `Authorization` request headers on the methods in
/// [`ALLOWED_METHODS`].
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            header::AUTHORIZATION,
        ])
}

/// Answers every `OPTIONS` request with an empty 200 before it reaches a handler.
///
/// `CorsLayer` only short-circuits real preflights (those carrying
/// `Access-Control-Request-Method`); this covers the bare ones.
pub async fn answer_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;
        return response;
    }

    next.run(request).await
}
