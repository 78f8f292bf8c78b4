use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Tsundoku API",
        version = "0.1.0",
        description = "Register the books you mean to read, with a deadline. Miss it and LINE will tell you about it."
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/auth", api = domain_users::AuthApiDoc),
        (path = "/books", api = domain_books::BooksApiDoc),
        (path = "/cron", api = domain_books::CronApiDoc)
    )
)]
pub struct ApiDoc;
