use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use axum_helpers::SharedSecret;
use chrono::{DateTime, Duration, Utc};
use domain_books::{
    Book, BookChanges, BookError, BookRepository, BookResult, BookService, BookStatus,
    CreateBook, DeadlineSweeper, InMemoryBookRepository, RecipientLookup, RecipientLookupError,
    handlers,
};
use domain_notifications::{MessagingProvider, NotificationError, NotificationResult};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

/// Every user resolves to `U-<uuid>`.
struct EchoLookup;

#[async_trait]
impl RecipientLookup for EchoLookup {
    async fn recipient_for(&self, user_id: Uuid) -> Result<Option<String>, RecipientLookupError> {
        Ok(Some(format!("U-{user_id}")))
    }
}

#[derive(Default)]
struct Outbox {
    fail: bool,
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl MessagingProvider for Outbox {
    async fn push_text(&self, to: &str, _text: &str) -> NotificationResult<()> {
        if self.fail {
            return Err(NotificationError::ConfigError(
                "LINE_CHANNEL_ACCESS_TOKEN not set".into(),
            ));
        }
        self.sent.lock().unwrap().push(to.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "outbox"
    }
}

/// Store that knows no users: every insert fails the owner check.
#[derive(Clone, Default)]
struct NoUsersRepository {
    inner: InMemoryBookRepository,
}

#[async_trait]
impl BookRepository for NoUsersRepository {
    async fn create(&self, owner: Uuid, _input: CreateBook) -> BookResult<Book> {
        Err(BookError::OwnerNotFound(owner))
    }

    async fn list_by_user(&self, owner: Uuid) -> BookResult<Vec<Book>> {
        self.inner.list_by_user(owner).await
    }

    async fn update_scoped(&self, id: Uuid, owner: Uuid, changes: BookChanges) -> BookResult<u64> {
        self.inner.update_scoped(id, owner, changes).await
    }

    async fn delete_scoped(&self, id: Uuid, owner: Uuid) -> BookResult<u64> {
        self.inner.delete_scoped(id, owner).await
    }

    async fn mark_completed(&self, id: Uuid, owner: Option<Uuid>) -> BookResult<u64> {
        self.inner.mark_completed(id, owner).await
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> BookResult<Vec<Book>> {
        self.inner.find_overdue(now).await
    }

    async fn mark_insulted(&self, id: Uuid) -> BookResult<u64> {
        self.inner.mark_insulted(id).await
    }
}

struct TestApp {
    router: Router,
    repo: InMemoryBookRepository,
    outbox: Arc<Outbox>,
}

fn test_app(secret: Option<&str>, outbox: Outbox) -> TestApp {
    let repo = InMemoryBookRepository::new();
    let outbox = Arc::new(outbox);
    let sweeper = DeadlineSweeper::new(Arc::new(EchoLookup), outbox.clone()).with_seed(11);
    let service = BookService::new(repo.clone()).with_sweeper(sweeper);

    let router = Router::new()
        .nest("/books", handlers::router(service.clone()))
        .nest(
            "/cron",
            handlers::cron_router(service, SharedSecret::new(secret.map(String::from))),
        );

    TestApp {
        router,
        repo,
        outbox,
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn seeded_book(owner: Uuid, status: BookStatus, deadline: DateTime<Utc>) -> Book {
    let now = Utc::now();
    Book {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        deadline,
        status,
        insult_level: 2,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn register_then_list() {
    let app = test_app(None, Outbox::default());
    let owner = Uuid::new_v4();

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/books",
        Some(json!({
            "userId": owner,
            "title": "Dune",
            "author": "Frank Herbert",
            "deadline": "2030-01-01T00:00:00Z"
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book registered successfully");
    assert_eq!(body["book"]["status"], "unread");
    assert_eq!(body["book"]["insultLevel"], 1);

    let (status, body) = send(
        &app.router,
        Method::GET,
        &format!("/books?userId={owner}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Dune");
    assert!(books[0]["bookId"].is_string());
}

#[tokio::test]
async fn register_with_missing_fields_creates_nothing() {
    let app = test_app(None, Outbox::default());

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/books",
        Some(json!({
            "userId": "",
            "title": "",
            "author": "Someone",
            "deadline": "2030-01-01T00:00:00Z"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = test_app(None, Outbox::default());
    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/books")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"title\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_without_user_id_is_bad_request() {
    let app = test_app(None, Outbox::default());
    let (status, body) = send(&app.router, Method::GET, "/books", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_by_other_owner_has_no_effect() {
    let app = test_app(None, Outbox::default());
    let owner = Uuid::new_v4();
    let book = seeded_book(owner, BookStatus::Reading, Utc::now());
    app.repo.insert(book.clone()).await;

    let (status, body) = send(
        &app.router,
        Method::DELETE,
        "/books",
        Some(json!({"bookId": book.id, "userId": Uuid::new_v4()})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected"], 0);
    assert!(app.repo.get(book.id).await.is_some());

    let (_, body) = send(
        &app.router,
        Method::DELETE,
        "/books",
        Some(json!({"bookId": book.id, "userId": owner})),
        None,
    )
    .await;
    assert_eq!(body["affected"], 1);
    assert!(app.repo.get(book.id).await.is_none());
}

#[tokio::test]
async fn update_replaces_fields_for_owner() {
    let app = test_app(None, Outbox::default());
    let owner = Uuid::new_v4();
    let book = seeded_book(owner, BookStatus::Unread, Utc::now());
    app.repo.insert(book.clone()).await;

    let (status, body) = send(
        &app.router,
        Method::PUT,
        "/books",
        Some(json!({
            "bookId": book.id,
            "userId": owner,
            "title": "Dune Messiah",
            "author": "Frank Herbert",
            "deadline": "2031-01-01T00:00:00Z",
            "status": "reading",
            "insultLevel": 4
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");
    assert_eq!(body["affected"], 1);

    let stored = app.repo.get(book.id).await.unwrap();
    assert_eq!(stored.title, "Dune Messiah");
    assert_eq!(stored.status, BookStatus::Reading);
    assert_eq!(stored.insult_level, 4);
}

#[tokio::test]
async fn update_rejects_out_of_range_insult_level() {
    let app = test_app(None, Outbox::default());
    let (status, body) = send(
        &app.router,
        Method::PUT,
        "/books",
        Some(json!({
            "bookId": Uuid::new_v4(),
            "userId": Uuid::new_v4(),
            "title": "T",
            "author": "A",
            "deadline": "2031-01-01T00:00:00Z",
            "status": "reading",
            "insultLevel": 6
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["insultLevel"].is_array());
}

#[tokio::test]
async fn complete_marks_book_completed() {
    let app = test_app(None, Outbox::default());
    let book = seeded_book(Uuid::new_v4(), BookStatus::Insulted, Utc::now());
    app.repo.insert(book.clone()).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/books/complete",
        Some(json!({"bookId": book.id})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book marked as completed");
    assert_eq!(
        app.repo.get(book.id).await.unwrap().status,
        BookStatus::Completed
    );
}

#[tokio::test]
async fn cron_requires_configured_secret() {
    let app = test_app(Some("s3cret"), Outbox::default());
    let owner = Uuid::new_v4();
    let book = seeded_book(owner, BookStatus::Unread, Utc::now() - Duration::days(1));
    app.repo.insert(book.clone()).await;

    let (status, body) = send(&app.router, Method::POST, "/cron/check", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(app.repo.get(book.id).await.unwrap().status, BookStatus::Unread);
    assert!(app.outbox.sent.lock().unwrap().is_empty());

    let (status, _) = send(
        &app.router,
        Method::GET,
        "/cron/check",
        None,
        Some("wrong"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/cron/check",
        None,
        Some("s3cret"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Checked deadlines. Found 1 expired books.");
    assert_eq!(body["notified"], 1);
    assert_eq!(
        app.repo.get(book.id).await.unwrap().status,
        BookStatus::Insulted
    );
    assert_eq!(*app.outbox.sent.lock().unwrap(), vec![format!("U-{owner}")]);
}

#[tokio::test]
async fn cron_is_open_without_secret_and_skips_ineligible_books() {
    let app = test_app(None, Outbox::default());
    let owner = Uuid::new_v4();
    let past = Utc::now() - Duration::days(3);

    let overdue = seeded_book(owner, BookStatus::Unread, past);
    let reading = seeded_book(owner, BookStatus::Reading, past);
    let completed = seeded_book(owner, BookStatus::Completed, past);
    let future = seeded_book(owner, BookStatus::Unread, Utc::now() + Duration::days(3));
    for book in [&overdue, &reading, &completed, &future] {
        app.repo.insert(book.clone()).await;
    }

    let (status, body) = send(&app.router, Method::GET, "/cron/check", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notified"], 1);
    assert_eq!(body["candidates"], 1);

    assert_eq!(app.repo.get(overdue.id).await.unwrap().status, BookStatus::Insulted);
    assert_eq!(app.repo.get(reading.id).await.unwrap().status, BookStatus::Reading);
    assert_eq!(app.repo.get(completed.id).await.unwrap().status, BookStatus::Completed);
    assert_eq!(app.repo.get(future.id).await.unwrap().status, BookStatus::Unread);
}

#[tokio::test]
async fn cron_with_failing_messenger_changes_nothing() {
    let app = test_app(
        None,
        Outbox {
            fail: true,
            ..Default::default()
        },
    );
    let book = seeded_book(Uuid::new_v4(), BookStatus::Unread, Utc::now() - Duration::days(1));
    app.repo.insert(book.clone()).await;

    let (status, body) = send(&app.router, Method::POST, "/cron/check", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notified"], 0);
    assert_eq!(body["candidates"], 1);
    assert_eq!(app.repo.get(book.id).await.unwrap().status, BookStatus::Unread);
    assert_eq!(app.repo.find_overdue(Utc::now()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn register_for_unknown_owner_is_not_found() {
    let repo = NoUsersRepository::default();
    let router = Router::new().nest("/books", handlers::router(BookService::new(repo.clone())));
    let owner = Uuid::new_v4();

    let (status, body) = send(
        &router,
        Method::POST,
        "/books",
        Some(json!({
            "userId": owner,
            "title": "Dune",
            "author": "Frank Herbert",
            "deadline": "2030-01-01T00:00:00Z"
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], format!("User {owner} not found"));

    let uri = format!("/books?userId={owner}");
    let (status, body) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert!(repo.inner.is_empty().await);
}
