use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::error::{BookError, BookResult};
use crate::models::{
    Book, BookRef, CompleteBook, CreateBook, ListBooksQuery, SweepReport, UpdateBook, parse_id,
};
use crate::repository::BookRepository;
use crate::sweep::DeadlineSweeper;

/// Service layer for Book business logic
pub struct BookService<R: BookRepository> {
    repository: Arc<R>,
    sweeper: Option<Arc<DeadlineSweeper>>,
}

impl<R: BookRepository> Clone for BookService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            sweeper: self.sweeper.clone(),
        }
    }
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            sweeper: None,
        }
    }

    pub fn with_sweeper(mut self, sweeper: DeadlineSweeper) -> Self {
        self.sweeper = Some(Arc::new(sweeper));
        self
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id, title = %input.title))]
    pub async fn register_book(&self, input: CreateBook) -> BookResult<Book> {
        input.validate()?;
        let owner = parse_id("user_id", &input.user_id)?;

        self.repository.create(owner, input).await
    }

    #[instrument(skip(self, query), fields(user_id = %query.user_id))]
    pub async fn list_books(&self, query: ListBooksQuery) -> BookResult<Vec<Book>> {
        query.validate()?;
        let owner = parse_id("user_id", &query.user_id)?;

        self.repository.list_by_user(owner).await
    }

    /// Replace a book's fields; 0 when the book is not the caller's.
    #[instrument(skip(self, input), fields(book_id = %input.book_id, user_id = %input.user_id))]
    pub async fn update_book(&self, input: UpdateBook) -> BookResult<u64> {
        input.validate()?;
        let id = parse_id("book_id", &input.book_id)?;
        let owner = parse_id("user_id", &input.user_id)?;

        self.repository
            .update_scoped(id, owner, input.changes())
            .await
    }

    #[instrument(skip(self, input), fields(book_id = %input.book_id, user_id = %input.user_id))]
    pub async fn delete_book(&self, input: BookRef) -> BookResult<u64> {
        input.validate()?;
        let id = parse_id("book_id", &input.book_id)?;
        let owner = parse_id("user_id", &input.user_id)?;

        self.repository.delete_scoped(id, owner).await
    }

    #[instrument(skip(self, input), fields(book_id = %input.book_id))]
    pub async fn complete_book(&self, input: CompleteBook) -> BookResult<u64> {
        input.validate()?;
        let id = parse_id("book_id", &input.book_id)?;
        let owner = input
            .user_id
            .as_deref()
            .map(|owner| parse_id("user_id", owner))
            .transpose()?;

        self.repository.mark_completed(id, owner).await
    }

    /// Message the owner of every overdue book and mark the delivered ones `insulted`.
    ///
    /// Only the initial query can fail the sweep. Delivery problems are
    /// skipped inside the plan and failed status writes are logged and not
    /// counted.
    #[instrument(skip(self))]
    pub async fn run_deadline_sweep(&self, now: DateTime<Utc>) -> BookResult<SweepReport> {
        let sweeper = self
            .sweeper
            .as_ref()
            .ok_or_else(|| BookError::Internal("deadline sweeper not configured".to_string()))?;

        let candidates = self.repository.find_overdue(now).await?;
        let plan = sweeper.plan(candidates, now).await;

        let mut notified = 0;
        for transition in &plan.transitions {
            match self.repository.mark_insulted(transition.book_id).await {
                Ok(0) => warn!(
                    book_id = %transition.book_id,
                    "Book left the sweepable set before it could be marked"
                ),
                Ok(_) => notified += 1,
                Err(e) => error!(
                    book_id = %transition.book_id,
                    error = %e,
                    "Failed to mark book as insulted"
                ),
            }
        }

        let report = SweepReport {
            candidates: plan.considered,
            notified,
        };
        info!(
            candidates = report.candidates,
            notified = report.notified,
            skipped = plan.skipped.len(),
            "Deadline sweep finished"
        );
        Ok(report)
    }

    /// Sweep against the current time.
    pub async fn sweep_now(&self) -> BookResult<SweepReport> {
        self.run_deadline_sweep(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookStatus;
    use crate::repository::{InMemoryBookRepository, MockBookRepository};
    use crate::sweep::fakes::{RecordingMessenger, StaticLookup};
    use chrono::{Duration, TimeZone};
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn create_input(owner: &str, title: &str) -> CreateBook {
        CreateBook {
            user_id: owner.to_string(),
            title: title.to_string(),
            author: "Author".to_string(),
            deadline: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            status: BookStatus::Unread,
            insult_level: 1,
        }
    }

    #[tokio::test]
    async fn register_rejects_missing_fields_without_insert() {
        let mut repo = MockBookRepository::new();
        repo.expect_create().never();
        let service = BookService::new(repo);

        for input in [
            create_input(&Uuid::new_v4().to_string(), ""),
            create_input("", "Dune"),
            CreateBook {
                author: String::new(),
                ..create_input(&Uuid::new_v4().to_string(), "Dune")
            },
        ] {
            let err = service.register_book(input).await.unwrap_err();
            assert!(matches!(err, BookError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn register_passes_parsed_owner() {
        let owner = Uuid::new_v4();
        let mut repo = MockBookRepository::new();
        repo.expect_create()
            .withf(move |id, input| *id == owner && input.title == "Dune")
            .times(1)
            .returning(|owner, input| {
                let now = Utc::now();
                Ok(Book {
                    id: Uuid::new_v4(),
                    user_id: owner,
                    title: input.title,
                    author: input.author,
                    deadline: input.deadline,
                    status: input.status,
                    insult_level: input.insult_level,
                    created_at: now,
                    updated_at: now,
                })
            });

        let book = BookService::new(repo)
            .register_book(create_input(&owner.to_string(), "Dune"))
            .await
            .unwrap();
        assert_eq!(book.user_id, owner);
    }

    #[tokio::test]
    async fn complete_without_owner_is_unscoped() {
        let id = Uuid::new_v4();
        let mut repo = MockBookRepository::new();
        repo.expect_mark_completed()
            .with(eq(id), eq(None))
            .times(1)
            .returning(|_, _| Ok(1));

        let affected = BookService::new(repo)
            .complete_book(CompleteBook {
                book_id: id.to_string(),
                user_id: None,
            })
            .await
            .unwrap();
        assert_eq!(affected, 1);
    }

    #[tokio::test]
    async fn sweep_store_failure_is_an_error() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_overdue()
            .returning(|_| Err(BookError::Database("connection refused".into())));
        repo.expect_mark_insulted().never();

        let sweeper = DeadlineSweeper::new(
            Arc::new(StaticLookup::default()),
            Arc::new(RecordingMessenger::default()),
        );
        let err = BookService::new(repo)
            .with_sweeper(sweeper)
            .run_deadline_sweep(Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, BookError::Database(_)));
    }

    #[tokio::test]
    async fn sweep_without_sweeper_is_internal_error() {
        let service = BookService::new(InMemoryBookRepository::new());
        assert!(matches!(
            service.run_deadline_sweep(Utc::now()).await,
            Err(BookError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn failed_transition_write_is_not_counted() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let overdue = Book {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            deadline: now - Duration::days(1),
            status: BookStatus::Unread,
            insult_level: 1,
            created_at: now,
            updated_at: now,
        };

        let mut repo = MockBookRepository::new();
        let returned = overdue.clone();
        repo.expect_find_overdue()
            .returning(move |_| Ok(vec![returned.clone()]));
        repo.expect_mark_insulted()
            .with(eq(overdue.id))
            .times(1)
            .returning(|_| Err(BookError::Database("deadlock".into())));

        let sweeper = DeadlineSweeper::new(
            Arc::new(StaticLookup {
                recipients: [(owner, "U".to_string())].into(),
                ..Default::default()
            }),
            Arc::new(RecordingMessenger::default()),
        );

        let report = BookService::new(repo)
            .with_sweeper(sweeper)
            .run_deadline_sweep(now)
            .await
            .unwrap();
        assert_eq!(
            report,
            SweepReport {
                candidates: 1,
                notified: 0
            }
        );
    }

    #[tokio::test]
    async fn example_sweep_marks_book_insulted() {
        let owner = Uuid::new_v4();
        let repo = InMemoryBookRepository::new();
        let created = repo
            .create(owner, create_input(&owner.to_string(), "Dune"))
            .await
            .unwrap();

        let messenger = Arc::new(RecordingMessenger::default());
        let sweeper = DeadlineSweeper::new(
            Arc::new(StaticLookup {
                recipients: [(owner, "U-owner".to_string())].into(),
                ..Default::default()
            }),
            messenger.clone(),
        )
        .with_seed(3);
        let service = BookService::new(repo.clone()).with_sweeper(sweeper);

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let report = service.run_deadline_sweep(now).await.unwrap();

        assert_eq!(report.notified, 1);
        assert_eq!(repo.get(created.id).await.unwrap().status, BookStatus::Insulted);
        assert_eq!(messenger.sent().len(), 1);

        // Insulted books stay eligible and are messaged again on the next pass.
        let again = service.run_deadline_sweep(now).await.unwrap();
        assert_eq!(again.notified, 1);
        assert_eq!(messenger.sent().len(), 2);
    }

    #[tokio::test]
    async fn failed_delivery_leaves_status_unchanged() {
        let owner = Uuid::new_v4();
        let repo = InMemoryBookRepository::new();
        let created = repo
            .create(owner, create_input(&owner.to_string(), "Dune"))
            .await
            .unwrap();

        let sweeper = DeadlineSweeper::new(
            Arc::new(StaticLookup {
                recipients: [(owner, "U-blocked".to_string())].into(),
                ..Default::default()
            }),
            Arc::new(RecordingMessenger {
                rejecting: ["U-blocked".to_string()].into(),
                ..Default::default()
            }),
        );

        let report = BookService::new(repo.clone())
            .with_sweeper(sweeper)
            .run_deadline_sweep(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(report.candidates, 1);
        assert_eq!(report.notified, 0);
        assert_eq!(repo.get(created.id).await.unwrap().status, BookStatus::Unread);
    }
}
