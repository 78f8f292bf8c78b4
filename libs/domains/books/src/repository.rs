use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::BookResult;
use crate::models::{Book, BookChanges, BookStatus, CreateBook};

/// Repository trait for Book persistence.
///
/// Scoped operations return the number of rows they touched; a book that
/// exists but belongs to someone else counts as zero.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a book for `owner`. Input is already validated.
    async fn create(&self, owner: Uuid, input: CreateBook) -> BookResult<Book>;

    async fn list_by_user(&self, owner: Uuid) -> BookResult<Vec<Book>>;

    async fn update_scoped(&self, id: Uuid, owner: Uuid, changes: BookChanges) -> BookResult<u64>;

    async fn delete_scoped(&self, id: Uuid, owner: Uuid) -> BookResult<u64>;

    /// Set status to `completed`, restricted to `owner` when given.
    async fn mark_completed(&self, id: Uuid, owner: Option<Uuid>) -> BookResult<u64>;

    /// Books in a sweepable status whose deadline is strictly before `now`.
    async fn find_overdue(&self, now: DateTime<Utc>) -> BookResult<Vec<Book>>;

    /// Set status to `insulted` if the book is still sweepable.
    async fn mark_insulted(&self, id: Uuid) -> BookResult<u64>;
}

/// In-memory implementation of BookRepository (for testing and local runs).
///
/// Keeps insertion order, which stands in for the store's natural row order.
#[derive(Clone, Default)]
pub struct InMemoryBookRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fully-formed book, bypassing validation.
    pub async fn insert(&self, book: Book) {
        self.books.write().await.push(book);
    }

    pub async fn get(&self, id: Uuid) -> Option<Book> {
        self.books.read().await.iter().find(|b| b.id == id).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, owner: Uuid, input: CreateBook) -> BookResult<Book> {
        let now = Utc::now();
        let book = Book {
            id: Uuid::now_v7(),
            user_id: owner,
            title: input.title,
            author: input.author,
            deadline: input.deadline,
            status: input.status,
            insult_level: input.insult_level,
            created_at: now,
            updated_at: now,
        };

        self.books.write().await.push(book.clone());
        tracing::info!(book_id = %book.id, user_id = %owner, "Created book");
        Ok(book)
    }

    async fn list_by_user(&self, owner: Uuid) -> BookResult<Vec<Book>> {
        let books = self.books.read().await;
        let mut result: Vec<Book> = books.iter().filter(|b| b.user_id == owner).cloned().collect();
        result.sort_by_key(|b| b.deadline);
        Ok(result)
    }

    async fn update_scoped(&self, id: Uuid, owner: Uuid, changes: BookChanges) -> BookResult<u64> {
        let mut books = self.books.write().await;
        let Some(book) = books.iter_mut().find(|b| b.id == id && b.user_id == owner) else {
            return Ok(0);
        };

        book.title = changes.title;
        book.author = changes.author;
        book.deadline = changes.deadline;
        book.status = changes.status;
        book.insult_level = changes.insult_level;
        book.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete_scoped(&self, id: Uuid, owner: Uuid) -> BookResult<u64> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| !(b.id == id && b.user_id == owner));
        Ok((before - books.len()) as u64)
    }

    async fn mark_completed(&self, id: Uuid, owner: Option<Uuid>) -> BookResult<u64> {
        let mut books = self.books.write().await;
        let Some(book) = books
            .iter_mut()
            .find(|b| b.id == id && owner.is_none_or(|o| o == b.user_id))
        else {
            return Ok(0);
        };

        book.status = BookStatus::Completed;
        book.updated_at = Utc::now();
        Ok(1)
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> BookResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().filter(|b| b.is_overdue(now)).cloned().collect())
    }

    async fn mark_insulted(&self, id: Uuid) -> BookResult<u64> {
        let mut books = self.books.write().await;
        let Some(book) = books
            .iter_mut()
            .find(|b| b.id == id && b.status.is_sweepable())
        else {
            return Ok(0);
        };

        book.status = BookStatus::Insulted;
        book.updated_at = Utc::now();
        Ok(1)
    }
}
