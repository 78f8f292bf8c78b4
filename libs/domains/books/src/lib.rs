//! Books Domain
//!
//! Reading-list CRUD plus the deadline sweep that messages owners of
//! overdue books.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /books, /cron
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌──────────────────┐
//! │   Service   │─────▶│ DeadlineSweeper  │ ← RecipientLookup + MessagingProvider
//! └──────┬──────┘      └──────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + Postgres / in-memory implementations
//! └─────────────┘
//! ```
//!
//! ```rust,no_run
//! use domain_books::{BookService, InMemoryBookRepository, handlers};
//!
//! let service = BookService::new(InMemoryBookRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod insults;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod sweep;

pub use error::{BookError, BookResult};
pub use handlers::{BooksApiDoc, CronApiDoc};
pub use insults::InsultPool;
pub use models::{
    Book, BookChanges, BookRef, BookStatus, CompleteBook, CreateBook, SweepReport, UpdateBook,
};
pub use postgres::PgBookRepository;
pub use repository::{BookRepository, InMemoryBookRepository};
pub use service::BookService;
pub use sweep::{
    DeadlineSweeper, RecipientLookup, RecipientLookupError, SkipReason, StatusTransition,
    SweepPlan,
};
