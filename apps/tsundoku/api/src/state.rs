use crate::config::Config;
use crate::lookup::UserRecipientLookup;
use domain_books::{BookService, DeadlineSweeper, PgBookRepository};
use domain_notifications::LineProvider;
use domain_users::{PgUserRepository, UserService};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Everything the routers and the scheduler share.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabaseConnection,
    pub users: UserService<PgUserRepository>,
    pub books: BookService<PgBookRepository>,
}

impl AppState {
    /// Wires the Postgres repositories, the LINE provider and the sweeper.
    pub fn new(config: Config, db: DatabaseConnection) -> Self {
        if !config.line.is_configured() {
            tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN not set; deadline sweeps will notify nobody");
        }

        let user_repository = Arc::new(PgUserRepository::new(db.clone()));
        let users = UserService::from_shared(Arc::clone(&user_repository));

        let sweeper = DeadlineSweeper::new(
            Arc::new(UserRecipientLookup::new(user_repository)),
            Arc::new(LineProvider::new(config.line.clone())),
        );
        let books = BookService::new(PgBookRepository::new(db.clone())).with_sweeper(sweeper);

        Self {
            config,
            db,
            users,
            books,
        }
    }
}
