use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{BookError, BookResult},
    models::{Book, BookChanges, BookStatus, CreateBook},
    repository::BookRepository,
};

#[derive(Clone)]
pub struct PgBookRepository {
    db: DatabaseConnection,
}

impl PgBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sweepable() -> Condition {
    BookStatus::SWEEPABLE
        .iter()
        .fold(Condition::any(), |cond, status| {
            cond.add(entity::Column::Status.eq(*status))
        })
}

fn owner_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn create(&self, owner: Uuid, input: CreateBook) -> BookResult<Book> {
        let model = entity::new_book(owner, input)
            .insert(&self.db)
            .await
            .map_err(|e| {
                if owner_violation(&e) {
                    BookError::OwnerNotFound(owner)
                } else {
                    e.into()
                }
            })?;

        tracing::info!(book_id = %model.id, user_id = %owner, "Created book");
        Ok(model.into())
    }

    async fn list_by_user(&self, owner: Uuid) -> BookResult<Vec<Book>> {
        let models = entity::Entity::find()
            .filter(entity::Column::UserId.eq(owner))
            .order_by_asc(entity::Column::Deadline)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_scoped(&self, id: Uuid, owner: Uuid, changes: BookChanges) -> BookResult<u64> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Title, Expr::value(changes.title))
            .col_expr(entity::Column::Author, Expr::value(changes.author))
            .col_expr(entity::Column::Deadline, Expr::value(changes.deadline))
            .col_expr(entity::Column::Status, changes.status.as_enum())
            .col_expr(entity::Column::InsultLevel, Expr::value(changes.insult_level))
            .col_expr(entity::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::UserId.eq(owner))
            .exec(&self.db)
            .await?;

        tracing::info!(book_id = %id, rows = result.rows_affected, "Updated book");
        Ok(result.rows_affected)
    }

    async fn delete_scoped(&self, id: Uuid, owner: Uuid) -> BookResult<u64> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::UserId.eq(owner))
            .exec(&self.db)
            .await?;

        tracing::info!(book_id = %id, rows = result.rows_affected, "Deleted book");
        Ok(result.rows_affected)
    }

    async fn mark_completed(&self, id: Uuid, owner: Option<Uuid>) -> BookResult<u64> {
        let mut query = entity::Entity::update_many()
            .col_expr(entity::Column::Status, BookStatus::Completed.as_enum())
            .col_expr(entity::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::Column::Id.eq(id));

        if let Some(owner) = owner {
            query = query.filter(entity::Column::UserId.eq(owner));
        }

        let result = query.exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> BookResult<Vec<Book>> {
        let models = entity::Entity::find()
            .filter(sweepable())
            .filter(entity::Column::Deadline.lt(now))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn mark_insulted(&self, id: Uuid) -> BookResult<u64> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, BookStatus::Insulted.as_enum())
            .col_expr(entity::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::Column::Id.eq(id))
            .filter(sweepable())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
