use crate::models::{Book, BookStatus, CreateBook};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the books table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "book_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub author: String,
    pub deadline: DateTimeWithTimeZone,
    pub status: BookStatus,
    pub insult_level: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            author: model.author,
            deadline: model.deadline.into(),
            status: model.status,
            insult_level: model.insult_level,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Builds the row for a validated [`CreateBook`] owned by `owner`.
pub fn new_book(owner: Uuid, input: CreateBook) -> ActiveModel {
    let now = Utc::now();
    ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(owner),
        title: Set(input.title),
        author: Set(input.author),
        deadline: Set(input.deadline.into()),
        status: Set(input.status),
        insult_level: Set(input.insult_level),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}
