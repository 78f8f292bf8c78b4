use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_line_user_id(&self, line_user_id: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::LineUserId.eq(line_user_id))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn insert_if_absent(&self, line_user_id: &str, display_name: &str) -> UserResult<User> {
        let active_model: entity::ActiveModel = User::new(line_user_id, display_name).into();

        // INSERT ... ON CONFLICT (line_user_id) DO NOTHING
        let inserted = entity::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(entity::Column::LineUserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        if inserted > 0 {
            tracing::info!(line_user_id = %line_user_id, "Created user");
        }

        self.find_by_line_user_id(line_user_id)
            .await?
            .ok_or_else(|| {
                UserError::Internal(format!("user {} missing after upsert", line_user_id))
            })
    }

    async fn line_user_id_for(&self, user_id: Uuid) -> UserResult<Option<String>> {
        let line_user_id = entity::Entity::find_by_id(user_id)
            .select_only()
            .column(entity::Column::LineUserId)
            .into_tuple::<String>()
            .one(&self.db)
            .await?;

        Ok(line_user_id)
    }
}
