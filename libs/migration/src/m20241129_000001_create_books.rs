use crate::m20241129_000000_create_users::Users;
use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(BookStatus::Enum)
                    .values(BookStatus::variants())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(pk_uuid(Books::BookId))
                    .col(uuid(Books::UserId))
                    .col(string(Books::Title))
                    .col(string(Books::Author))
                    .col(timestamp_with_time_zone(Books::Deadline))
                    .col(
                        ColumnDef::new(Books::Status)
                            .enumeration(BookStatus::Enum, BookStatus::variants())
                            .not_null()
                            .default("unread"),
                    )
                    .col(
                        integer(Books::InsultLevel)
                            .default(1)
                            .check(Expr::col(Books::InsultLevel).between(1, 5)),
                    )
                    .col(
                        timestamp_with_time_zone(Books::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Books::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_books_user_id")
                            .from(Books::Table, Books::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_user_id")
                    .table(Books::Table)
                    .col(Books::UserId)
                    .to_owned(),
            )
            .await?;

        // The sweep filters on status and deadline together
        manager
            .create_index(
                Index::create()
                    .name("idx_books_status_deadline")
                    .table(Books::Table)
                    .col(Books::Status)
                    .col(Books::Deadline)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER books_touch_updated_at
                    BEFORE UPDATE ON books
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS books_touch_updated_at ON books")
            .await?;

        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BookStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Books {
    Table,
    BookId,
    UserId,
    Title,
    Author,
    Deadline,
    Status,
    InsultLevel,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BookStatus {
    #[sea_orm(iden = "book_status")]
    Enum,
    Unread,
    Reading,
    Completed,
    Insulted,
}

impl BookStatus {
    fn variants() -> [BookStatus; 4] {
        [
            BookStatus::Unread,
            BookStatus::Reading,
            BookStatus::Completed,
            BookStatus::Insulted,
        ]
    }
}
