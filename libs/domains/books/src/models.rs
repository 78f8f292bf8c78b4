use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Reading status of a book
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "book_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookStatus {
    #[default]
    #[sea_orm(string_value = "unread")]
    Unread,
    #[sea_orm(string_value = "reading")]
    Reading,
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Deadline passed and the owner has been messaged at least once
    #[sea_orm(string_value = "insulted")]
    Insulted,
}

impl BookStatus {
    /// Statuses the deadline sweep picks up.
    pub const SWEEPABLE: [BookStatus; 2] = [BookStatus::Unread, BookStatus::Insulted];

    pub fn is_sweepable(self) -> bool {
        Self::SWEEPABLE.contains(&self)
    }
}

pub const MIN_INSULT_LEVEL: i32 = 1;
pub const MAX_INSULT_LEVEL: i32 = 5;

fn default_insult_level() -> i32 {
    MIN_INSULT_LEVEL
}

/// A book on someone's pile, with the date it should have been read by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "bookId")]
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    pub title: String,
    pub author: String,
    pub deadline: DateTime<Utc>,
    pub status: BookStatus,
    /// 1 (gentle) to 5 (brutal); stored but not yet used to pick messages
    pub insult_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// True when the sweep should message the owner about this book at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status.is_sweepable() && self.deadline < now
    }
}

/// DTO for registering a book
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(custom(function = "validate_uuid"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 255, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "author must not be empty"))]
    pub author: String,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default = "default_insult_level")]
    #[validate(range(min = 1, max = 5, message = "insultLevel must be between 1 and 5"))]
    pub insult_level: i32,
}

/// DTO for replacing the editable fields of a book owned by `userId`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(custom(function = "validate_uuid"))]
    pub book_id: String,
    #[validate(custom(function = "validate_uuid"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 255, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "author must not be empty"))]
    pub author: String,
    pub deadline: DateTime<Utc>,
    pub status: BookStatus,
    #[validate(range(min = 1, max = 5, message = "insultLevel must be between 1 and 5"))]
    pub insult_level: i32,
}

impl UpdateBook {
    pub fn changes(&self) -> BookChanges {
        BookChanges {
            title: self.title.clone(),
            author: self.author.clone(),
            deadline: self.deadline,
            status: self.status,
            insult_level: self.insult_level,
        }
    }
}

/// Full replacement of a book's editable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct BookChanges {
    pub title: String,
    pub author: String,
    pub deadline: DateTime<Utc>,
    pub status: BookStatus,
    pub insult_level: i32,
}

/// Identifies a book together with the user it must belong to
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    #[validate(custom(function = "validate_uuid"))]
    pub book_id: String,
    #[validate(custom(function = "validate_uuid"))]
    pub user_id: String,
}

/// Body of `POST /books/complete`. When `userId` is given only that user's
/// book is touched.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteBook {
    #[validate(custom(function = "validate_uuid"))]
    pub book_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_uuid"))]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// Owner whose books are listed
    #[serde(rename = "userId")]
    #[validate(custom(function = "validate_uuid"))]
    pub user_id: String,
}

/// Response for mutations: a message plus the created book or the number of rows touched.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookMutationResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected: Option<u64>,
}

impl BookMutationResponse {
    pub fn created(book: Book) -> Self {
        Self {
            message: "Book registered successfully".to_string(),
            book: Some(book),
            affected: None,
        }
    }

    pub fn affected(message: impl Into<String>, affected: u64) -> Self {
        Self {
            message: message.into(),
            book: None,
            affected: Some(affected),
        }
    }
}

/// Outcome of one deadline sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepReport {
    /// Overdue books considered
    pub candidates: usize,
    /// Books whose owner was messaged and which are now `insulted`
    pub notified: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CronCheckResponse {
    pub message: String,
    pub notified: usize,
    pub candidates: usize,
}

impl From<SweepReport> for CronCheckResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            message: format!(
                "Checked deadlines. Found {} expired books.",
                report.notified
            ),
            notified: report.notified,
            candidates: report.candidates,
        }
    }
}

fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("uuid");
        err.message = Some(format!("'{}' is not a valid id", value).into());
        err
    })
}

/// Parse an id that already passed `validate_uuid`, reporting `field` if it does not.
pub(crate) fn parse_id(field: &'static str, value: &str) -> Result<Uuid, ValidationErrors> {
    Uuid::parse_str(value).map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add(field, ValidationError::new("uuid"));
        errors
    })
}
