use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A person known by their LINE user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Identifier issued by LINE; unique across users
    pub line_user_id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(line_user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            line_user_id: line_user_id.into(),
            display_name: display_name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /auth/line`, sent by the client after LIFF login.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LineAuthRequest {
    /// Access token obtained on the client. Accepted but not verified here.
    #[serde(rename = "lineAccessToken", default)]
    pub line_access_token: Option<String>,
    #[serde(rename = "lineUserID")]
    #[validate(length(min = 1, max = 255, message = "lineUserID must not be empty"))]
    pub line_user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_camel_case() {
        let user = User::new("U1", "LINE User");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["lineUserId"], "U1");
        assert_eq!(json["displayName"], "LINE User");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn auth_request_uses_line_field_names() {
        let req: LineAuthRequest =
            serde_json::from_str(r#"{"lineAccessToken":"tok","lineUserID":"U42"}"#).unwrap();
        assert_eq!(req.line_user_id, "U42");
        assert_eq!(req.line_access_token.as_deref(), Some("tok"));

        let req: LineAuthRequest = serde_json::from_str(r#"{"lineUserID":"U42"}"#).unwrap();
        assert!(req.line_access_token.is_none());
    }

    #[test]
    fn empty_line_user_id_is_invalid() {
        let req = LineAuthRequest {
            line_access_token: None,
            line_user_id: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
