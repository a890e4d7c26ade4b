use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "user";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn success() -> Self {
        Self {
            message: "success".to_string(),
        }
    }
}

/// `POST /user/auth`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub alarm: Option<bool>,
    pub expo_push_token: Option<String>,
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub name: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserState {
    pub user_state_id: String,
    pub user_id: String,
    pub role: String,
    pub status: String,
    pub alarm: bool,
    pub expo_push_token: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub name: String,
    pub alarm: bool,
    pub expo_push_token: Option<String>,
    pub created_date: DateTime<Utc>,
}

/// `GET /user`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub alarm: bool,
    pub expo_push_token: Option<String>,
    /// Unix seconds
    pub created_date: i64,
}

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Self {
            name: record.name,
            alarm: record.alarm,
            expo_push_token: record.expo_push_token,
            created_date: record.created_date.timestamp(),
        }
    }
}

/// `PUT /user`; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub alarm: Option<bool>,
    pub expo_push_token: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.alarm.is_none() && self.expo_push_token.is_none()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionRecord {
    pub question_id: String,
    pub content: String,
    pub is_answered: bool,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub content: String,
    pub is_answered: bool,
    /// Unix seconds
    pub created_date: i64,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        Self {
            question_id: record.question_id,
            content: record.content,
            is_answered: record.is_answered,
            created_date: record.created_date.timestamp(),
        }
    }
}

/// Parameters of every `/question` method
///
/// Accepted from the query string or a JSON body. When the query string
/// carries any parameter the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct QuestionParams {
    #[serde(alias = "questionId")]
    pub question_id: Option<String>,
    pub content: Option<String>,
}

impl QuestionParams {
    pub fn is_empty(&self) -> bool {
        self.question_id.is_none() && self.content.is_none()
    }

    pub fn from_parts(query: QuestionParams, body: Option<QuestionParams>) -> Self {
        if query.is_empty() {
            body.unwrap_or_default()
        } else {
            query
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCreated {
    pub message: String,
    pub question_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(question_id: Option<&str>, content: Option<&str>) -> QuestionParams {
        QuestionParams {
            question_id: question_id.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn test_query_parameters_win_over_body() {
        let merged = QuestionParams::from_parts(
            params(Some("q-query"), None),
            Some(params(Some("q-body"), Some("body content"))),
        );
        assert_eq!(merged, params(Some("q-query"), None));
    }

    #[test]
    fn test_body_used_without_query_parameters() {
        let merged = QuestionParams::from_parts(
            QuestionParams::default(),
            Some(params(Some("q-body"), Some("text"))),
        );
        assert_eq!(merged, params(Some("q-body"), Some("text")));

        assert!(QuestionParams::from_parts(QuestionParams::default(), None).is_empty());
    }
}
