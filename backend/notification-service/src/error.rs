use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotificationError>;

/// Failure while handling one queue message
///
/// None of these are retried; the message is logged and left behind.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<sqlx::Error> for NotificationError {
    fn from(err: sqlx::Error) -> Self {
        NotificationError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for NotificationError {
    fn from(err: serde_json::Error) -> Self {
        NotificationError::InvalidPayload(err.to_string())
    }
}
