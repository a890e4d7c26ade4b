//! Shared error taxonomy for the HTTP services
//!
//! Every resource operation returns `Result<_, ServiceError>`. The enum maps
//! onto a fixed set of HTTP statuses and renders a `{"message": ...}` body.
//! Store and provider failures collapse into `Internal`, whose detail is
//! logged but never sent to the client.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or invalid required field
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No resolvable session
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Method not allowed")]
    MethodNotSupported,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Store or provider failure
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthenticated => 401,
            ServiceError::NotFound(_) => 404,
            ServiceError::MethodNotSupported => 405,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Message safe to return to the caller
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::BadRequest(msg) => msg.clone(),
            ServiceError::Unauthenticated => "unauthenticated".to_string(),
            ServiceError::MethodNotSupported => "Method Not Allowed".to_string(),
            ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::Internal(_) => "internal server error".to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.public_message(),
        }
    }
}

/// Body of every non-2xx response except the renewal contract
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if let ServiceError::Internal(detail) = self {
            tracing::error!(error = %detail, "Request failed with internal error");
        }
        HttpResponse::build(ResponseError::status_code(self)).json(self.to_response())
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        ServiceError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::BadRequest(format!("invalid payload: {}", err))
    }
}
