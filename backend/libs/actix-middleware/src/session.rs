//! Session resolution
//!
//! A request carries up to two credentials: a stateless access token and an
//! opaque refresh token backed by the [`RefreshStore`]. [`SessionResolver`]
//! turns them into exactly one of three decisions:
//!
//! | state                          | outcome                                   |
//! |--------------------------------|-------------------------------------------|
//! | `AccessValid`                  | proceed with the resolved `Session`       |
//! | `AccessInvalidRefreshValid`    | 401 `expiredType: "access"` + new token   |
//! | `AccessInvalidRefreshInvalid`  | 401 `expiredType: "wrong"`, empty token   |
//!
//! `NoCredential` collapses into the last row. Renewal never retries the
//! original operation and never rotates the refresh token.

use async_trait::async_trait;
use error_types::ServiceError;
use jwt_security::{Session, TokenCodec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Refresh store unavailable: {0}")]
    Unavailable(String),
}

/// Persisted mapping from refresh token to subject
#[async_trait]
pub trait RefreshStore: Send + Sync {
    /// Subject of the first unexpired row matching `token`
    async fn lookup(&self, token: &str) -> Result<Option<String>, StoreError>;

    /// Expire every refresh token of `subject_id`, returning the affected row count
    async fn invalidate(&self, subject_id: &str) -> Result<u64, StoreError>;

    /// Issue a new refresh token for `subject_id` with an unbounded expiry
    async fn create(&self, subject_id: &str) -> Result<String, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Log label only; resolution treats it as `AccessInvalidRefreshInvalid`
    NoCredential,
    AccessValid,
    AccessInvalidRefreshValid,
    AccessInvalidRefreshInvalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Proceed(Session),
    Renew {
        access_token: String,
        refresh_token: String,
    },
    Reject {
        refresh_token: String,
    },
}

impl AuthDecision {
    pub fn state(&self) -> AuthState {
        match self {
            AuthDecision::Proceed(_) => AuthState::AccessValid,
            AuthDecision::Renew { .. } => AuthState::AccessInvalidRefreshValid,
            AuthDecision::Reject { .. } => AuthState::AccessInvalidRefreshInvalid,
        }
    }

    /// The resolved session, or the body of the 401 renewal contract
    pub fn into_session(self) -> Result<Session, RenewalResponse> {
        match self {
            AuthDecision::Proceed(session) => Ok(session),
            AuthDecision::Renew {
                access_token,
                refresh_token,
            } => Err(RenewalResponse {
                expired_type: ExpiredType::Access,
                access_token,
                refresh_token,
            }),
            AuthDecision::Reject { refresh_token } => Err(RenewalResponse {
                expired_type: ExpiredType::Wrong,
                access_token: String::new(),
                refresh_token,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiredType {
    /// Access token expired, a fresh one is attached
    Access,
    /// Client must re-authenticate
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalResponse {
    pub expired_type: ExpiredType,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionResolver {
    codec: Arc<TokenCodec>,
    store: Arc<dyn RefreshStore>,
}

impl SessionResolver {
    pub fn new(codec: Arc<TokenCodec>, store: Arc<dyn RefreshStore>) -> Self {
        Self { codec, store }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Store failures surface as `Internal`; every other outcome is a decision
    pub async fn resolve(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<AuthDecision, ServiceError> {
        if access_token.is_none() && refresh_token.is_none() {
            debug!(state = ?AuthState::NoCredential, "Request carries no credentials");
        }

        if let Some(session) = access_token
            .filter(|token| !token.is_empty())
            .and_then(|token| self.codec.verify(token))
        {
            return Ok(AuthDecision::Proceed(session));
        }

        let refresh_token = refresh_token.unwrap_or_default().to_string();
        if refresh_token.is_empty() {
            return Ok(AuthDecision::Reject { refresh_token });
        }

        let subject_id = self.store.lookup(&refresh_token).await.map_err(|e| {
            error!(error = %e, "Refresh token lookup failed");
            ServiceError::Internal(e.to_string())
        })?;

        match subject_id {
            Some(subject_id) => {
                let access_token = self
                    .codec
                    .generate(&subject_id)
                    .map_err(|e| ServiceError::Internal(e.to_string()))?;
                debug!(subject_id = %subject_id, "Minted access token from refresh token");
                Ok(AuthDecision::Renew {
                    access_token,
                    refresh_token,
                })
            }
            None => {
                debug!("Refresh token unknown or expired");
                Ok(AuthDecision::Reject { refresh_token })
            }
        }
    }
}
