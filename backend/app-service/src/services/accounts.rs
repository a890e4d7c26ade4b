//! Account lifecycle: registration, profile, deactivation
//!
//! Registration and deactivation touch several rows and run inside one
//! [`AccountTx`]: commit only after every statement succeeded, explicit
//! rollback otherwise.

use async_trait::async_trait;
use error_types::{Result, ServiceError};
use jwt_security::TokenCodec;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    NewUserState, Profile, ProfileRecord, ProfileUpdate, RegisterRequest, RegisterResponse,
    ROLE_USER, STATUS_ACTIVE,
};
use crate::names::random_display_name;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn AccountTx>>;

    async fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>>;

    /// Returns the number of updated rows across all supplied fields
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<u64>;
}

/// A unit of work over the account tables
///
/// Dropping an uncommitted transaction discards its writes.
#[async_trait]
pub trait AccountTx: Send {
    async fn insert_user(&mut self, user_id: &str, name: &str) -> Result<()>;

    async fn insert_user_state(&mut self, state: &NewUserState) -> Result<()>;

    async fn insert_refresh_token(&mut self, token: &str, user_id: &str) -> Result<()>;

    async fn deactivate_user(&mut self, user_id: &str) -> Result<u64>;

    async fn expire_refresh_tokens(&mut self, user_id: &str) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Commit on `Ok`, roll back and return the original error otherwise
async fn finish<T>(tx: Box<dyn AccountTx>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    codec: Arc<TokenCodec>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, codec: Arc<TokenCodec>) -> Self {
        Self { store, codec }
    }

    /// Local registration: `app_user`, `user_state` and `refresh_token` rows
    /// are created together or not at all
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse> {
        let alarm = req
            .alarm
            .ok_or_else(|| ServiceError::BadRequest("alarm is required".into()))?;
        let expo_push_token = req
            .expo_push_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("expoPushToken is required".into()))?;
        match req.user_type.as_deref() {
            Some("local") => {}
            Some("sns") => {
                return Err(ServiceError::BadRequest(
                    "sns registration is not supported".into(),
                ))
            }
            _ => return Err(ServiceError::BadRequest("userType is required".into())),
        }

        let user_id = Uuid::new_v4().to_string();
        let refresh_token = Uuid::new_v4().to_string();
        let name = random_display_name();
        let access_token = self
            .codec
            .generate(&user_id)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let state = NewUserState {
            user_state_id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            role: ROLE_USER.to_string(),
            status: STATUS_ACTIVE.to_string(),
            alarm,
            expo_push_token: Some(expo_push_token),
        };

        let mut tx = self.store.begin().await?;
        let outcome = async {
            tx.insert_user(&user_id, &name).await?;
            tx.insert_user_state(&state).await?;
            tx.insert_refresh_token(&refresh_token, &user_id).await?;
            Ok::<(), ServiceError>(())
        }
        .await;
        finish(tx, outcome).await?;

        info!(user_id = %user_id, "Registered local account");
        Ok(RegisterResponse {
            name,
            access_token,
            refresh_token,
        })
    }

    pub async fn profile(&self, user_id: &str) -> Result<Profile> {
        self.store
            .profile(user_id)
            .await?
            .map(Profile::from)
            .ok_or_else(|| ServiceError::NotFound("user not found".into()))
    }

    pub async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        if update.is_empty() {
            return Err(ServiceError::BadRequest("bad request".into()));
        }
        if self.store.update_profile(user_id, update).await? == 0 {
            return Err(ServiceError::NotFound("user not found".into()));
        }
        Ok(())
    }

    /// Marks the account inactive and expires every refresh token it holds.
    /// Already-issued access tokens stay valid until they expire.
    pub async fn deactivate(&self, user_id: &str) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            if tx.deactivate_user(user_id).await? == 0 {
                return Err(ServiceError::NotFound("user not found".into()));
            }
            tx.expire_refresh_tokens(user_id).await
        }
        .await;
        let expired = finish(tx, outcome).await?;

        info!(user_id, expired, "Deactivated account");
        Ok(())
    }
}
