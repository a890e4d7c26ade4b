/// Account rows: `app_user` and `user_state`
use async_trait::async_trait;
use error_types::Result;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::db::refresh_tokens;
use crate::models::{NewUserState, ProfileRecord, ProfileUpdate, STATUS_INACTIVE};
use crate::services::accounts::{AccountStore, AccountTx};

pub async fn insert_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
    name: &str,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO app_user (user_id, name) VALUES ($1, $2)")
        .bind(user_id)
        .bind(name)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn insert_user_state<'e>(
    executor: impl PgExecutor<'e>,
    state: &NewUserState,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_state
            (user_state_id, user_id, role, status, alarm, expo_push_token)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&state.user_state_id)
    .bind(&state.user_id)
    .bind(&state.role)
    .bind(&state.status)
    .bind(state.alarm)
    .bind(&state.expo_push_token)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
    status: &str,
) -> std::result::Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE user_state SET status = $1, updated_date = NOW() WHERE user_id = $2",
    )
    .bind(status)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_profile(
    pool: &PgPool,
    user_id: &str,
) -> std::result::Result<Option<ProfileRecord>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRecord>(
        r#"
        SELECT u.name, s.alarm, s.expo_push_token, u.created_date
        FROM app_user u
        INNER JOIN user_state s ON s.user_id = u.user_id
        WHERE u.user_id = $1
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn begin(&self) -> Result<Box<dyn AccountTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgAccountTx { tx }))
    }

    async fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        Ok(find_profile(&self.pool, user_id).await?)
    }

    /// Each supplied field is its own statement; a later push token write
    /// simply overwrites the earlier one
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<u64> {
        let mut affected = 0;

        if let Some(name) = &update.name {
            affected += sqlx::query(
                "UPDATE app_user SET name = $1, updated_date = NOW() WHERE user_id = $2",
            )
            .bind(name)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        }

        if let Some(alarm) = update.alarm {
            affected += sqlx::query(
                "UPDATE user_state SET alarm = $1, updated_date = NOW() WHERE user_id = $2",
            )
            .bind(alarm)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        }

        if let Some(token) = &update.expo_push_token {
            affected += sqlx::query(
                "UPDATE user_state SET expo_push_token = $1, updated_date = NOW() WHERE user_id = $2",
            )
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        }

        Ok(affected)
    }
}

/// Rolls back on drop unless committed
pub struct PgAccountTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl AccountTx for PgAccountTx {
    async fn insert_user(&mut self, user_id: &str, name: &str) -> Result<()> {
        Ok(insert_user(&mut *self.tx, user_id, name).await?)
    }

    async fn insert_user_state(&mut self, state: &NewUserState) -> Result<()> {
        Ok(insert_user_state(&mut *self.tx, state).await?)
    }

    async fn insert_refresh_token(&mut self, token: &str, user_id: &str) -> Result<()> {
        Ok(refresh_tokens::insert(&mut *self.tx, token, user_id).await?)
    }

    async fn deactivate_user(&mut self, user_id: &str) -> Result<u64> {
        Ok(set_status(&mut *self.tx, user_id, STATUS_INACTIVE).await?)
    }

    async fn expire_refresh_tokens(&mut self, user_id: &str) -> Result<u64> {
        Ok(refresh_tokens::expire_for_user(&mut *self.tx, user_id).await?)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        Ok(self.tx.commit().await?)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(self.tx.rollback().await?)
    }
}
