use actix_middleware::{RefreshStore, StoreError};
use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use tracing::debug;
use uuid::Uuid;

/// First unexpired row only
pub async fn find_subject<'e>(
    executor: impl PgExecutor<'e>,
    token: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT user_id
        FROM refresh_token
        WHERE refresh_token = $1
          AND expires_date > NOW()
        LIMIT 1
        "#,
    )
    .bind(token)
    .fetch_optional(executor)
    .await
}

/// New row that never expires on its own
pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    token: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO refresh_token (refresh_token, user_id, expires_date)
        VALUES ($1, $2, TIMESTAMPTZ '9999-01-01 00:00:00+00')
        "#,
    )
    .bind(token)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn expire_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE refresh_token SET expires_date = NOW() WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub struct PgRefreshStore {
    pool: PgPool,
}

impl PgRefreshStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl RefreshStore for PgRefreshStore {
    async fn lookup(&self, token: &str) -> Result<Option<String>, StoreError> {
        find_subject(&self.pool, token).await.map_err(unavailable)
    }

    async fn invalidate(&self, subject_id: &str) -> Result<u64, StoreError> {
        let affected = expire_for_user(&self.pool, subject_id)
            .await
            .map_err(unavailable)?;
        debug!(subject_id, affected, "Expired refresh tokens");
        Ok(affected)
    }

    async fn create(&self, subject_id: &str) -> Result<String, StoreError> {
        let token = Uuid::new_v4().to_string();
        insert(&self.pool, &token, subject_id)
            .await
            .map_err(unavailable)?;
        Ok(token)
    }
}
