use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;

/// Audience lookups for outgoing notifications
#[async_trait]
pub trait RecipientResolver: Send + Sync {
    /// Current push tokens of every active admin; empty tokens excluded
    async fn admin_push_tokens(&self) -> Result<Vec<String>>;

    async fn display_name(&self, subject_id: &str) -> Result<Option<String>>;
}

pub struct PgRecipientResolver {
    pool: PgPool,
}

impl PgRecipientResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientResolver for PgRecipientResolver {
    async fn admin_push_tokens(&self) -> Result<Vec<String>> {
        let tokens = sqlx::query_scalar::<_, String>(
            r#"
            SELECT expo_push_token
            FROM user_state
            WHERE role = 'admin'
              AND status = 'active'
              AND expo_push_token IS NOT NULL
              AND expo_push_token <> ''
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens)
    }

    async fn display_name(&self, subject_id: &str) -> Result<Option<String>> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM app_user WHERE user_id = $1")
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(name)
    }
}
