use async_trait::async_trait;
use error_types::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::QuestionRecord;
use crate::services::questions::QuestionStore;

pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn list(&self, user_id: &str) -> Result<Vec<QuestionRecord>> {
        let rows = sqlx::query_as::<_, QuestionRecord>(
            r#"
            SELECT question_id, content, is_answered, created_date
            FROM question
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY created_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find(&self, user_id: &str, question_id: &str) -> Result<Option<QuestionRecord>> {
        let row = sqlx::query_as::<_, QuestionRecord>(
            r#"
            SELECT question_id, content, is_answered, created_date
            FROM question
            WHERE question_id = $1 AND user_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(question_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert(&self, user_id: &str, content: &str) -> Result<String> {
        let question_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO question (question_id, user_id, content, is_answered, is_active)
            VALUES ($1, $2, $3, FALSE, TRUE)
            "#,
        )
        .bind(&question_id)
        .bind(user_id)
        .bind(content)
        .execute(&self.pool)
        .await?;

        Ok(question_id)
    }

    async fn update(&self, user_id: &str, question_id: &str, content: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE question
            SET content = $1, updated_date = NOW()
            WHERE question_id = $2 AND user_id = $3 AND is_active = TRUE
            "#,
        )
        .bind(content)
        .bind(question_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn deactivate(&self, user_id: &str, question_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE question
            SET is_active = FALSE, updated_date = NOW()
            WHERE question_id = $1 AND user_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(question_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
