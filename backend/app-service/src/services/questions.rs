use async_trait::async_trait;
use error_types::{Result, ServiceError};
use notification_queue::{NotificationProducer, QuestionInserted, INSERT_METHOD, QUESTION_TYPE};
use std::sync::Arc;

use crate::models::{Question, QuestionRecord};

/// Only active questions owned by `user_id` are visible
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn list(&self, user_id: &str) -> Result<Vec<QuestionRecord>>;

    async fn find(&self, user_id: &str, question_id: &str) -> Result<Option<QuestionRecord>>;

    async fn insert(&self, user_id: &str, content: &str) -> Result<String>;

    async fn update(&self, user_id: &str, question_id: &str, content: &str) -> Result<u64>;

    async fn deactivate(&self, user_id: &str, question_id: &str) -> Result<u64>;
}

pub struct QuestionService {
    store: Arc<dyn QuestionStore>,
    notifications: NotificationProducer,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::BadRequest(format!("{} is required", field)))
}

impl QuestionService {
    pub fn new(store: Arc<dyn QuestionStore>, notifications: NotificationProducer) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Question>> {
        let rows = self.store.list(user_id).await?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    pub async fn get(&self, user_id: &str, question_id: &str) -> Result<Question> {
        self.store
            .find(user_id, question_id)
            .await?
            .map(Question::from)
            .ok_or_else(|| ServiceError::NotFound("question not found".into()))
    }

    /// Inserts, then enqueues `question/insert`. The enqueue runs detached and
    /// cannot change the outcome of the insert.
    pub async fn create(&self, user_id: &str, content: &Option<String>) -> Result<String> {
        let content = required(content, "content")?;
        let question_id = self.store.insert(user_id, content).await?;

        self.notifications.enqueue(
            QUESTION_TYPE,
            INSERT_METHOD,
            &QuestionInserted {
                user_id: user_id.to_string(),
            },
        );

        Ok(question_id)
    }

    pub async fn update(
        &self,
        user_id: &str,
        question_id: &Option<String>,
        content: &Option<String>,
    ) -> Result<()> {
        let question_id = required(question_id, "questionId")?;
        let content = required(content, "content")?;

        if self.store.update(user_id, question_id, content).await? == 0 {
            return Err(ServiceError::NotFound("question not found".into()));
        }
        Ok(())
    }

    pub async fn delete(&self, user_id: &str, question_id: &Option<String>) -> Result<()> {
        let question_id = required(question_id, "questionId")?;

        if self.store.deactivate(user_id, question_id).await? == 0 {
            return Err(ServiceError::NotFound("question not found".into()));
        }
        Ok(())
    }
}
