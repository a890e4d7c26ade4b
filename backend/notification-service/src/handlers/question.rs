use async_trait::async_trait;
use expo_push_shared::{PushContent, PushDispatcher};
use notification_queue::{QuestionInserted, QUESTION_TYPE};
use std::sync::Arc;
use tracing::info;

use crate::error::{NotificationError, Result};
use crate::services::recipients::RecipientResolver;
use crate::services::router::{HandleOutcome, MessageHandler};

pub const QUESTION_INSERT_TITLE: &str = "질문 등록 알림";

/// Notifies every admin that a user asked a new question
pub struct QuestionInsertHandler {
    recipients: Arc<dyn RecipientResolver>,
    dispatcher: Arc<PushDispatcher>,
}

impl QuestionInsertHandler {
    pub fn new(recipients: Arc<dyn RecipientResolver>, dispatcher: Arc<PushDispatcher>) -> Self {
        Self {
            recipients,
            dispatcher,
        }
    }

    pub fn content(author_id: &str, author_name: &str) -> PushContent {
        let mut content = PushContent::new(
            QUESTION_INSERT_TITLE,
            format!("{}님이 질문을 등록했습니다.", author_name),
        );
        content.data = Some(serde_json::json!({
            "type": QUESTION_TYPE,
            "userId": author_id,
        }));
        content
    }
}

#[async_trait]
impl MessageHandler for QuestionInsertHandler {
    async fn handle(&self, payload: &str) -> Result<HandleOutcome> {
        let event: QuestionInserted = serde_json::from_str(payload)?;
        if event.user_id.is_empty() {
            return Err(NotificationError::InvalidPayload("user_id is empty".into()));
        }

        let author_name = self
            .recipients
            .display_name(&event.user_id)
            .await?
            .ok_or_else(|| NotificationError::UnknownSubject(event.user_id.clone()))?;

        let tokens = self.recipients.admin_push_tokens().await?;
        if tokens.is_empty() {
            info!(user_id = %event.user_id, "No admin push tokens registered, skipping dispatch");
            return Ok(HandleOutcome::NoRecipients);
        }

        let content = Self::content(&event.user_id, &author_name);
        let report = self.dispatcher.dispatch(&tokens, &content).await;
        Ok(HandleOutcome::Dispatched(report))
    }
}
