//! Notification queue producer side
//!
//! A write operation that wants to notify someone enqueues a
//! [`NotificationMessage`]: a `Type` / `Method` pair of attributes plus a JSON
//! payload. Delivery is at-least-once, so consumers must tolerate duplicates.
//!
//! [`NotificationProducer::enqueue`] is fire-and-forget. The publish runs on a
//! detached task and its outcome is only logged; the triggering request never
//! waits on the queue and never fails because of it.

mod error;
pub mod kafka;

pub use error::{QueueError, QueueResult};
pub use kafka::KafkaQueuePublisher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Attribute names on the wire
pub const TYPE_HEADER: &str = "Type";
pub const METHOD_HEADER: &str = "Method";

pub const QUESTION_TYPE: &str = "question";
pub const INSERT_METHOD: &str = "insert";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub message_type: String,
    pub method: String,
    /// JSON document
    pub payload: String,
}

impl NotificationMessage {
    pub fn new<P: Serialize>(message_type: &str, method: &str, payload: &P) -> QueueResult<Self> {
        Ok(Self {
            message_type: message_type.to_string(),
            method: method.to_string(),
            payload: serde_json::to_string(payload)?,
        })
    }
}

/// Payload of `question/insert`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionInserted {
    pub user_id: String,
}

#[async_trait]
pub trait QueuePublisher: Send + Sync {
    async fn publish(&self, message: &NotificationMessage) -> QueueResult<()>;
}

#[derive(Clone)]
pub struct NotificationProducer {
    publisher: Arc<dyn QueuePublisher>,
}

impl NotificationProducer {
    pub fn new(publisher: Arc<dyn QueuePublisher>) -> Self {
        Self { publisher }
    }

    /// Enqueue on a detached task
    ///
    /// The returned handle only exists so callers can observe completion in
    /// tests; dropping it does not cancel the publish.
    pub fn enqueue<P: Serialize>(
        &self,
        message_type: &str,
        method: &str,
        payload: &P,
    ) -> JoinHandle<()> {
        let message = NotificationMessage::new(message_type, method, payload);
        let publisher = self.publisher.clone();

        tokio::spawn(async move {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    error!(error = %e, "Failed to serialize notification payload");
                    return;
                }
            };

            match publisher.publish(&message).await {
                Ok(()) => debug!(
                    message_type = %message.message_type,
                    method = %message.method,
                    "Notification enqueued"
                ),
                Err(e) => error!(
                    error = %e,
                    message_type = %message.message_type,
                    method = %message.method,
                    "Failed to enqueue notification"
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    struct ChannelPublisher {
        tx: mpsc::UnboundedSender<NotificationMessage>,
    }

    #[async_trait]
    impl QueuePublisher for ChannelPublisher {
        async fn publish(&self, message: &NotificationMessage) -> QueueResult<()> {
            self.tx
                .send(message.clone())
                .map_err(|e| QueueError::PublishFailed(e.to_string()))
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl QueuePublisher for FailingPublisher {
        async fn publish(&self, _message: &NotificationMessage) -> QueueResult<()> {
            Err(QueueError::PublishFailed("broker unreachable".into()))
        }
    }

    #[tokio::test]
    async fn test_enqueue_publishes_attributes_and_payload() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let producer = NotificationProducer::new(Arc::new(ChannelPublisher { tx }));

        producer
            .enqueue(
                QUESTION_TYPE,
                INSERT_METHOD,
                &QuestionInserted {
                    user_id: "u1".into(),
                },
            )
            .await
            .unwrap();

        let message = rx.recv().await.unwrap();
        assert_eq!(message.message_type, "question");
        assert_eq!(message.method, "insert");

        let payload: QuestionInserted = serde_json::from_str(&message.payload).unwrap();
        assert_eq!(payload.user_id, "u1");
    }

    #[tokio::test]
    async fn test_publish_failure_is_contained() {
        let producer = NotificationProducer::new(Arc::new(FailingPublisher));

        let handle = producer.enqueue(QUESTION_TYPE, INSERT_METHOD, &serde_json::json!({}));

        // The detached task finishes normally even though the publish failed
        assert!(handle.await.is_ok());
    }

    #[test]
    fn test_payload_is_json_string() {
        let message = NotificationMessage::new(
            QUESTION_TYPE,
            INSERT_METHOD,
            &QuestionInserted {
                user_id: "u7".into(),
            },
        )
        .unwrap();

        assert_eq!(message.payload, r#"{"user_id":"u7"}"#);
    }
}
