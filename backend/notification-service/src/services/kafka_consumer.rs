//! Kafka transport for the notification consumer
//!
//! Messages are collected into a batch that is flushed when it reaches
//! `batch_size` or when `flush_interval_ms` elapses. After a batch has been
//! processed the consumer offsets are committed; failed messages are not
//! redelivered.

use notification_queue::{METHOD_HEADER, TYPE_HEADER};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::{Headers, Message};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::time::interval;

use crate::config::KafkaConfig;
use crate::services::consumer::{InboundMessage, NotificationConsumer};

/// Value of header `key` as UTF-8, first occurrence wins
pub fn header_value<H: Headers>(headers: &H, key: &str) -> Option<String> {
    headers
        .iter()
        .find(|header| header.key == key)
        .and_then(|header| header.value)
        .and_then(|value| std::str::from_utf8(value).ok())
        .map(str::to_string)
}

pub fn inbound_from_kafka<M: Message>(message: &M) -> InboundMessage {
    let headers = message.headers();
    InboundMessage {
        message_type: headers.and_then(|h| header_value(h, TYPE_HEADER)),
        method: headers.and_then(|h| header_value(h, METHOD_HEADER)),
        payload: message
            .payload()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .unwrap_or_default(),
    }
}

pub struct KafkaNotificationConsumer {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
    pub batch_size: usize,
    pub flush_interval_ms: u64,
}

impl KafkaNotificationConsumer {
    pub fn new(config: &KafkaConfig) -> Self {
        Self {
            brokers: config.brokers.clone(),
            topic: config.topic.clone(),
            group_id: config.group_id.clone(),
            batch_size: config.batch_size.max(1),
            flush_interval_ms: config.flush_interval_ms.max(1),
        }
    }

    /// Runs until the Kafka client cannot be created or subscribed
    pub async fn start(&self, consumer: Arc<NotificationConsumer>) -> Result<(), String> {
        tracing::info!(
            brokers = %self.brokers,
            topic = %self.topic,
            group_id = %self.group_id,
            "Starting Kafka notification consumer"
        );

        let kafka: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.group_id)
            .set("auto.offset.reset", "latest")
            .set("enable.auto.commit", "false")
            .set("session.timeout.ms", "30000")
            .set("heartbeat.interval.ms", "10000")
            .create()
            .map_err(|e| format!("Failed to create Kafka consumer: {}", e))?;

        kafka
            .subscribe(&[self.topic.as_str()])
            .map_err(|e| format!("Failed to subscribe to topic: {}", e))?;

        let mut batch: Vec<InboundMessage> = Vec::with_capacity(self.batch_size);
        let mut flush_interval = interval(Duration::from_millis(self.flush_interval_ms));

        loop {
            select! {
                msg = kafka.recv() => {
                    match msg {
                        Ok(m) => {
                            batch.push(inbound_from_kafka(&m));
                            if batch.len() >= self.batch_size {
                                self.flush(&kafka, &consumer, &mut batch).await;
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "Kafka consumer error"),
                    }
                }
                _ = flush_interval.tick() => {
                    if !batch.is_empty() {
                        self.flush(&kafka, &consumer, &mut batch).await;
                    }
                }
            }
        }
    }

    async fn flush(
        &self,
        kafka: &StreamConsumer,
        consumer: &NotificationConsumer,
        batch: &mut Vec<InboundMessage>,
    ) {
        let report = consumer.process_batch(batch).await;
        tracing::info!(
            handled = report.handled,
            dropped = report.dropped,
            failed = report.failed,
            "Flushed notification batch"
        );

        if let Err(e) = kafka.commit_consumer_state(CommitMode::Async) {
            tracing::warn!(error = %e, "Failed to commit Kafka offsets");
        }
        batch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdkafka::message::{Header, OwnedHeaders, OwnedMessage, Timestamp};

    fn kafka_message(headers: Option<OwnedHeaders>, payload: &str) -> OwnedMessage {
        OwnedMessage::new(
            Some(payload.as_bytes().to_vec()),
            None,
            "notifications".to_string(),
            Timestamp::NotAvailable,
            0,
            42,
            headers,
        )
    }

    #[test]
    fn test_inbound_reads_type_and_method_headers() {
        let headers = OwnedHeaders::new()
            .insert(Header {
                key: "Type",
                value: Some("question"),
            })
            .insert(Header {
                key: "Method",
                value: Some("insert"),
            });

        let inbound = inbound_from_kafka(&kafka_message(Some(headers), r#"{"user_id":"u1"}"#));

        assert_eq!(inbound.message_type.as_deref(), Some("question"));
        assert_eq!(inbound.method.as_deref(), Some("insert"));
        assert_eq!(inbound.payload, r#"{"user_id":"u1"}"#);
    }

    #[test]
    fn test_missing_headers_yield_none() {
        let inbound = inbound_from_kafka(&kafka_message(None, "{}"));
        assert!(inbound.message_type.is_none());
        assert!(inbound.method.is_none());
    }

    #[test]
    fn test_batch_size_is_at_least_one() {
        let consumer = KafkaNotificationConsumer::new(&KafkaConfig {
            brokers: "localhost:9092".into(),
            topic: "notifications".into(),
            group_id: "g".into(),
            batch_size: 0,
            flush_interval_ms: 1000,
        });
        assert_eq!(consumer.batch_size, 1);
    }

    #[tokio::test]
    async fn test_zero_flush_interval_is_clamped() {
        let consumer = KafkaNotificationConsumer::new(&KafkaConfig {
            brokers: "localhost:9092".into(),
            topic: "notifications".into(),
            group_id: "g".into(),
            batch_size: 10,
            flush_interval_ms: 0,
        });
        assert_eq!(consumer.flush_interval_ms, 1);

        let mut ticker = interval(Duration::from_millis(consumer.flush_interval_ms));
        ticker.tick().await;
    }
}
