use crate::error::{QueueError, QueueResult};
use crate::{NotificationMessage, QueuePublisher, METHOD_HEADER, TYPE_HEADER};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;
use tracing::debug;

/// Publishes notification messages to a single Kafka topic
///
/// `Type` and `Method` travel as record headers, the payload is the record
/// value. Records are unkeyed.
pub struct KafkaQueuePublisher {
    producer: FutureProducer,
    topic: String,
    delivery_timeout: Duration,
}

impl KafkaQueuePublisher {
    pub fn new(brokers: &str, topic: &str, delivery_timeout: Duration) -> QueueResult<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", delivery_timeout.as_millis().to_string())
            .set("acks", "all")
            .create()
            .map_err(|e| QueueError::Config(e.to_string()))?;

        Ok(Self {
            producer,
            topic: topic.to_string(),
            delivery_timeout,
        })
    }
}

#[async_trait]
impl QueuePublisher for KafkaQueuePublisher {
    async fn publish(&self, message: &NotificationMessage) -> QueueResult<()> {
        let headers = OwnedHeaders::new()
            .insert(Header {
                key: TYPE_HEADER,
                value: Some(message.message_type.as_bytes()),
            })
            .insert(Header {
                key: METHOD_HEADER,
                value: Some(message.method.as_bytes()),
            });

        let record: FutureRecord<'_, (), str> = FutureRecord::to(&self.topic)
            .payload(message.payload.as_str())
            .headers(headers);

        let (partition, offset) = self
            .producer
            .send(record, self.delivery_timeout)
            .await
            .map_err(|(e, _)| QueueError::PublishFailed(e.to_string()))?;

        debug!(
            topic = %self.topic,
            partition,
            offset,
            message_type = %message.message_type,
            method = %message.method,
            "Notification message published"
        );
        Ok(())
    }
}
