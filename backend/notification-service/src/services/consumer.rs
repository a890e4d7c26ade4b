//! Batch processing independent of the transport
//!
//! Every message of a batch is processed on its own: a dropped or failed
//! message is logged and counted, and the next one is processed regardless.

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::metrics;
use crate::services::router::{HandleOutcome, NotificationRouter, Route};

/// Message as delivered by the queue; attributes may be missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_type: Option<String>,
    pub method: Option<String>,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Handled,
    /// Missing attribute, unknown type or unknown method
    Dropped,
    Failed,
}

impl MessageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageOutcome::Handled => "handled",
            MessageOutcome::Dropped => "dropped",
            MessageOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub handled: usize,
    pub dropped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.handled + self.dropped + self.failed
    }

    fn record(&mut self, outcome: MessageOutcome) {
        match outcome {
            MessageOutcome::Handled => self.handled += 1,
            MessageOutcome::Dropped => self.dropped += 1,
            MessageOutcome::Failed => self.failed += 1,
        }
    }
}

pub struct NotificationConsumer {
    router: Arc<NotificationRouter>,
}

impl NotificationConsumer {
    pub fn new(router: Arc<NotificationRouter>) -> Self {
        Self { router }
    }

    pub async fn process_batch(&self, messages: &[InboundMessage]) -> BatchReport {
        let mut report = BatchReport::default();
        for message in messages {
            report.record(self.process_message(message).await);
        }
        report
    }

    pub async fn process_message(&self, message: &InboundMessage) -> MessageOutcome {
        let (message_type, method) = match (&message.message_type, &message.method) {
            (Some(message_type), Some(method)) => (message_type.as_str(), method.as_str()),
            _ => {
                warn!(
                    message_type = ?message.message_type,
                    method = ?message.method,
                    "Dropping message without Type/Method attributes"
                );
                return self.finish("unknown", "unknown", MessageOutcome::Dropped);
            }
        };

        let handler = match self.router.route(message_type, method) {
            Route::Handler(handler) => handler,
            Route::UnknownType => {
                warn!(message_type, "Dropping message of unknown type");
                return self.finish("unknown", "unknown", MessageOutcome::Dropped);
            }
            Route::UnknownMethod => {
                warn!(message_type, method, "Dropping message of unknown method");
                return self.finish(message_type, "unknown", MessageOutcome::Dropped);
            }
        };

        let outcome = match handler.handle(&message.payload).await {
            Ok(HandleOutcome::Dispatched(report)) => {
                metrics::record_dispatch(&report);
                MessageOutcome::Handled
            }
            Ok(HandleOutcome::NoRecipients) => MessageOutcome::Handled,
            Err(e) => {
                error!(message_type, method, error = %e, "Notification handler failed");
                MessageOutcome::Failed
            }
        };
        self.finish(message_type, method, outcome)
    }

    /// Labels are only ever registered pairs or `unknown`
    fn finish(&self, message_type: &str, method: &str, outcome: MessageOutcome) -> MessageOutcome {
        debug!(message_type, method, outcome = outcome.as_str(), "Message processed");
        metrics::record_message(message_type, method, outcome);
        outcome
    }
}
