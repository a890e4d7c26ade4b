pub mod consumer;
pub mod kafka_consumer;
pub mod recipients;
pub mod router;

pub use consumer::{BatchReport, InboundMessage, MessageOutcome, NotificationConsumer};
pub use kafka_consumer::KafkaNotificationConsumer;
pub use recipients::{PgRecipientResolver, RecipientResolver};
pub use router::{HandleOutcome, MessageHandler, NotificationRouter, Route};
