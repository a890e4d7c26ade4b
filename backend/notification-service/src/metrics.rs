use expo_push_shared::DispatchReport;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

use crate::services::MessageOutcome;

static QUEUE_MESSAGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "notification_queue_messages_total",
        "Queue messages processed by outcome",
        &["type", "method", "outcome"]
    )
    .expect("Prometheus metrics registration should succeed at startup")
});

static PUSH_CHUNKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "notification_push_chunks_total",
        "Expo push chunks by outcome",
        &["outcome"]
    )
    .expect("Prometheus metrics registration should succeed at startup")
});

static PUSH_MESSAGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "notification_push_messages_total",
        "Expo push messages by ticket outcome",
        &["outcome"]
    )
    .expect("Prometheus metrics registration should succeed at startup")
});

pub fn record_message(message_type: &str, method: &str, outcome: MessageOutcome) {
    QUEUE_MESSAGES_TOTAL
        .with_label_values(&[message_type, method, outcome.as_str()])
        .inc();
}

pub fn record_dispatch(report: &DispatchReport) {
    PUSH_CHUNKS_TOTAL
        .with_label_values(&["sent"])
        .inc_by(report.chunks_sent as u64);
    PUSH_CHUNKS_TOTAL
        .with_label_values(&["failed"])
        .inc_by(report.chunks_failed as u64);

    PUSH_MESSAGES_TOTAL
        .with_label_values(&["accepted"])
        .inc_by(report.accepted() as u64);
    PUSH_MESSAGES_TOTAL
        .with_label_values(&["rejected"])
        .inc_by(report.rejected() as u64);
    PUSH_MESSAGES_TOTAL
        .with_label_values(&["skipped"])
        .inc_by(report.skipped_tokens as u64);
}
