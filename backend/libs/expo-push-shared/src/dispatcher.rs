//! Fan-out of one notification to many devices
//!
//! Invalid tokens are skipped with a warning, the remaining messages are cut
//! into chunks of at most [`EXPO_CHUNK_LIMIT`] and sent one chunk at a time.
//! A failed chunk is logged and the next chunk is still attempted. There is
//! no retry and no receipt polling.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::PushError;
use crate::models::{PushContent, PushMessage, PushTicket};
use crate::validation::is_expo_push_token;

/// Maximum messages per Expo send request
pub const EXPO_CHUNK_LIMIT: usize = 100;

/// Device delivery backend
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// One request for the whole chunk, tickets in message order
    async fn send_chunk(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError>;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DispatchReport {
    pub skipped_tokens: usize,
    pub chunks_sent: usize,
    pub chunks_failed: usize,
    pub tickets: Vec<PushTicket>,
}

impl DispatchReport {
    pub fn accepted(&self) -> usize {
        self.tickets.iter().filter(|t| t.is_ok()).count()
    }

    pub fn rejected(&self) -> usize {
        self.tickets.len() - self.accepted()
    }
}

/// Split into consecutive chunks of at most `size` (`size` is clamped to 1)
pub fn chunk_messages(messages: Vec<PushMessage>, size: usize) -> Vec<Vec<PushMessage>> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(messages.len().div_ceil(size));
    let mut iter = messages.into_iter().peekable();

    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

pub struct PushDispatcher {
    provider: Arc<dyn PushProvider>,
    chunk_size: usize,
}

impl PushDispatcher {
    pub fn new(provider: Arc<dyn PushProvider>) -> Self {
        Self {
            provider,
            chunk_size: EXPO_CHUNK_LIMIT,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, EXPO_CHUNK_LIMIT);
        self
    }

    pub async fn dispatch(&self, tokens: &[String], content: &PushContent) -> DispatchReport {
        let mut report = DispatchReport::default();

        let messages: Vec<PushMessage> = tokens
            .iter()
            .filter(|token| {
                let valid = is_expo_push_token(token);
                if !valid {
                    warn!(token = %token, "Skipping invalid Expo push token");
                }
                valid
            })
            .map(|token| content.to_message(token))
            .collect();
        report.skipped_tokens = tokens.len() - messages.len();

        for (index, chunk) in chunk_messages(messages, self.chunk_size)
            .into_iter()
            .enumerate()
        {
            match self.provider.send_chunk(&chunk).await {
                Ok(tickets) => {
                    for ticket in &tickets {
                        if let PushTicket::Error { message, details } = ticket {
                            warn!(chunk = index, error = %message, details = ?details, "Push ticket error");
                        }
                    }
                    report.chunks_sent += 1;
                    report.tickets.extend(tickets);
                }
                Err(e) => {
                    error!(chunk = index, size = chunk.len(), error = %e, "Push chunk failed");
                    report.chunks_failed += 1;
                }
            }
        }

        info!(
            skipped = report.skipped_tokens,
            chunks_sent = report.chunks_sent,
            chunks_failed = report.chunks_failed,
            accepted = report.accepted(),
            rejected = report.rejected(),
            "Push dispatch finished"
        );
        report
    }
}
