use async_trait::async_trait;
use expo_push_shared::{
    PushContent, PushDispatcher, PushError, PushMessage, PushProvider, PushTicket,
};
use std::sync::{Arc, Mutex};

/// Records every chunk and fails the chunks whose index is listed
#[derive(Default)]
struct RecordingProvider {
    calls: Mutex<Vec<Vec<String>>>,
    fail_on: Vec<usize>,
}

#[async_trait]
impl PushProvider for RecordingProvider {
    async fn send_chunk(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(messages.iter().map(|m| m.to.clone()).collect());
            calls.len() - 1
        };

        if self.fail_on.contains(&index) {
            return Err(PushError::ApiError(503, "unavailable".into()));
        }

        Ok(messages
            .iter()
            .map(|m| PushTicket::Ok {
                id: format!("ticket-{}", m.to),
            })
            .collect())
    }
}

fn tokens(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("ExponentPushToken[device-{}]", i)).collect()
}

fn content() -> PushContent {
    PushContent::new("질문 등록 알림", "새 질문이 등록되었습니다.")
}

#[tokio::test]
async fn test_invalid_tokens_are_never_sent() {
    let provider = Arc::new(RecordingProvider::default());
    let dispatcher = PushDispatcher::new(provider.clone());

    let mut all = tokens(3);
    all.push(String::new());
    all.push("not-a-token".into());

    let report = dispatcher.dispatch(&all, &content()).await;

    assert_eq!(report.skipped_tokens, 2);
    let calls = provider.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], tokens(3));
}

#[tokio::test]
async fn test_one_call_per_chunk() {
    let provider = Arc::new(RecordingProvider::default());
    let dispatcher = PushDispatcher::new(provider.clone());

    let report = dispatcher.dispatch(&tokens(201), &content()).await;

    let sizes: Vec<usize> = provider.calls.lock().unwrap().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 1]);
    assert_eq!(report.chunks_sent, 3);
    assert_eq!(report.accepted(), 201);
}

#[tokio::test]
async fn test_failed_chunk_does_not_stop_the_next() {
    let provider = Arc::new(RecordingProvider {
        fail_on: vec![0],
        ..Default::default()
    });
    let dispatcher = PushDispatcher::new(provider.clone()).with_chunk_size(2);

    let report = dispatcher.dispatch(&tokens(5), &content()).await;

    assert_eq!(provider.calls.lock().unwrap().len(), 3);
    assert_eq!(report.chunks_failed, 1);
    assert_eq!(report.chunks_sent, 2);
    assert_eq!(report.tickets.len(), 3);
}

#[tokio::test]
async fn test_no_valid_tokens_means_no_calls() {
    let provider = Arc::new(RecordingProvider::default());
    let dispatcher = PushDispatcher::new(provider.clone());

    let report = dispatcher
        .dispatch(&["bogus".to_string()], &content())
        .await;

    assert!(provider.calls.lock().unwrap().is_empty());
    assert_eq!(report.skipped_tokens, 1);
    assert_eq!(report.chunks_sent + report.chunks_failed, 0);
}
