use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::dispatcher::PushProvider;
use crate::errors::PushError;
use crate::models::{ExpoSendResponse, PushMessage, PushTicket};

pub const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Expo push service client
///
/// Sends a whole chunk as one JSON array. The access token is only needed
/// when "enhanced push security" is enabled for the Expo project.
pub struct ExpoPushClient {
    endpoint: String,
    access_token: Option<String>,
    http_client: reqwest::Client,
}

impl ExpoPushClient {
    pub fn new(access_token: Option<String>) -> Result<Self, PushError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PushError::ClientBuild(e.to_string()))?;

        Ok(Self {
            endpoint: EXPO_PUSH_URL.to_string(),
            access_token: access_token.filter(|t| !t.is_empty()),
            http_client,
        })
    }

    /// Point the client at another send endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl PushProvider for ExpoPushClient {
    async fn send_chunk(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(messages);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PushError::SendRequestError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PushError::ApiError(status.as_u16(), error_text));
        }

        let parsed: ExpoSendResponse = response
            .json()
            .await
            .map_err(|e| PushError::ResponseParseError(e.to_string()))?;

        if parsed.data.len() != messages.len() {
            warn!(
                sent = messages.len(),
                tickets = parsed.data.len(),
                "Expo returned an unexpected number of tickets"
            );
        }
        debug!(count = parsed.data.len(), "Expo push chunk accepted");

        Ok(parsed.data)
    }
}
