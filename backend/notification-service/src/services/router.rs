//! Two-level demultiplexing of queue messages: `type`, then `method`

use async_trait::async_trait;
use expo_push_shared::DispatchReport;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum HandleOutcome {
    Dispatched(DispatchReport),
    /// Audience resolved to nobody; nothing was sent
    NoRecipients,
}

#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// `payload` is the raw JSON message body
    async fn handle(&self, payload: &str) -> Result<HandleOutcome>;
}

pub enum Route {
    Handler(Arc<dyn MessageHandler>),
    UnknownType,
    UnknownMethod,
}

#[derive(Default)]
pub struct NotificationRouter {
    routes: HashMap<String, HashMap<String, Arc<dyn MessageHandler>>>,
}

impl NotificationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations for the same pair replace earlier ones
    pub fn register(
        mut self,
        message_type: &str,
        method: &str,
        handler: Arc<dyn MessageHandler>,
    ) -> Self {
        self.routes
            .entry(message_type.to_string())
            .or_default()
            .insert(method.to_string(), handler);
        self
    }

    pub fn route(&self, message_type: &str, method: &str) -> Route {
        match self.routes.get(message_type) {
            None => Route::UnknownType,
            Some(methods) => match methods.get(method) {
                Some(handler) => Route::Handler(handler.clone()),
                None => Route::UnknownMethod,
            },
        }
    }
}
