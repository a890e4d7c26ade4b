/// Expo Push Shared Library
///
/// Push delivery to mobile devices through the Expo push service.
///
/// It handles:
/// - Expo push token syntax checks
/// - Splitting a fan-out into provider-sized chunks
/// - One provider call per chunk, with a failed chunk never stopping the rest
/// - Collecting push tickets for logging

pub mod client;
pub mod dispatcher;
pub mod errors;
pub mod models;
pub mod validation;

pub use client::{ExpoPushClient, EXPO_PUSH_URL};
pub use dispatcher::{chunk_messages, DispatchReport, PushDispatcher, PushProvider, EXPO_CHUNK_LIMIT};
pub use errors::PushError;
pub use models::{PushContent, PushMessage, PushTicket};
pub use validation::is_expo_push_token;
