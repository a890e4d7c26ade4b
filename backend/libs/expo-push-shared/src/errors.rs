use thiserror::Error;

/// Expo client error types
#[derive(Error, Debug)]
pub enum PushError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Expo send request failed: {0}")]
    SendRequestError(String),

    #[error("Failed to parse Expo response: {0}")]
    ResponseParseError(String),

    #[error("Expo API error: {0} - {1}")]
    ApiError(u16, String),
}
