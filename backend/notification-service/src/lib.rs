pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod services;

pub use config::Config;
pub use error::{NotificationError, Result};
pub use services::*;
