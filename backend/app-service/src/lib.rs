//! HTTP API of the devotion app
//!
//! Registration is public; every other resource sits behind
//! [`actix_middleware::RequestGate`] and receives the caller through
//! [`actix_middleware::AuthSession`].

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod names;
pub mod services;
pub mod state;

pub use config::Config;
pub use state::AppState;
