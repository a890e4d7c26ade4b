//! # Actix Middleware Library
//!
//! Request-level plumbing shared by the HTTP services
//!
//! ## Modules
//! - `session`: refresh store seam and the session resolution protocol
//! - `gate`: `RequestGate` middleware and the `AuthSession` extractor
//! - `metrics`: Prometheus metrics middleware and `/metrics` handler

pub mod gate;
pub mod metrics;
pub mod session;

pub use gate::{AuthSession, Credentials, RequestGate, REFRESH_TOKEN_HEADER};
pub use metrics::{serve_metrics, MetricsMiddleware};
pub use session::{
    AuthDecision, AuthState, ExpiredType, RefreshStore, RenewalResponse, SessionResolver,
    StoreError,
};
