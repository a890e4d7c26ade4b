//! PostgreSQL access
//!
//! Statements are free functions over any executor so that the same SQL runs
//! on the pool and inside a transaction.

pub mod questions;
pub mod refresh_tokens;
pub mod users;

pub use questions::PgQuestionStore;
pub use refresh_tokens::PgRefreshStore;
pub use users::PgAccountStore;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
