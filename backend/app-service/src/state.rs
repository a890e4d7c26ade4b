use std::sync::Arc;

use crate::services::{AccountService, QuestionService};

/// Shared handles injected into every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub questions: Arc<QuestionService>,
}
