pub mod accounts;
pub mod questions;

pub use accounts::{AccountService, AccountStore, AccountTx};
pub use questions::{QuestionService, QuestionStore};
