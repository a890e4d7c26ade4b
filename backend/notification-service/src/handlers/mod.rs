pub mod question;

pub use question::QuestionInsertHandler;
