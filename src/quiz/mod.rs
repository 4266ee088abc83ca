//! Quiz progression over one or more question sets.

mod session;

pub use session::{AnswerResult, Phase, QuizSession, SessionError, SetSummary, percent};
