mod bank;
mod ids;
mod question;
mod result;
mod session;

pub use bank::{BankError, QuestionBank};
pub use ids::SessionId;
pub use question::Question;
pub use result::{EndReason, QuizResult};
pub use session::{AnswerResult, AnswerStep, QuizSession, SessionError, TickOutcome};
