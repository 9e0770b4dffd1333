pub mod answer;
pub mod exam;
pub mod question;
pub mod session;

pub use answer::{split_letters, AnswerVerdict, ConflictPayload, SubmitAnswerRequest};
pub use exam::{Exam, ExamType};
pub use question::{AnswerOption, Question};
pub use session::{ResponseResult, ScoreBand, SessionResults, SessionStatus, StudySession};
