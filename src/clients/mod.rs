pub mod study_client;

pub use study_client::StudyHubClient;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{AnswerVerdict, Exam, ExamType, Question, SessionResults, StudySession};

/// 后端 StudyHub API 提供的能力
///
/// 视图模型只依赖这个 trait，测试时可以换成假实现
#[async_trait]
pub trait StudyApi: Send + Sync {
    async fn list_exams(&self) -> Result<Vec<Exam>, ApiError>;

    async fn question_count(&self, exam_type: &ExamType) -> Result<usize, ApiError>;

    async fn fetch_question(
        &self,
        question_index: usize,
        exam_type: &ExamType,
    ) -> Result<Question, ApiError>;

    /// 已作答的题目返回 `ApiError::Conflict`
    async fn submit_answer(
        &self,
        question_id: &str,
        chosen_letters: &[String],
        exam_type: &ExamType,
    ) -> Result<AnswerVerdict, ApiError>;

    async fn current_session(&self, exam_type: &ExamType)
        -> Result<Option<StudySession>, ApiError>;

    async fn start_new_study(
        &self,
        start_question_index: usize,
        exam_type: &ExamType,
    ) -> Result<StudySession, ApiError>;

    async fn resume_study(&self, exam_type: &ExamType) -> Result<StudySession, ApiError>;

    async fn finish_study(&self, exam_type: &ExamType) -> Result<StudySession, ApiError>;

    async fn list_sessions(&self) -> Result<Vec<StudySession>, ApiError>;

    async fn session_results(&self, session_id: i64) -> Result<SessionResults, ApiError>;

    async fn delete_session(&self, session_id: i64) -> Result<(), ApiError>;
}
