//! 答案提交协调器 - 业务能力层
//!
//! 每道题只向判题接口提交一次；409 时把服务端记录的作答回放到界面

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::StudyApi;
use crate::error::{ApiError, SubmitError};
use crate::models::{split_letters, ExamType, Question};
use crate::services::selection::SelectionTracker;

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionOutcome {
    /// 尚未提交
    #[default]
    Pending,
    /// 服务端刚刚给出的判定
    Judged {
        is_correct: bool,
        correct_answer: String,
    },
    /// 服务端报告本题在当前会话中已作答过
    AlreadyJudged {
        is_correct: bool,
        correct_answer: String,
        previous_selection: Vec<String>,
    },
}

impl SubmissionOutcome {
    pub fn is_judged(&self) -> bool {
        !matches!(self, SubmissionOutcome::Pending)
    }

    pub fn is_correct(&self) -> Option<bool> {
        match self {
            SubmissionOutcome::Pending => None,
            SubmissionOutcome::Judged { is_correct, .. }
            | SubmissionOutcome::AlreadyJudged { is_correct, .. } => Some(*is_correct),
        }
    }

    /// 正确答案拆成单个字母
    pub fn correct_letters(&self) -> Vec<String> {
        match self {
            SubmissionOutcome::Pending => Vec::new(),
            SubmissionOutcome::Judged { correct_answer, .. }
            | SubmissionOutcome::AlreadyJudged { correct_answer, .. } => {
                split_letters(correct_answer)
            }
        }
    }
}

/// 答案提交协调器
///
/// `submit` 需要 `&mut self`，同一道题的两次提交只能先后进行，
/// 第一次得到判定后第二次直接返回已有结果
pub struct SubmissionCoordinator {
    api: Arc<dyn StudyApi>,
    outcome: SubmissionOutcome,
}

impl SubmissionCoordinator {
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self {
            api,
            outcome: SubmissionOutcome::Pending,
        }
    }

    pub fn outcome(&self) -> &SubmissionOutcome {
        &self.outcome
    }

    /// 换题时调用
    pub fn reset(&mut self) {
        self.outcome = SubmissionOutcome::Pending;
    }

    /// 提交当前选择
    ///
    /// - 已判定：直接返回已有结果，不发请求
    /// - 数量不对：`SubmitError::Validation`，不发请求
    /// - 409：采用服务端记录的作答，结果为 `AlreadyJudged`
    /// - 其他失败：`SubmitError::Transport`，状态不变，可以重试
    pub async fn submit(
        &mut self,
        question: &Question,
        selection: &mut SelectionTracker,
        exam_type: &ExamType,
    ) -> Result<&SubmissionOutcome, SubmitError> {
        if self.outcome.is_judged() {
            debug!("题目 {} 已判定，忽略重复提交", question.id);
            return Ok(&self.outcome);
        }

        let required = question.required_answers();
        if selection.len() != required {
            return Err(SubmitError::Validation {
                required,
                selected: selection.len(),
            });
        }

        info!("📤 提交题目 {}: {:?}", question.id, selection.current_selection());

        let result = self
            .api
            .submit_answer(&question.id, selection.current_selection(), exam_type)
            .await;

        match result {
            Ok(verdict) => {
                info!(
                    "✓ 题目 {} 判定: {}",
                    question.id,
                    if verdict.is_correct { "正确" } else { "错误" }
                );
                selection.lock();
                self.outcome = SubmissionOutcome::Judged {
                    is_correct: verdict.is_correct,
                    correct_answer: verdict.correct_answer,
                };
            }
            Err(ApiError::Conflict(payload)) => {
                info!(
                    "题目 {} 已在本次会话中作答，采用历史作答 {:?}",
                    question.id, payload.previous_answers
                );
                let payload = *payload;
                selection.adopt(payload.previous_answers.clone());
                self.outcome = SubmissionOutcome::AlreadyJudged {
                    is_correct: payload.is_correct,
                    correct_answer: payload.correct_answer,
                    previous_selection: payload.previous_answers,
                };
            }
            Err(e) => {
                warn!("⚠️ 题目 {} 提交失败: {}", question.id, e);
                return Err(SubmitError::Transport(e));
            }
        }

        Ok(&self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnswerVerdict, ConflictPayload, Exam, SessionResults, StudySession,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 只实现提交接口的假 API
    struct JudgeStub {
        calls: AtomicUsize,
        reply: fn() -> Result<AnswerVerdict, ApiError>,
    }

    impl JudgeStub {
        fn new(reply: fn() -> Result<AnswerVerdict, ApiError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StudyApi for JudgeStub {
        async fn list_exams(&self) -> Result<Vec<Exam>, ApiError> {
            unimplemented!()
        }
        async fn question_count(&self, _: &ExamType) -> Result<usize, ApiError> {
            unimplemented!()
        }
        async fn fetch_question(&self, _: usize, _: &ExamType) -> Result<Question, ApiError> {
            unimplemented!()
        }
        async fn submit_answer(
            &self,
            _: &str,
            _: &[String],
            _: &ExamType,
        ) -> Result<AnswerVerdict, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
        async fn current_session(&self, _: &ExamType) -> Result<Option<StudySession>, ApiError> {
            unimplemented!()
        }
        async fn start_new_study(&self, _: usize, _: &ExamType) -> Result<StudySession, ApiError> {
            unimplemented!()
        }
        async fn resume_study(&self, _: &ExamType) -> Result<StudySession, ApiError> {
            unimplemented!()
        }
        async fn finish_study(&self, _: &ExamType) -> Result<StudySession, ApiError> {
            unimplemented!()
        }
        async fn list_sessions(&self) -> Result<Vec<StudySession>, ApiError> {
            unimplemented!()
        }
        async fn session_results(&self, _: i64) -> Result<SessionResults, ApiError> {
            unimplemented!()
        }
        async fn delete_session(&self, _: i64) -> Result<(), ApiError> {
            unimplemented!()
        }
    }

    fn question(required: usize) -> Question {
        serde_json::from_value(serde_json::json!({
            "id_original_json": "q-1",
            "opcoes": [
                {"letra": "A", "texto": "a"},
                {"letra": "B", "texto": "b"},
                {"letra": "C", "texto": "c"},
                {"letra": "D", "texto": "d"}
            ],
            "num_answers_to_select": required
        }))
        .unwrap()
    }

    fn exam() -> ExamType {
        ExamType::parse("saa-c03").unwrap()
    }

    fn correct() -> Result<AnswerVerdict, ApiError> {
        Ok(AnswerVerdict {
            is_correct: true,
            correct_answer: "BC".to_string(),
            message: None,
        })
    }

    fn conflict() -> Result<AnswerVerdict, ApiError> {
        Err(ApiError::Conflict(Box::new(ConflictPayload {
            is_correct: false,
            correct_answer: "BC".to_string(),
            previous_answers: vec!["A".to_string(), "D".to_string()],
            message: None,
        })))
    }

    fn server_down() -> Result<AnswerVerdict, ApiError> {
        Err(ApiError::BadResponse {
            endpoint: "submit_answer".to_string(),
            status: 500,
            message: None,
        })
    }

    #[tokio::test]
    async fn test_wrong_count_never_calls_network() {
        let stub = JudgeStub::new(correct);
        let mut coordinator = SubmissionCoordinator::new(stub.clone());
        let mut selection = SelectionTracker::new(2);
        selection.toggle("B");

        let err = coordinator
            .submit(&question(2), &mut selection, &exam())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Validation {
                required: 2,
                selected: 1
            }
        ));
        assert_eq!(stub.calls(), 0);
        assert_eq!(coordinator.outcome(), &SubmissionOutcome::Pending);
    }

    #[tokio::test]
    async fn test_judged_is_terminal() {
        let stub = JudgeStub::new(correct);
        let mut coordinator = SubmissionCoordinator::new(stub.clone());
        let mut selection = SelectionTracker::new(2);
        selection.toggle("B");
        selection.toggle("C");

        let outcome = coordinator
            .submit(&question(2), &mut selection, &exam())
            .await
            .unwrap()
            .clone();
        assert_eq!(
            outcome,
            SubmissionOutcome::Judged {
                is_correct: true,
                correct_answer: "BC".to_string()
            }
        );
        assert_eq!(outcome.correct_letters(), vec!["B", "C"]);

        // 判定后再点击、再提交都不生效
        selection.toggle("A");
        coordinator
            .submit(&question(2), &mut selection, &exam())
            .await
            .unwrap();
        assert_eq!(stub.calls(), 1);
        assert_eq!(selection.current_selection(), ["B", "C"]);
    }

    #[tokio::test]
    async fn test_conflict_adopts_previous_answers() {
        let stub = JudgeStub::new(conflict);
        let mut coordinator = SubmissionCoordinator::new(stub.clone());
        let mut selection = SelectionTracker::new(2);
        selection.toggle("B");
        selection.toggle("C");

        coordinator
            .submit(&question(2), &mut selection, &exam())
            .await
            .unwrap();

        assert_eq!(selection.current_selection(), ["A", "D"]);
        assert!(selection.is_locked());
        assert!(matches!(
            coordinator.outcome(),
            SubmissionOutcome::AlreadyJudged { is_correct: false, .. }
        ));

        // 回放的作答同样是最终状态
        selection.toggle("B");
        coordinator
            .submit(&question(2), &mut selection, &exam())
            .await
            .unwrap();
        assert_eq!(selection.current_selection(), ["A", "D"]);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_stays_pending() {
        let stub = JudgeStub::new(server_down);
        let mut coordinator = SubmissionCoordinator::new(stub.clone());
        let mut selection = SelectionTracker::new(1);
        selection.toggle("A");

        let result = coordinator.submit(&question(1), &mut selection, &exam()).await;
        assert!(matches!(result, Err(SubmitError::Transport(_))));
        assert_eq!(coordinator.outcome(), &SubmissionOutcome::Pending);
        assert!(!selection.is_locked());
        assert_eq!(selection.current_selection(), ["A"]);

        // 仍然可以重试
        let _ = coordinator.submit(&question(1), &mut selection, &exam()).await;
        assert_eq!(stub.calls(), 2);
    }
}
