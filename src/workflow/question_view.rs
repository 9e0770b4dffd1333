//! 答题页 - 流程层
//!
//! 组合导航、选项选择器和提交协调器：
//! 1. 解析入口 → 加载题目总数和题目
//! 2. 选择选项 → 提交 → 显示判定
//! 3. 上一题 / 下一题 / 结束学习

use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::StudyApi;
use crate::error::{AppResult, SubmitError};
use crate::models::Question;
use crate::services::{SelectionTracker, SubmissionCoordinator, SubmissionOutcome};
use crate::workflow::navigation::{Direction, NavigationController, QueryParams, RouteParams};
use crate::workflow::ViewTarget;

/// 提示信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    MustSelect(usize),
    Correct,
    Incorrect,
    AlreadyAnswered,
    SendFailed,
}

impl Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::None => Ok(()),
            Feedback::MustSelect(n) => write!(f, "Você deve selecionar {} opção(ões).", n),
            Feedback::Correct => f.write_str("Resposta correta!"),
            Feedback::Incorrect => f.write_str("Resposta incorreta."),
            Feedback::AlreadyAnswered => {
                f.write_str("Esta questão já foi respondida anteriormente.")
            }
            Feedback::SendFailed => f.write_str("Erro ao enviar resposta. Tente novamente."),
        }
    }
}

/// 答题页视图模型
pub struct QuestionView {
    api: Arc<dyn StudyApi>,
    navigation: NavigationController,
    question: Option<Question>,
    selection: SelectionTracker,
    submission: SubmissionCoordinator,
    feedback: Feedback,
    loading: bool,
}

impl QuestionView {
    pub fn new(api: Arc<dyn StudyApi>, navigation: NavigationController) -> Self {
        Self {
            submission: SubmissionCoordinator::new(api.clone()),
            api,
            navigation,
            question: None,
            selection: SelectionTracker::default(),
            feedback: Feedback::None,
            loading: false,
        }
    }

    /// 进入答题页
    ///
    /// 缺少 exam_type 时返回配置错误；题目加载失败时返回 API 错误。
    /// 调用方用 `AppError::fallback_target` 决定跳转到哪里
    pub async fn enter(
        api: Arc<dyn StudyApi>,
        route: &RouteParams,
        query: &QueryParams,
    ) -> AppResult<Self> {
        let navigation = NavigationController::enter(route, query)?;
        let mut view = Self::new(api, navigation);
        view.load_total().await;
        view.load_question().await?;
        Ok(view)
    }

    /// 加载题目总数，失败只记录日志
    pub async fn load_total(&mut self) {
        match self.api.question_count(self.navigation.exam_type()).await {
            Ok(total) => {
                self.navigation.set_total_questions(total);
                debug!("题目总数: {}", total);
            }
            Err(e) => warn!("⚠️ 获取题目总数失败: {}", e),
        }
    }

    /// 加载当前索引的题目
    ///
    /// 开始加载前就清空选择和判定，旧题的状态不会带到新题
    pub async fn load_question(&mut self) -> AppResult<()> {
        self.question = None;
        self.selection.reset();
        self.submission.reset();
        self.feedback = Feedback::None;
        self.loading = true;

        let result = self
            .api
            .fetch_question(self.navigation.question_index(), self.navigation.exam_type())
            .await;
        self.loading = false;

        let question = result?;
        info!(
            "{} 已加载题目 {}（需选 {} 项）",
            self.navigation.session_ref(),
            question.id,
            question.required_answers()
        );
        self.selection.reset_for(question.required_answers());
        self.question = Some(question);
        Ok(())
    }

    pub fn toggle(&mut self, letter: &str) {
        if self.question.is_none() {
            return;
        }
        self.selection.toggle(letter);
    }

    pub fn is_selected(&self, letter: &str) -> bool {
        self.selection.is_selected(letter)
    }

    /// 提交当前选择，并根据结果更新提示信息
    pub async fn submit(&mut self) -> Result<SubmissionOutcome, SubmitError> {
        let result = match self.question.as_ref() {
            Some(question) => self
                .submission
                .submit(question, &mut self.selection, self.navigation.exam_type())
                .await
                .cloned(),
            None => Err(SubmitError::NoQuestion),
        };

        match &result {
            Ok(SubmissionOutcome::Judged { is_correct, .. }) => {
                self.feedback = if *is_correct {
                    Feedback::Correct
                } else {
                    Feedback::Incorrect
                };
            }
            Ok(SubmissionOutcome::AlreadyJudged { .. }) => {
                self.feedback = Feedback::AlreadyAnswered;
            }
            Ok(SubmissionOutcome::Pending) => {}
            Err(SubmitError::Validation { required, .. }) => {
                self.feedback = Feedback::MustSelect(*required);
            }
            // 重试也不会成功，不提示重新发送
            Err(SubmitError::NoQuestion) => {}
            Err(SubmitError::Transport(_)) => {
                self.feedback = Feedback::SendFailed;
            }
        }

        result
    }

    /// 下一题
    pub async fn next(&mut self) -> AppResult<()> {
        self.navigation.advance(Direction::Next);
        self.load_question().await
    }

    /// 上一题，第 0 题时不做任何事
    pub async fn previous(&mut self) -> AppResult<()> {
        if !self.navigation.advance(Direction::Previous) {
            return Ok(());
        }
        self.load_question().await
    }

    /// 结束学习，返回要跳转的页面
    pub async fn finish(&self) -> ViewTarget {
        self.navigation.finish(self.api.as_ref()).await
    }

    // ========== 只读访问 ==========

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn selection(&self) -> &[String] {
        self.selection.current_selection()
    }

    pub fn outcome(&self) -> &SubmissionOutcome {
        self.submission.outcome()
    }

    pub fn is_answered(&self) -> bool {
        self.submission.outcome().is_judged()
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn question_index(&self) -> usize {
        self.navigation.question_index()
    }

    pub fn total_questions(&self) -> Option<usize> {
        self.navigation.session_ref().total_questions
    }
}
