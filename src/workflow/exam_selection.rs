//! 考试选择页

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::clients::StudyApi;
use crate::error::AppResult;
use crate::models::{Exam, ExamType, SessionStatus, StudySession};
use crate::workflow::ViewTarget;

/// 考试选择页视图模型
pub struct ExamSelection {
    api: Arc<dyn StudyApi>,
    exams: Vec<Exam>,
    loading: bool,
}

impl ExamSelection {
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self {
            api,
            exams: Vec::new(),
            loading: true,
        }
    }

    /// 加载考试列表（按名称排序）
    ///
    /// 失败时列表为空
    pub async fn load(&mut self) {
        self.loading = true;
        match self.api.list_exams().await {
            Ok(mut exams) => {
                exams.sort_by(|a, b| a.name.cmp(&b.name));
                info!("✓ 找到 {} 个可用考试", exams.len());
                self.exams = exams;
            }
            Err(e) => {
                error!("❌ 加载考试列表失败: {}", e);
                self.exams.clear();
            }
        }
        self.loading = false;
    }

    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// 开始新的模拟考试
    ///
    /// `start_number` 是从 1 开始的题号，空或 0 表示从第一题开始
    pub async fn start_new(
        &self,
        exam_id: &str,
        start_number: Option<usize>,
    ) -> AppResult<ViewTarget> {
        let exam_type = ExamType::parse(exam_id)?;
        let start_index = start_index(start_number);

        info!("🚀 开始新的模拟考试 {}，从第 {} 题开始", exam_type, start_index + 1);
        self.api.start_new_study(start_index, &exam_type).await?;

        Ok(ViewTarget::Question {
            exam_type,
            question_index: start_index,
        })
    }

    /// 继续上次的学习，从最后看过的题目开始
    pub async fn continue_exam(&self, exam_id: &str) -> AppResult<ViewTarget> {
        let exam_type = ExamType::parse(exam_id)?;
        let session = self.api.resume_study(&exam_type).await?;
        let question_index = session.last_question_idx_viewed.unwrap_or(0);

        info!("继续会话 {}，第 {} 题", session.id, question_index + 1);
        Ok(ViewTarget::Question {
            exam_type,
            question_index,
        })
    }

    /// 查询进行中的会话，没有开始过时返回 None
    pub async fn current_session(&self, exam_id: &str) -> AppResult<Option<StudySession>> {
        let exam_type = ExamType::parse(exam_id)?;
        Ok(self.api.current_session(&exam_type).await?)
    }

    /// 进行中的会话，用于在 "继续" 旁边提示上次的题号
    ///
    /// 查询失败只记录日志，返回 None
    pub async fn in_progress(&self, exam_id: &str) -> Option<StudySession> {
        match self.current_session(exam_id).await {
            Ok(Some(session)) if session.status == SessionStatus::InProgress => {
                debug!("{} 有进行中的会话 {}", exam_id, session.id);
                Some(session)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("⚠️ 查询 {} 的进行中会话失败: {}", exam_id, e);
                None
            }
        }
    }
}

fn start_index(start_number: Option<usize>) -> usize {
    match start_number {
        Some(n) if n > 0 => n - 1,
        _ => 0,
    }
}
