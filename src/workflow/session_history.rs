//! 学习历史与会话结果

use std::sync::Arc;

use tracing::{error, info};

use crate::clients::StudyApi;
use crate::error::AppResult;
use crate::models::{ExamType, ResponseResult, SessionResults, StudySession};
use crate::workflow::ViewTarget;

/// 学习历史页视图模型
pub struct SessionHistory {
    api: Arc<dyn StudyApi>,
    sessions: Vec<StudySession>,
}

impl SessionHistory {
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self {
            api,
            sessions: Vec::new(),
        }
    }

    /// 加载全部会话，顺序与后端一致（最新的在前）
    pub async fn load(&mut self) -> AppResult<()> {
        match self.api.list_sessions().await {
            Ok(sessions) => {
                info!("✓ 共 {} 个学习会话", sessions.len());
                self.sessions = sessions;
                Ok(())
            }
            Err(e) => {
                error!("❌ 加载学习会话失败: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    /// 删除会话，只有后端删除成功才从本地列表移除
    pub async fn delete(&mut self, session_id: i64) -> AppResult<()> {
        if let Err(e) = self.api.delete_session(session_id).await {
            error!("❌ 删除会话 {} 失败: {}", session_id, e);
            return Err(e.into());
        }

        self.sessions.retain(|s| s.id != session_id);
        info!("🗑️ 会话 {} 已删除", session_id);
        Ok(())
    }
}

/// 加载某个会话的结果
///
/// 失败时返回应跳转的页面（学习历史）
pub async fn load_report(
    api: &dyn StudyApi,
    session_id: i64,
) -> Result<SessionResults, ViewTarget> {
    match api.session_results(session_id).await {
        Ok(results) => {
            info!(
                "会话 {}: {} 条作答，得分 {}",
                session_id,
                results.results.len(),
                results.session.score_display()
            );
            Ok(results)
        }
        Err(e) => {
            error!("❌ 加载会话 {} 结果失败: {}", session_id, e);
            Err(ViewTarget::StudySessions)
        }
    }
}

/// 从结果页回到某道题
///
/// 会话没有考试类型，或题目已不在题库里（没有索引）时回到学习历史
pub fn review_target(session: &StudySession, result: &ResponseResult) -> ViewTarget {
    let exam_type = session
        .exam_type
        .as_deref()
        .and_then(|e| ExamType::parse(e).ok());

    match (exam_type, result.question_idx) {
        (Some(exam_type), Some(question_index)) => ViewTarget::Question {
            exam_type,
            question_index,
        },
        _ => ViewTarget::StudySessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(exam_type: Option<&str>) -> StudySession {
        serde_json::from_value(json!({
            "id": 3,
            "timestamp": "2025-03-01T10:00:00",
            "status": "completed",
            "score_percentage": 100.0,
            "total_questions_in_session": 1,
            "correct_answers_in_session": 1,
            "exam_type": exam_type
        }))
        .unwrap()
    }

    fn result(question_idx: Option<usize>) -> ResponseResult {
        serde_json::from_value(json!({
            "response_id": 9,
            "question_id": "q-12",
            "question_title": "Question #13",
            "question_idx": question_idx,
            "user_answers": "A,C",
            "is_correct": true,
            "timestamp": "2025-03-01T10:05:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_review_target_opens_answered_question() {
        let target = review_target(&session(Some("saa-c03")), &result(Some(12)));
        assert_eq!(target.location(), "/question?exam_type=saa-c03&question_idx=12");
    }

    #[test]
    fn test_review_target_falls_back_to_history() {
        assert_eq!(
            review_target(&session(Some("saa-c03")), &result(None)),
            ViewTarget::StudySessions
        );
        assert_eq!(
            review_target(&session(None), &result(Some(4))),
            ViewTarget::StudySessions
        );
        assert_eq!(
            review_target(&session(Some("  ")), &result(Some(4))),
            ViewTarget::StudySessions
        );
    }
}
