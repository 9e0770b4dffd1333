use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 学习会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    /// 界面上显示的状态文字
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "Em Progresso",
            SessionStatus::Completed => "Completada",
            SessionStatus::Abandoned => "Abandonada",
        }
    }
}

/// 学习会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub status: SessionStatus,
    #[serde(default)]
    pub score_percentage: Option<f64>,
    #[serde(default)]
    pub total_questions_in_session: Option<u32>,
    #[serde(default)]
    pub correct_answers_in_session: Option<u32>,
    #[serde(default)]
    pub last_question_idx_viewed: Option<usize>,
    #[serde(default)]
    pub exam_type: Option<String>,
}

/// 成绩档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl StudySession {
    /// 得分，保留两位小数；没有得分时显示 0.00%
    pub fn score_display(&self) -> String {
        format!("{:.2}%", self.score_percentage.unwrap_or(0.0))
    }

    /// "答对数/总数"
    pub fn tally_display(&self) -> String {
        format!(
            "{}/{}",
            self.correct_answers_in_session.unwrap_or(0),
            self.total_questions_in_session.unwrap_or(0)
        )
    }

    /// 正确率（整数百分比），总数为 0 时返回 0
    pub fn hit_rate(&self) -> u32 {
        let total = self.total_questions_in_session.unwrap_or(0);
        if total == 0 {
            return 0;
        }
        let correct = self.correct_answers_in_session.unwrap_or(0);
        ((correct as f64 / total as f64) * 100.0).round() as u32
    }

    pub fn score_band(&self) -> ScoreBand {
        let score = self.score_percentage.unwrap_or(0.0);
        if score >= 70.0 {
            ScoreBand::High
        } else if score >= 40.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// 单条作答记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseResult {
    pub response_id: i64,
    pub question_id: String,
    #[serde(default)]
    pub question_title: String,
    /// 题目在考试中的索引，题库变动后可能找不到
    #[serde(default)]
    pub question_idx: Option<usize>,
    #[serde(default)]
    pub user_answers: String,
    pub is_correct: bool,
    pub timestamp: NaiveDateTime,
}

/// 会话结果页数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub session: StudySession,
    #[serde(default)]
    pub results: Vec<ResponseResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(score: Option<f64>, correct: Option<u32>, total: Option<u32>) -> StudySession {
        StudySession {
            id: 1,
            timestamp: NaiveDateTime::parse_from_str("2025-03-01T10:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
            status: SessionStatus::Completed,
            score_percentage: score,
            total_questions_in_session: total,
            correct_answers_in_session: correct,
            last_question_idx_viewed: None,
            exam_type: None,
        }
    }

    #[test]
    fn test_deserialize_finished_session() {
        let body = r#"{
            "id": 12,
            "timestamp": "2025-03-01T10:15:42.123456",
            "status": "completed",
            "score_percentage": 66.666,
            "total_questions_in_session": 3,
            "correct_answers_in_session": 2,
            "exam_type": "saa-c03"
        }"#;
        let session: StudySession = serde_json::from_str(body).unwrap();
        assert_eq!(session.id, 12);
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.score_display(), "66.67%");
        assert_eq!(session.tally_display(), "2/3");
        assert_eq!(session.hit_rate(), 67);
        assert_eq!(session.score_band(), ScoreBand::Medium);
    }

    #[test]
    fn test_empty_session_display() {
        let s = session(None, None, None);
        assert_eq!(s.score_display(), "0.00%");
        assert_eq!(s.tally_display(), "0/0");
        assert_eq!(s.hit_rate(), 0);
        assert_eq!(s.score_band(), ScoreBand::Low);
    }

    #[test]
    fn test_score_band_boundaries() {
        assert_eq!(session(Some(70.0), None, None).score_band(), ScoreBand::High);
        assert_eq!(session(Some(40.0), None, None).score_band(), ScoreBand::Medium);
        assert_eq!(session(Some(39.99), None, None).score_band(), ScoreBand::Low);
    }

    #[test]
    fn test_status_labels() {
        let status: SessionStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status.label(), "Em Progresso");
        assert_eq!(SessionStatus::Abandoned.label(), "Abandonada");
    }
}
