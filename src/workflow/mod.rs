//! 流程层
//!
//! 每个页面一个视图模型，页面之间通过 `ViewTarget` 跳转

pub mod exam_selection;
pub mod navigation;
pub mod question_view;
pub mod session_history;

pub use exam_selection::ExamSelection;
pub use navigation::{
    parse_location, resolve_entry, Direction, NavigationController, QueryParams, RouteParams,
    SessionRef,
};
pub use question_view::{Feedback, QuestionView};
pub use session_history::{load_report, review_target, SessionHistory};

use std::fmt::Display;

use reqwest::Url;

use crate::models::ExamType;

/// 页面跳转目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTarget {
    Home,
    ExamSelection,
    Question {
        exam_type: ExamType,
        question_index: usize,
    },
    StudySessions,
    SessionResults {
        session_id: i64,
    },
}

impl ViewTarget {
    /// 页面地址
    pub fn location(&self) -> String {
        match self {
            ViewTarget::Home => "/".to_string(),
            ViewTarget::ExamSelection => "/exam-selection".to_string(),
            ViewTarget::Question {
                exam_type,
                question_index,
            } => question_location(exam_type, *question_index),
            ViewTarget::StudySessions => "/study-sessions".to_string(),
            ViewTarget::SessionResults { session_id } => format!("/session-results/{}", session_id),
        }
    }
}

impl Display for ViewTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.location())
    }
}

fn question_location(exam_type: &ExamType, question_index: usize) -> String {
    let index = question_index.to_string();
    let params = [("exam_type", exam_type.as_str()), ("question_idx", index.as_str())];
    match Url::parse_with_params("http://localhost/question", &params) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => format!("/question?exam_type={}&question_idx={}", exam_type, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_location_round_trips_through_entry() {
        let target = ViewTarget::Question {
            exam_type: ExamType::parse("AWS SAA").unwrap(),
            question_index: 7,
        };
        let location = target.location();
        assert_eq!(location, "/question?exam_type=AWS+SAA&question_idx=7");

        let (route, query) = parse_location(&location).unwrap();
        let entry = resolve_entry(&route, &query).unwrap();
        assert_eq!(entry.exam_type.as_str(), "AWS SAA");
        assert_eq!(entry.question_index, 7);
    }

    #[test]
    fn test_static_locations() {
        assert_eq!(ViewTarget::Home.to_string(), "/");
        assert_eq!(
            ViewTarget::SessionResults { session_id: 9 }.location(),
            "/session-results/9"
        );
    }
}
