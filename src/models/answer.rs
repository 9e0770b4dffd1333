use serde::{Deserialize, Serialize};

/// 提交答案的请求体
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerRequest<'a> {
    pub question_id_original: &'a str,
    pub chosen_letters: &'a [String],
    pub exam_type: &'a str,
}

/// 服务端的判题结果
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerVerdict {
    pub is_correct: bool,
    #[serde(rename = "correct_answer_was", default)]
    pub correct_answer: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// 409 响应体：本题在当前会话中已经作答
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConflictPayload {
    #[serde(default)]
    pub is_correct: bool,
    #[serde(rename = "correct_answer_was", default)]
    pub correct_answer: String,
    #[serde(rename = "previous_user_answers", default)]
    pub previous_answers: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 把 "BD" 这样的答案串拆成单个字母
pub fn split_letters(answer: &str) -> Vec<String> {
    answer
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_string())
        .collect()
}
