/// StudyHub API 客户端
///
/// 封装所有与后端 API 相关的调用逻辑
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::clients::StudyApi;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    AnswerVerdict, ConflictPayload, Exam, ExamType, Question, SessionResults, StudySession,
    SubmitAnswerRequest,
};

/// StudyHub API 客户端
pub struct StudyHubClient {
    http: Client,
    config: Config,
}

impl StudyHubClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| ApiError::RequestFailed {
                endpoint: config.api_base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.config.api_url(endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| request_failed(endpoint, source))?;

        read_json(endpoint, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let url = self.config.api_url(endpoint);
        debug!("POST {} Payload: {}", url, body);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| request_failed(endpoint, source))?;

        read_json(endpoint, response).await
    }
}

#[async_trait]
impl StudyApi for StudyHubClient {
    async fn list_exams(&self) -> Result<Vec<Exam>, ApiError> {
        self.get_json("exams", &[]).await
    }

    async fn question_count(&self, exam_type: &ExamType) -> Result<usize, ApiError> {
        self.get_json("questions/count", &[("exam_type", exam_type.as_str())])
            .await
    }

    async fn fetch_question(
        &self,
        question_index: usize,
        exam_type: &ExamType,
    ) -> Result<Question, ApiError> {
        let endpoint = format!("questions/{}", question_index);
        self.get_json(&endpoint, &[("exam_type", exam_type.as_str())])
            .await
    }

    async fn submit_answer(
        &self,
        question_id: &str,
        chosen_letters: &[String],
        exam_type: &ExamType,
    ) -> Result<AnswerVerdict, ApiError> {
        let endpoint = "submit_answer";
        let body = SubmitAnswerRequest {
            question_id_original: question_id,
            chosen_letters,
            exam_type: exam_type.as_str(),
        };
        debug!("提交答案: {} -> {:?}", question_id, chosen_letters);

        let response = self
            .http
            .post(self.config.api_url(endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|source| request_failed(endpoint, source))?;

        // 409 需要和普通失败区分开，响应体里带着上次的作答
        if response.status() == StatusCode::CONFLICT {
            let text = response
                .text()
                .await
                .map_err(|source| request_failed(endpoint, source))?;
            let payload: ConflictPayload =
                serde_json::from_str(&text).map_err(|source| ApiError::JsonParseFailed {
                    endpoint: endpoint.to_string(),
                    source,
                })?;
            debug!("题目 {} 已作答过: {:?}", question_id, payload.previous_answers);
            return Err(ApiError::Conflict(Box::new(payload)));
        }

        read_json(endpoint, response).await
    }

    async fn current_session(
        &self,
        exam_type: &ExamType,
    ) -> Result<Option<StudySession>, ApiError> {
        self.get_json("current-session", &[("exam_type", exam_type.as_str())])
            .await
    }

    async fn start_new_study(
        &self,
        start_question_index: usize,
        exam_type: &ExamType,
    ) -> Result<StudySession, ApiError> {
        let body = json!({
            "start_question_idx": start_question_index,
            "exam_type": exam_type.as_str(),
        });
        self.post_json("start-new-study", &body).await
    }

    async fn resume_study(&self, exam_type: &ExamType) -> Result<StudySession, ApiError> {
        self.get_json("resume-study", &[("exam_type", exam_type.as_str())])
            .await
    }

    async fn finish_study(&self, exam_type: &ExamType) -> Result<StudySession, ApiError> {
        let body = json!({ "exam_type": exam_type.as_str() });
        self.post_json("finish-study", &body).await
    }

    async fn list_sessions(&self) -> Result<Vec<StudySession>, ApiError> {
        self.get_json("study-sessions", &[]).await
    }

    async fn session_results(&self, session_id: i64) -> Result<SessionResults, ApiError> {
        let endpoint = format!("results/session/{}", session_id);
        self.get_json(&endpoint, &[]).await
    }

    async fn delete_session(&self, session_id: i64) -> Result<(), ApiError> {
        let endpoint = format!("session/{}", session_id);
        let url = self.config.api_url(&endpoint);
        debug!("DELETE {}", url);

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|source| request_failed(&endpoint, source))?;

        let _: Value = read_json(&endpoint, response).await?;
        Ok(())
    }
}

fn request_failed(endpoint: &str, source: reqwest::Error) -> ApiError {
    warn!("API请求失败 ({}): {}", endpoint, source);
    ApiError::RequestFailed {
        endpoint: endpoint.to_string(),
        source,
    }
}

/// 检查状态码并解析响应体
async fn read_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| request_failed(endpoint, source))?;

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound {
            endpoint: endpoint.to_string(),
        });
    }

    if !status.is_success() {
        let message = extract_error_message(&text);
        warn!("⚠️ {} 返回 {}: {:?}", endpoint, status, message);
        return Err(ApiError::BadResponse {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|source| ApiError::JsonParseFailed {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// 后端的错误体使用 `error` 或 `message` 字段
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"error": "exam_type é obrigatório"}"#).as_deref(),
            Some("exam_type é obrigatório")
        );
        assert_eq!(
            extract_error_message(r#"{"success": false, "message": "Dados não recebidos."}"#)
                .as_deref(),
            Some("Dados não recebidos.")
        );
        assert_eq!(extract_error_message("<html>502</html>"), None);
    }

    /// 需要本地启动后端：cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_list_exams_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let client = StudyHubClient::new(&config).expect("创建客户端失败");

        let exams = client.list_exams().await.expect("获取考试列表失败");
        println!("找到 {} 个考试", exams.len());
    }
}
