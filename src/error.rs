//! 错误类型
//!
//! - `ValidationError`：选项数量不对，本地拦截，不发请求
//! - `ConflictError`：题目已作答，由提交协调器就地恢复
//! - `TransportError`：网络/服务端失败，可重试，不修改状态
//! - `ConfigurationError`：缺少必需的考试上下文，跳回安全页面

use thiserror::Error;

use crate::models::answer::ConflictPayload;
use crate::workflow::ViewTarget;

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 资源不存在（例如题目索引越界）
    #[error("资源不存在: {endpoint}")]
    NotFound { endpoint: String },
    /// 题目在当前会话中已经作答过（HTTP 409）
    #[error("题目已作答")]
    Conflict(Box<ConflictPayload>),
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 提交答案时的错误
#[derive(Debug, Error)]
pub enum SubmitError {
    /// 选中数量与题目要求不一致
    #[error("必须选择 {required} 个选项，当前选择了 {selected} 个")]
    Validation { required: usize, selected: usize },
    /// 没有加载题目
    #[error("当前没有可提交的题目")]
    NoQuestion,
    /// 网络或服务端失败，可以重试
    #[error(transparent)]
    Transport(#[from] ApiError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 exam_type
    #[error("exam_type 是必需的")]
    MissingExamType,
    /// 无法解析入口地址
    #[error("无法解析地址 '{location}'")]
    InvalidLocation { location: String },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    #[error("提交错误: {0}")]
    Submit(#[from] SubmitError),
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// 出错后应该跳转到的安全页面
    ///
    /// 配置错误回到考试选择页，其余回到首页
    pub fn fallback_target(&self) -> ViewTarget {
        match self {
            AppError::Config(_) => ViewTarget::ExamSelection,
            _ => ViewTarget::Home,
        }
    }

    /// 是否可以原地重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Api(ApiError::RequestFailed { .. })
                | AppError::Submit(SubmitError::Transport(ApiError::RequestFailed { .. }))
                | AppError::Api(ApiError::BadResponse { status: 500..=599, .. })
                | AppError::Submit(SubmitError::Transport(ApiError::BadResponse {
                    status: 500..=599,
                    ..
                }))
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
