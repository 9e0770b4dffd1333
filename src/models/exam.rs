use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 可用的模拟考试
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub question_count: usize,
}

/// 考试类型标识，决定使用哪个题库/会话命名空间
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExamType(String);

impl ExamType {
    /// 空字符串视为缺失
    pub fn parse(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingExamType);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
