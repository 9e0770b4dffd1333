//! 程序配置
//!
//! 默认值 → TOML 文件（`STUDYHUB_CONFIG` 指定）→ 环境变量，后者覆盖前者

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 根地址（不含 `/api`）
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://studyhub-backend-vr4x.onrender.com".to_string(),
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 只读取环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 完整加载流程：配置文件（可选）+ 环境变量覆盖
    pub fn load() -> Result<Self> {
        let base = match std::env::var("STUDYHUB_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("STUDYHUB_API_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: std::env::var("STUDYHUB_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 拼接 API 路径，去掉根地址末尾多余的 `/`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
