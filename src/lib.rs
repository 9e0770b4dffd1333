//! # StudyHub Client
//!
//! StudyHub 模拟考试的客户端：选择考试、答题、提交、查看学习历史。
//! 判分和持久化都在后端，客户端只通过 HTTP API 访问
//!
//! ## 架构设计
//!
//! ### ① 接入层（Clients）
//! - `clients/` - `StudyApi` trait 描述后端能力，`StudyHubClient` 是 reqwest 实现
//!
//! ### ② 业务能力层（Services）
//! - `SelectionTracker` - 当前题目的选项选择（滑动窗口）
//! - `SubmissionCoordinator` - 每道题只提交一次，409 时回放历史作答
//!
//! ### ③ 流程层（Workflow）
//! - `NavigationController` - 解析入口参数，上一题/下一题/结束学习
//! - `QuestionView` - 答题页，组合上面三者
//! - `ExamSelection` / `SessionHistory` - 考试选择页、学习历史页
//!
//! ### ④ 前端（App）
//! - `app` - 终端前端，按 `ViewTarget` 在页面之间跳转

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{StudyApi, StudyHubClient};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, ConfigError, SubmitError};
pub use models::{ExamType, Question};
pub use services::{SelectionTracker, SubmissionCoordinator, SubmissionOutcome};
pub use workflow::{NavigationController, QuestionView, ViewTarget};
