//! 题目导航 - 流程层
//!
//! 维护"正在做哪个考试的第几题"，只有这里会修改这个坐标

use std::fmt::Display;

use reqwest::Url;
use tracing::{error, info, warn};

use crate::clients::StudyApi;
use crate::error::ConfigError;
use crate::models::ExamType;
use crate::workflow::ViewTarget;

/// 路由路径参数（`/question/:id`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub id: Option<String>,
}

/// 查询参数（`?exam_type=&question_idx=`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub exam_type: Option<String>,
    pub question_idx: Option<String>,
}

/// 翻题方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// 会话坐标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRef {
    pub exam_type: ExamType,
    /// 题目索引（从0开始）
    pub question_index: usize,
    /// 题目总数，加载成功前为空
    pub total_questions: Option<usize>,
}

impl Display for SessionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.total_questions {
            Some(total) => write!(
                f,
                "[考试 {} 题目#{}/{}]",
                self.exam_type,
                self.question_index + 1,
                total
            ),
            None => write!(f, "[考试 {} 题目#{}]", self.exam_type, self.question_index + 1),
        }
    }
}

/// 从地址中拆出路径参数和查询参数
///
/// 支持 `/question`、`/question/2`，以及完整 URL
pub fn parse_location(location: &str) -> Result<(RouteParams, QueryParams), ConfigError> {
    let invalid = || ConfigError::InvalidLocation {
        location: location.to_string(),
    };

    let base = Url::parse("http://localhost/").map_err(|_| invalid())?;
    let url = base.join(location).map_err(|_| invalid())?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let route = match segments.as_slice() {
        ["question"] => RouteParams { id: None },
        ["question", id] => RouteParams {
            id: Some(id.to_string()),
        },
        _ => return Err(invalid()),
    };

    let mut query = QueryParams::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "exam_type" => query.exam_type = Some(value.into_owned()),
            "question_idx" => query.question_idx = Some(value.into_owned()),
            _ => {}
        }
    }

    Ok((route, query))
}

/// 解析入口参数
///
/// - 缺少 exam_type 是配置错误
/// - 查询参数优先于路径参数，都没有时为 0
/// - 无法解析的索引按缺失处理
pub fn resolve_entry(route: &RouteParams, query: &QueryParams) -> Result<SessionRef, ConfigError> {
    let exam_type = ExamType::parse(query.exam_type.clone().unwrap_or_default())?;

    let question_index = parse_index(query.question_idx.as_deref())
        .or_else(|| parse_index(route.id.as_deref()))
        .unwrap_or(0);

    Ok(SessionRef {
        exam_type,
        question_index,
        total_questions: None,
    })
}

fn parse_index(raw: Option<&str>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(index) => Some(index),
        Err(_) => {
            warn!("⚠️ 无法解析题目索引 '{}'，忽略", raw);
            None
        }
    }
}

/// 导航控制器
#[derive(Debug, Clone)]
pub struct NavigationController {
    current: SessionRef,
}

impl NavigationController {
    pub fn new(current: SessionRef) -> Self {
        Self { current }
    }

    pub fn enter(route: &RouteParams, query: &QueryParams) -> Result<Self, ConfigError> {
        let current = resolve_entry(route, query)?;
        info!("进入题目页 {}", current);
        Ok(Self::new(current))
    }

    pub fn session_ref(&self) -> &SessionRef {
        &self.current
    }

    pub fn exam_type(&self) -> &ExamType {
        &self.current.exam_type
    }

    pub fn question_index(&self) -> usize {
        self.current.question_index
    }

    pub fn set_total_questions(&mut self, total: usize) {
        self.current.total_questions = Some(total);
    }

    /// 翻题，返回索引是否变化
    ///
    /// 向后翻总是允许，题库末尾由后端在加载时报告；第 0 题向前翻不做任何事
    pub fn advance(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Next => {
                self.current.question_index += 1;
                true
            }
            Direction::Previous => {
                if self.current.question_index == 0 {
                    return false;
                }
                self.current.question_index -= 1;
                true
            }
        }
    }

    /// 当前坐标对应的页面
    pub fn target(&self) -> ViewTarget {
        ViewTarget::Question {
            exam_type: self.current.exam_type.clone(),
            question_index: self.current.question_index,
        }
    }

    /// 结束本次学习
    ///
    /// 成功跳到结果页，失败回到首页
    pub async fn finish(&self, api: &dyn StudyApi) -> ViewTarget {
        info!("📋 结束学习 {}", self.current.exam_type);
        match api.finish_study(&self.current.exam_type).await {
            Ok(session) => {
                info!("✓ 会话 {} 已结束，得分 {}", session.id, session.score_display());
                ViewTarget::SessionResults {
                    session_id: session.id,
                }
            }
            Err(e) => {
                error!("❌ 结束学习失败: {}", e);
                ViewTarget::Home
            }
        }
    }
}
