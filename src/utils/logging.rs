/// 日志工具模块
///
/// 初始化 tracing 订阅者，并提供日志格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{SessionResults, StudySession};

/// 初始化日志
///
/// `RUST_LOG` 优先；否则详细模式为 debug，普通模式为 info。
/// 重复调用不会报错（测试中会多次初始化）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("studyhub_client={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 StudyHub 客户端启动");
    info!("🌐 后端地址: {}", config.api_base_url);
    info!("⏱️ 请求超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 打印会话结果统计
pub fn print_session_report(report: &SessionResults) {
    let session = &report.session;
    info!("\n{}", "=".repeat(60));
    info!("📊 会话 {} 结果", session.id);
    info!("时间: {}", session.timestamp.format("%d/%m/%Y %H:%M"));
    info!("{}", "=".repeat(60));
    log_session_line(session);
    info!("正确率: {}%", session.hit_rate());
    info!("{}", "─".repeat(60));
    if report.results.is_empty() {
        info!("本会话没有作答记录");
    }
    for (i, result) in report.results.iter().enumerate() {
        let review = result
            .question_idx
            .map(|i| format!(" [第 {} 题]", i + 1))
            .unwrap_or_default();
        info!(
            "{:>3}. {} {} → {}{}",
            i + 1,
            if result.is_correct { "✅" } else { "❌" },
            truncate_text(&result.question_title, 60),
            result.user_answers,
            review
        );
    }
    info!("{}", "=".repeat(60));
}

/// 单行显示会话摘要
pub fn log_session_line(session: &StudySession) {
    info!(
        "#{} {} [{}] 得分 {} ({})",
        session.id,
        session.timestamp.format("%d/%m/%Y %H:%M"),
        session.status.label(),
        session.score_display(),
        session.tally_display()
    );
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
