//! 终端前端
//!
//! 按 `ViewTarget` 在各个页面之间跳转，每个页面读取一行命令

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use crate::clients::{StudyApi, StudyHubClient};
use crate::config::Config;
use crate::error::SubmitError;
use crate::models::Question;
use crate::utils::html::strip_tags;
use crate::utils::logging::{self, log_startup};
use crate::workflow::{
    load_report, parse_location, review_target, ExamSelection, Feedback, QuestionView,
    SessionHistory, ViewTarget,
};

type Input = Lines<BufReader<Stdin>>;

/// 应用主结构
pub struct App {
    api: Arc<dyn StudyApi>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let client = StudyHubClient::new(&config).context("无法创建 HTTP 客户端")?;
        Ok(Self::with_api(Arc::new(client)))
    }

    pub fn with_api(api: Arc<dyn StudyApi>) -> Self {
        Self { api }
    }

    /// 运行应用主逻辑，输入结束或选择退出时返回
    pub async fn run(&self) -> Result<()> {
        let mut input = BufReader::new(tokio::io::stdin()).lines();
        let mut target = ViewTarget::Home;

        loop {
            info!("➡️ {}", target);
            let next = match &target {
                ViewTarget::Home => self.home(&mut input).await?,
                ViewTarget::ExamSelection => self.exam_selection(&mut input).await?,
                ViewTarget::Question { .. } => self.question(&target, &mut input).await?,
                ViewTarget::StudySessions => self.study_sessions(&mut input).await?,
                ViewTarget::SessionResults { session_id } => {
                    self.session_results(*session_id, &mut input).await?
                }
            };

            match next {
                Some(next) => target = next,
                None => break,
            }
        }

        info!("👋 已退出");
        Ok(())
    }

    // ========== 页面 ==========

    async fn home(&self, input: &mut Input) -> Result<Option<ViewTarget>> {
        println!("\n=== StudyHub ===");
        println!("1) 选择考试   2) 学习历史   q) 退出");

        loop {
            let Some(line) = read_command(input).await? else {
                return Ok(None);
            };
            match line.as_str() {
                "1" => return Ok(Some(ViewTarget::ExamSelection)),
                "2" => return Ok(Some(ViewTarget::StudySessions)),
                "q" => return Ok(None),
                _ => println!("未知命令: {}", line),
            }
        }
    }

    async fn exam_selection(&self, input: &mut Input) -> Result<Option<ViewTarget>> {
        let mut page = ExamSelection::new(self.api.clone());
        page.load().await;

        println!("\n=== 选择考试 ===");
        for (i, exam) in page.exams().iter().enumerate() {
            let resume = match page.in_progress(&exam.id).await {
                Some(session) => format!(
                    "  [进行中，c {} 从第 {} 题继续]",
                    i + 1,
                    session.last_question_idx_viewed.unwrap_or(0) + 1
                ),
                None => String::new(),
            };
            println!(
                "{:>3}) {} ({} 题){}",
                i + 1,
                exam.name,
                exam.question_count,
                resume
            );
        }
        println!("n <序号> [起始题号] 开始新考试 | c <序号> 继续 | b 返回");

        loop {
            let Some(line) = read_command(input).await? else {
                return Ok(None);
            };
            let parts: Vec<&str> = line.split_whitespace().collect();

            let exam_id = |raw: &str| {
                raw.parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| page.exams().get(i))
                    .map(|e| e.id.clone())
            };

            let result = match parts.as_slice() {
                ["b"] => return Ok(Some(ViewTarget::Home)),
                ["n", idx, rest @ ..] => match exam_id(*idx) {
                    Some(id) => {
                        let start = rest.first().and_then(|s| s.parse().ok());
                        page.start_new(&id, start).await
                    }
                    None => {
                        println!("无效的序号: {}", idx);
                        continue;
                    }
                },
                ["c", idx] => match exam_id(*idx) {
                    Some(id) => page.continue_exam(&id).await,
                    None => {
                        println!("无效的序号: {}", idx);
                        continue;
                    }
                },
                _ => {
                    println!("未知命令: {}", line);
                    continue;
                }
            };

            match result {
                Ok(target) => return Ok(Some(target)),
                Err(e) => println!("操作失败: {}", e),
            }
        }
    }

    async fn question(
        &self,
        target: &ViewTarget,
        input: &mut Input,
    ) -> Result<Option<ViewTarget>> {
        let (route, query) = match parse_location(&target.location()) {
            Ok(params) => params,
            Err(e) => {
                warn!("⚠️ {}", e);
                return Ok(Some(ViewTarget::ExamSelection));
            }
        };

        let mut view = match QuestionView::enter(self.api.clone(), &route, &query).await {
            Ok(view) => view,
            Err(e) => {
                warn!("⚠️ 无法进入答题页: {}", e);
                return Ok(Some(e.fallback_target()));
            }
        };

        loop {
            render_question(&view);

            let Some(line) = read_command(input).await? else {
                return Ok(None);
            };

            let moved = match line.as_str() {
                "s" => {
                    // 提示信息已经写进 view.feedback()
                    match view.submit().await {
                        Ok(_) | Err(SubmitError::Validation { .. }) => {}
                        Err(e) => warn!("⚠️ 提交答案失败: {}", e),
                    }
                    Ok(())
                }
                "n" => view.next().await,
                "p" => view.previous().await,
                "f" => return Ok(Some(view.finish().await)),
                "b" => return Ok(Some(ViewTarget::Home)),
                letters => {
                    for letter in letters.split_whitespace() {
                        view.toggle(&letter.to_uppercase());
                    }
                    Ok(())
                }
            };

            if let Err(e) = moved {
                warn!("⚠️ 加载题目失败: {}", e);
                return Ok(Some(e.fallback_target()));
            }
        }
    }

    async fn study_sessions(&self, input: &mut Input) -> Result<Option<ViewTarget>> {
        let mut page = SessionHistory::new(self.api.clone());
        if let Err(e) = page.load().await {
            println!("加载失败: {}", e);
        }

        loop {
            println!("\n=== 学习历史 ===");
            if page.sessions().is_empty() {
                println!("没有学习会话");
            }
            for session in page.sessions() {
                logging::log_session_line(session);
            }
            println!("v <ID> 查看结果 | d <ID> 删除 | b 返回");

            let Some(line) = read_command(input).await? else {
                return Ok(None);
            };
            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts.as_slice() {
                ["b"] => return Ok(Some(ViewTarget::Home)),
                ["v", id] => match id.parse() {
                    Ok(session_id) => return Ok(Some(ViewTarget::SessionResults { session_id })),
                    Err(_) => println!("无效的 ID: {}", id),
                },
                ["d", id] => match id.parse() {
                    Ok(session_id) => {
                        if let Err(e) = page.delete(session_id).await {
                            println!("删除失败: {}", e);
                        }
                    }
                    Err(_) => println!("无效的 ID: {}", id),
                },
                _ => println!("未知命令: {}", line),
            }
        }
    }

    async fn session_results(
        &self,
        session_id: i64,
        input: &mut Input,
    ) -> Result<Option<ViewTarget>> {
        let report = match load_report(self.api.as_ref(), session_id).await {
            Ok(report) => report,
            Err(fallback) => return Ok(Some(fallback)),
        };

        logging::print_session_report(&report);
        println!("r <序号> 回顾题目 | 回车 返回学习历史");

        loop {
            let Some(line) = read_command(input).await? else {
                return Ok(None);
            };
            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts.as_slice() {
                [] | ["b"] => return Ok(Some(ViewTarget::StudySessions)),
                ["r", n] => {
                    let result = n
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| report.results.get(i));
                    match result {
                        Some(result) => {
                            return Ok(Some(review_target(&report.session, result)));
                        }
                        None => println!("无效的序号: {}", n),
                    }
                }
                _ => println!("未知命令: {}", line),
            }
        }
    }
}

/// 读取一行命令，输入结束时返回 None
async fn read_command(input: &mut Input) -> Result<Option<String>> {
    let line = input.next_line().await.context("读取输入失败")?;
    Ok(line.map(|l| l.trim().to_string()))
}

fn render_question(view: &QuestionView) {
    let total = view
        .total_questions()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!("\n=== 题目 {}/{} ===", view.question_index() + 1, total);

    let Some(question) = view.question() else {
        println!("（没有题目）");
        return;
    };

    println!("{}", question.title);
    println!("{}", strip_tags(&question.statement_html));
    if question.is_multi_select() {
        println!("（选择 {} 项）", question.required_answers());
    }

    let correct = view.outcome().correct_letters();
    for option in &question.options {
        let mark = if view.is_selected(&option.letter) { "[x]" } else { "[ ]" };
        let verdict = if view.is_answered() && correct.contains(&option.letter) {
            " ✓"
        } else {
            ""
        };
        println!("{} {}) {}{}", mark, option.letter, option.text, verdict);
    }

    if view.feedback() != Feedback::None {
        println!("{}", view.feedback());
    }
    if view.is_answered() {
        if let Some(source) = source_link(question) {
            println!("来源: {}", source);
        }
    }
    println!("字母 切换选项 | s 提交 | n 下一题 | p 上一题 | f 结束 | b 返回");
}

fn source_link(question: &Question) -> Option<&str> {
    question.source_url.as_deref().filter(|s| !s.is_empty())
}
