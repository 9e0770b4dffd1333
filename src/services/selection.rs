//! 选项选择器 - 业务能力层
//!
//! 只维护"当前这道题选了哪些字母"，不访问网络

use tracing::debug;

/// 当前题目的选择状态
///
/// 字母按选择顺序保存，达到上限时挤掉最早选的那个（滑动窗口），
/// 而不是拒绝新的选择
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    letters: Vec<String>,
    capacity: usize,
    locked: bool,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SelectionTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            letters: Vec::new(),
            capacity: capacity.max(1),
            locked: false,
        }
    }

    /// 切换一个字母的选中状态
    ///
    /// 已判题（锁定）时忽略
    pub fn toggle(&mut self, letter: &str) {
        if self.locked {
            debug!("题目已判定，忽略选择 {}", letter);
            return;
        }

        if let Some(pos) = self.letters.iter().position(|l| l == letter) {
            self.letters.remove(pos);
            return;
        }

        if self.letters.len() >= self.capacity {
            let evicted = self.letters.remove(0);
            debug!("已达到 {} 个上限，替换最早的选择 {}", self.capacity, evicted);
        }
        self.letters.push(letter.to_string());
    }

    pub fn is_selected(&self, letter: &str) -> bool {
        self.letters.iter().any(|l| l == letter)
    }

    pub fn current_selection(&self) -> &[String] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// 清空当前选择（同一道题）
    pub fn reset(&mut self) {
        self.letters.clear();
        self.locked = false;
    }

    /// 换题时调用：清空并设置新题的选择数量
    pub fn reset_for(&mut self, capacity: usize) {
        self.reset();
        self.capacity = capacity.max(1);
    }

    /// 判题后锁定，之后的 toggle 都不生效
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// 用服务端记录的历史作答覆盖当前显示，并锁定
    ///
    /// 服务端写入时已经校验过数量，这里按原样采用
    pub fn adopt(&mut self, previous: Vec<String>) {
        self.letters = previous;
        self.locked = true;
    }
}
