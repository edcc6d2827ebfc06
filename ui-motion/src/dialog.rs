//! # Dialog 模块
//!
//! 模态对话框栈。
//!
//! 由负责模态焦点的一方持有，`open`/`close` 与对话框的打开/关闭一一对应。
//! 栈深度即对话框的排序层级，最上层的对话框最后打开。

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 对话框失去焦点时的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeselectAction {
    #[default]
    None,
    Submit,
    Cancel,
}

/// 对话框栈
#[derive(Debug, Clone)]
pub struct DialogStack<Id> {
    stack: Vec<Id>,
}

impl<Id> Default for DialogStack<Id> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<Id: Copy + Eq + Debug> DialogStack<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 压入打开的对话框，返回它的排序层级（从 1 开始）
    ///
    /// 已在栈中的对话框不会重复压入，返回现有层级。
    pub fn open(&mut self, id: Id) -> usize {
        if let Some(index) = self.position(id) {
            warn!(dialog = ?id, "对话框已在栈中");
            return index + 1;
        }
        self.stack.push(id);
        debug!(dialog = ?id, depth = self.stack.len(), "对话框打开");
        self.stack.len()
    }

    /// 关闭对话框
    ///
    /// 正常情况下关闭的总是最上层；不在栈顶时记录警告并把它从中间移除。
    /// 返回对话框是否在栈中。
    pub fn close(&mut self, id: Id) -> bool {
        match self.position(id) {
            Some(index) if index + 1 == self.stack.len() => {
                self.stack.pop();
                debug!(dialog = ?id, depth = self.stack.len(), "对话框关闭");
                true
            }
            Some(index) => {
                warn!(dialog = ?id, depth = self.stack.len(), "关闭的对话框不在栈顶");
                self.stack.remove(index);
                true
            }
            None => {
                warn!(dialog = ?id, "关闭未打开的对话框");
                false
            }
        }
    }

    /// 对话框失去焦点
    ///
    /// 只有已打开且位于栈顶的对话框才执行配置的动作，其他情况返回 `None`。
    pub fn on_blurred(&self, id: Id, opened: bool, action: DeselectAction) -> DeselectAction {
        if !opened || !self.is_top(id) {
            return DeselectAction::None;
        }
        action
    }

    pub fn top(&self) -> Option<Id> {
        self.stack.last().copied()
    }

    pub fn is_top(&self, id: Id) -> bool {
        self.top() == Some(id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.position(id).is_some()
    }

    /// 打开的对话框数量
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn position(&self, id: Id) -> Option<usize> {
        self.stack.iter().position(|open| *open == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_returns_sorting_order() {
        let mut stack = DialogStack::new();
        assert_eq!(stack.open(1), 1);
        assert_eq!(stack.open(2), 2);
        assert_eq!(stack.open(1), 1);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), Some(2));
    }

    #[test]
    fn test_close_pops() {
        let mut stack = DialogStack::new();
        stack.open("settings");
        stack.open("confirm");

        assert!(stack.close("confirm"));
        assert!(stack.is_top("settings"));
        assert!(stack.close("settings"));
        assert!(stack.is_empty());
        assert!(!stack.close("settings"));
    }

    #[test]
    fn test_close_out_of_order_removes() {
        let mut stack = DialogStack::new();
        stack.open('a');
        stack.open('b');
        stack.open('c');

        assert!(stack.close('b'));
        assert_eq!(stack.depth(), 2);
        assert!(!stack.contains('b'));
        assert!(stack.is_top('c'));
    }

    #[test]
    fn test_blur_only_for_top_opened_dialog() {
        let mut stack = DialogStack::new();
        stack.open(1);
        stack.open(2);

        assert_eq!(
            stack.on_blurred(1, true, DeselectAction::Cancel),
            DeselectAction::None
        );
        assert_eq!(
            stack.on_blurred(2, true, DeselectAction::Submit),
            DeselectAction::Submit
        );
        assert_eq!(
            stack.on_blurred(2, false, DeselectAction::Submit),
            DeselectAction::None
        );
    }
}
