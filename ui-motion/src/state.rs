//! # State 模块
//!
//! 组件状态位与效果触发位，以及两者之间的求值规则。

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// 组件状态
    ///
    /// 由宿主计算，核心层只读。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct UiState: u32 {
        const OPENED        = 1 << 0;
        const FOCUSED_THIS  = 1 << 1;
        const FOCUSED_CHILD = 1 << 2;
        const IN_TRANSITION = 1 << 3;
        const DISABLED      = 1 << 4;
        const INTERACTABLE  = 1 << 5;
    }
}

impl UiState {
    /// 自身或任一后代获得焦点
    pub fn is_focused(&self) -> bool {
        self.intersects(Self::FOCUSED_THIS | Self::FOCUSED_CHILD)
    }
}

bitflags! {
    /// 效果触发条件
    ///
    /// 多个条件之间是"或"关系。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EffectTrigger: u32 {
        const FOCUSED           = 1 << 0;
        const NOT_FOCUSED       = 1 << 1;
        const IN_TRANSITION     = 1 << 2;
        const NOT_IN_TRANSITION = 1 << 3;
        const OPENED            = 1 << 4;
        const NOT_OPENED        = 1 << 5;
        const VISIBLE           = 1 << 6;
        const NOT_VISIBLE       = 1 << 7;
    }
}

impl EffectTrigger {
    /// 从原始位构造，保留未知位（未知位求值为 false）
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

/// 判断效果是否应该处于激活状态
///
/// 对触发掩码中的每一个已知位求值后取"或"；空掩码为 `false`。
/// `visible` 是组件的渲染可见性，不来自状态位。
pub fn should_be_active(trigger: EffectTrigger, state: UiState, visible: bool) -> bool {
    let focused = state.is_focused();
    let in_transition = state.contains(UiState::IN_TRANSITION);
    let opened = state.contains(UiState::OPENED);

    let predicates = [
        (EffectTrigger::FOCUSED, focused),
        (EffectTrigger::NOT_FOCUSED, !focused),
        (EffectTrigger::IN_TRANSITION, in_transition),
        (EffectTrigger::NOT_IN_TRANSITION, !in_transition),
        (EffectTrigger::OPENED, opened),
        (EffectTrigger::NOT_OPENED, !opened),
        (EffectTrigger::VISIBLE, visible),
        (EffectTrigger::NOT_VISIBLE, !visible),
    ];
    predicates
        .into_iter()
        .any(|(flag, matched)| matched && trigger.contains(flag))
}
