//! # Resize 模块
//!
//! 拖拽调整尺寸：沿指定方向改变尺寸并保持对边不动。
//!
//! 位置按中心点计算，所以尺寸变化 `d` 时中心点移动 `d / 2`。
//! 同一轴上同时给出两个方向时，`RIGHT` 优先于 `LEFT`，`UP` 优先于 `DOWN`。

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::animator::Animator;
use crate::target::LayoutTarget;
use crate::value::Vec2;

bitflags! {
    /// 拖拽手柄所在的边
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ResizeDirection: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const UP    = 1 << 2;
        const DOWN  = 1 << 3;
    }
}

/// 尺寸上下限
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeLimits {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            min: Vec2::new(100.0, 100.0),
            max: Vec2::new(1000.0, 1000.0),
        }
    }
}

/// 尺寸调整器
#[derive(Debug, Clone, PartialEq)]
pub struct Resizer {
    /// `None` 表示不限制尺寸
    pub limits: Option<ResizeLimits>,
    /// 结束时把尺寸和位置保存为动画器的静止值
    pub save_position: bool,
    direction: ResizeDirection,
    resizing: bool,
}

impl Default for Resizer {
    fn default() -> Self {
        Self {
            limits: None,
            save_position: true,
            direction: ResizeDirection::empty(),
            resizing: false,
        }
    }
}

impl Resizer {
    pub fn new(limits: Option<ResizeLimits>) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// 开始拖拽（手柄按下）
    pub fn begin(&mut self, direction: ResizeDirection) {
        self.direction = direction;
        self.resizing = true;
    }

    /// 拖拽中，返回实际的尺寸变化
    pub fn drag(&self, target: &dyn LayoutTarget, amount: Vec2) -> Vec2 {
        self.resize(target, amount)
    }

    /// 按当前方向调整尺寸
    pub fn resize(&self, target: &dyn LayoutTarget, amount: Vec2) -> Vec2 {
        let mut change = Vec2::zero();
        // 中心点相对尺寸变化的移动方向
        let mut shift = Vec2::zero();

        if self.direction.contains(ResizeDirection::RIGHT) {
            change.x = amount.x;
            shift.x = 0.5;
        } else if self.direction.contains(ResizeDirection::LEFT) {
            change.x = -amount.x;
            shift.x = -0.5;
        }

        if self.direction.contains(ResizeDirection::UP) {
            change.y = amount.y;
            shift.y = 0.5;
        } else if self.direction.contains(ResizeDirection::DOWN) {
            change.y = -amount.y;
            shift.y = -0.5;
        }

        let old_size = target.size();
        let mut new_size = old_size + change;
        if let Some(limits) = self.limits {
            new_size = new_size.clamp(limits.min, limits.max);
        }
        let actual = new_size - old_size;

        target.set_size(new_size);
        target.set_position(
            target.position() + Vec2::new(actual.x * shift.x, actual.y * shift.y),
        );
        trace!(size = ?new_size, "调整尺寸");
        actual
    }

    /// 结束拖拽
    ///
    /// 开启 `save_position` 且提供了动画器时，把当前尺寸和位置记录为静止值，
    /// 之后带重置的停止会恢复到调整后的布局。
    pub fn end(&mut self, animator: Option<&mut Animator>) {
        self.resizing = false;
        if !self.save_position {
            return;
        }
        if let Some(animator) = animator {
            animator.size_mut().save_property();
            animator.position_mut().save_property();
        }
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    pub fn direction(&self) -> ResizeDirection {
        self.direction
    }
}
