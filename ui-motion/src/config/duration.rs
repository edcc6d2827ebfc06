//! 时长与缓动的预设选择。

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;

/// 过渡时长预设
///
/// 预设的序数 ÷ 100 即秒数；`Custom` 使用显式给出的时长。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationDuration {
    Instant,
    Fastest,
    Faster,
    Fast,
    #[default]
    Normal,
    Slow,
    Slower,
    Slowest,
    Custom,
}

impl AnimationDuration {
    /// 预设序数（`Custom` 没有序数）
    pub fn ordinal(&self) -> Option<u32> {
        match self {
            AnimationDuration::Instant => Some(0),
            AnimationDuration::Fastest => Some(15),
            AnimationDuration::Faster => Some(25),
            AnimationDuration::Fast => Some(35),
            AnimationDuration::Normal => Some(50),
            AnimationDuration::Slow => Some(75),
            AnimationDuration::Slower => Some(100),
            AnimationDuration::Slowest => Some(150),
            AnimationDuration::Custom => None,
        }
    }

    /// 标准过渡时长（秒）
    pub fn seconds(&self, custom: f32) -> f32 {
        match self.ordinal() {
            Some(ordinal) => ordinal as f32 / 100.0,
            None => custom.max(0.0),
        }
    }

    /// 效果淡入淡出时长（秒）
    ///
    /// 时间尺度是标准过渡的 1/3；`Fastest` 表示立即切换。
    pub fn fade_seconds(&self, custom: f32) -> f32 {
        match self {
            AnimationDuration::Fastest => 0.0,
            AnimationDuration::Custom => custom.max(0.0),
            other => other.ordinal().map_or(0.0, |ordinal| ordinal as f32 / 300.0),
        }
    }
}

/// 缓动预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationEase {
    Linear,
    #[default]
    Smooth,
    EaseIn,
    EaseOut,
    Bounce,
    Elastic,
    Custom,
}

impl AnimationEase {
    /// 解析为具体缓动函数；`Custom` 使用 `custom`
    pub fn resolve(&self, custom: EasingFunction) -> EasingFunction {
        match self {
            AnimationEase::Linear => EasingFunction::Linear,
            AnimationEase::Smooth => EasingFunction::EaseInOut,
            AnimationEase::EaseIn => EasingFunction::EaseIn,
            AnimationEase::EaseOut => EasingFunction::EaseOut,
            AnimationEase::Bounce => EasingFunction::EaseOutBounce,
            AnimationEase::Elastic => EasingFunction::EaseOutElastic,
            AnimationEase::Custom => custom,
        }
    }
}
