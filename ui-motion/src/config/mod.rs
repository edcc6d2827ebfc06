//! # Config 模块
//!
//! 声明式动画配置。
//!
//! ## 分层规则
//!
//! 1. 预设（时长档位、缓动档位、移动/淡入淡出预设）
//! 2. 预设为 `Custom` 时使用显式覆盖值
//!
//! 所有记录都实现了 `Deserialize` 并带 `#[serde(default)]`，
//! 只写了部分字段的 JSON 也能加载。解析是纯函数。

mod animation;
mod duration;
mod effect;

pub use animation::{
    AnimationConfig, AnimationDirection, DEFAULT_PRIORITY, FadePreset, LayoutSnapshot,
    MovementPreset, PresetDirection, PropertyAnimation, PropertySet, PropertySnapshot,
    PropertyValue, ResolvedAnimation, Span,
};
pub use duration::{AnimationDuration, AnimationEase};
pub use effect::{EffectConfig, EffectMode, EffectStyle};
