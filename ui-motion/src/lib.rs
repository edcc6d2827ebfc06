//! # UI Motion
//!
//! UI 组件的过渡引擎：协作式任务调度、属性补间、状态触发的视觉效果。
//!
//! ## 架构概述
//!
//! `ui-motion` 是纯逻辑核心，不依赖任何 IO 或渲染引擎，也没有自己的时钟。
//! 宿主每帧驱动一次调度器，核心通过宿主实现的 trait 修改目标：
//!
//! ```text
//! Host                               ui-motion
//!   │                                    │
//!   │── 状态变化 ─► Effect::sync ────────►│ 触发求值 → start / stop
//!   │── Animator::animate(config) ──────►│ 配置解析 → 每属性一个 Tweener
//!   │── Scheduler::advance(dt) ─────────►│ 推进所有任务
//!   │◄── LayoutTarget / EffectSurface ───│ 写入属性、效果通道
//!   │── Scheduler::destroy_owner ───────►│ 取消该组件的所有任务
//! ```
//!
//! ## 核心类型
//!
//! - [`Scheduler`] / [`Task`]：单线程协作式任务，完成通知恰好一次
//! - [`Tweener`]：单属性补间状态机，重启时先取消旧任务
//! - [`AnimationConfig`]：预设与自定义分层的动画配置，解析为 [`ResolvedAnimation`]
//! - [`Animator`]：一个目标的五个补间器与同步完成回调
//! - [`Effect`]：遮罩 / 模糊 / 阴影效果的激活状态机
//! - [`should_be_active`]：状态位 × 触发位求值
//!
//! ## 使用示例
//!
//! ```ignore
//! let scheduler = Scheduler::new();
//! let owner = scheduler.register_owner("panel");
//! let mut animator = Animator::new(panel.clone(), scheduler.clone(), owner);
//!
//! animator.animate(&AnimationConfig::default(), || println!("淡入完成"));
//!
//! loop {
//!     scheduler.advance(frame_dt);
//! }
//! ```

pub mod animator;
pub mod component;
pub mod config;
pub mod dialog;
pub mod easing;
pub mod effect;
pub mod error;
pub mod resize;
pub mod state;
pub mod target;
pub mod task;
pub mod tween;
pub mod value;

pub use animator::{Animator, CompletionLatch};
pub use component::Component;
pub use config::{
    AnimationConfig, AnimationDirection, AnimationDuration, AnimationEase, EffectConfig,
    EffectMode, EffectStyle, FadePreset, LayoutSnapshot, MovementPreset, PresetDirection,
    PropertyAnimation, ResolvedAnimation, Span,
};
pub use dialog::{DeselectAction, DialogStack};
pub use easing::{EasingFunction, ease};
pub use effect::{Effect, EffectPhase, EffectSurface, SurfaceFactory};
pub use error::{TaskError, TaskResult};
pub use resize::{ResizeDirection, ResizeLimits, Resizer};
pub use state::{EffectTrigger, UiState, should_be_active};
pub use target::{LayoutTarget, PropertyAccessor, PropertyKind, SimplePropertyAccessor, TargetProperty};
pub use task::{OwnerId, Scheduler, Step, Suspend, Task, TaskBody, TaskId, TaskState};
pub use tween::{Tween, TweenOutcome, TweenPhase, Tweener};
pub use value::{Anchors, Color, Tweenable, Vec2, Vec3};
