//! # Motion Host
//!
//! `ui-motion` 的无界面参考宿主。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 加载运行配置与 JSON 场景
//! - 提供组件和效果表面的记录型实现
//! - 以固定帧率驱动调度器，并汇总回放结果
//!
//! Host 层不包含过渡逻辑，只负责把场景事件转换为对核心 API 的调用。

pub mod config;
pub mod runner;
pub mod scene;
pub mod surface;
pub mod widget;

pub use config::{AppConfig, ConfigError};
pub use runner::{EffectReport, Report, SceneRunner, WidgetReport};
pub use scene::{Action, Cue, Scene, SceneError, WidgetSpec};
pub use surface::{RecordingFactory, RecordingSurface};
pub use widget::{Widget, WidgetLayout};
