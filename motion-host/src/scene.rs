//! # Scene 模块
//!
//! 场景描述：一组组件（布局、命名动画、效果）和按帧排列的时间线。
//!
//! ```json
//! {
//!   "name": "demo",
//!   "widgets": [
//!     { "name": "panel", "animations": { "show": { "fade": "FadeIn" } } }
//!   ],
//!   "timeline": [
//!     { "frame": 0, "widget": "panel", "action": { "type": "animate", "animation": "show" } }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ui_motion::{AnimationConfig, EffectConfig, ResizeDirection, ResizeLimits, UiState, Vec2};

use crate::widget::WidgetLayout;

/// 场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub name: String,
    /// 覆盖配置中的帧率
    pub fps: Option<u32>,
    /// 回放帧数
    pub frames: Option<u32>,
    pub widgets: Vec<WidgetSpec>,
    pub timeline: Vec<Cue>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            fps: None,
            frames: None,
            widgets: Vec::new(),
            timeline: Vec::new(),
        }
    }
}

/// 组件声明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSpec {
    pub name: String,
    pub layout: WidgetLayout,
    pub state: UiState,
    pub visible: bool,
    /// 按名字引用的动画
    pub animations: BTreeMap<String, AnimationConfig>,
    pub effects: Vec<EffectConfig>,
    /// 尺寸调整的上下限，`None` 不限制
    pub resize_limits: Option<ResizeLimits>,
}

impl Default for WidgetSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            layout: WidgetLayout::default(),
            state: UiState::empty(),
            visible: true,
            animations: BTreeMap::new(),
            effects: Vec::new(),
            resize_limits: None,
        }
    }
}

/// 时间线上的一个事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// 在该帧推进调度器之前执行
    pub frame: u32,
    pub widget: String,
    pub action: Action,
}

/// 事件动作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Animate {
        animation: String,
    },
    Stop {
        animation: String,
        #[serde(default)]
        reset: bool,
    },
    StopAll {
        #[serde(default)]
        reset: bool,
    },
    SetState {
        state: UiState,
    },
    SetVisible {
        visible: bool,
    },
    SetLive {
        live: bool,
    },
    /// 一次完整的拖拽：按下、拖动、松开
    Resize {
        direction: ResizeDirection,
        amount: Vec2,
    },
    Destroy,
}

impl Scene {
    /// 从 JSON 文件加载并校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_json::from_str(content)?;
        scene.validate()?;
        Ok(scene)
    }

    /// 检查组件名唯一，以及时间线引用的组件和动画都存在
    pub fn validate(&self) -> Result<(), SceneError> {
        let mut names = HashSet::new();
        for widget in &self.widgets {
            if widget.name.is_empty() {
                return Err(SceneError::UnnamedWidget);
            }
            if !names.insert(widget.name.as_str()) {
                return Err(SceneError::DuplicateWidget(widget.name.clone()));
            }
        }

        for cue in &self.timeline {
            let widget = self
                .widget(&cue.widget)
                .ok_or_else(|| SceneError::UnknownWidget {
                    frame: cue.frame,
                    widget: cue.widget.clone(),
                })?;

            if let Action::Animate { animation } | Action::Stop { animation, .. } = &cue.action
                && !widget.animations.contains_key(animation)
            {
                return Err(SceneError::UnknownAnimation {
                    frame: cue.frame,
                    widget: cue.widget.clone(),
                    animation: animation.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn widget(&self, name: &str) -> Option<&WidgetSpec> {
        self.widgets.iter().find(|widget| widget.name == name)
    }

    /// 最后一个事件所在的帧
    pub fn last_cue_frame(&self) -> Option<u32> {
        self.timeline.iter().map(|cue| cue.frame).max()
    }
}

/// 场景错误
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("读取场景失败: {} - {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("场景解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("组件缺少名字")]
    UnnamedWidget,

    #[error("组件重名: {0}")]
    DuplicateWidget(String),

    #[error("第 {frame} 帧引用了不存在的组件: {widget}")]
    UnknownWidget { frame: u32, widget: String },

    #[error("第 {frame} 帧引用了组件 {widget} 不存在的动画: {animation}")]
    UnknownAnimation {
        frame: u32,
        widget: String,
        animation: String,
    },
}
