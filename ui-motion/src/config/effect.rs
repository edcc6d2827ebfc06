//! 视觉效果配置。

use serde::{Deserialize, Serialize};

use super::duration::AnimationDuration;
use crate::state::EffectTrigger;
use crate::value::Color;

/// 效果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EffectMode {
    #[default]
    Overlay,
    Blur,
    Shadow,
}

/// 效果表面的样式
///
/// 每次激活前都会用它重置表面。
#[derive(Debug, Clone, PartialEq)]
pub enum EffectStyle {
    Overlay { color: Color, image: Option<String> },
    Blur { intensity: u32 },
    Shadow { color: Color },
}

impl EffectStyle {
    pub fn mode(&self) -> EffectMode {
        match self {
            EffectStyle::Overlay { .. } => EffectMode::Overlay,
            EffectStyle::Blur { .. } => EffectMode::Blur,
            EffectStyle::Shadow { .. } => EffectMode::Shadow,
        }
    }

    /// 完全可见时通道的值：遮罩/阴影为颜色透明度，模糊为强度
    pub fn peak(&self) -> f32 {
        match self {
            EffectStyle::Overlay { color, .. } | EffectStyle::Shadow { color } => color.a,
            EffectStyle::Blur { intensity } => *intensity as f32,
        }
    }
}

/// 效果配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// 激活条件
    pub trigger: EffectTrigger,
    pub mode: EffectMode,

    pub overlay_color: Color,
    /// 遮罩图片（宿主资源 ID）
    pub overlay_image: Option<String>,
    pub blur_intensity: u32,
    pub shadow_color: Color,

    pub fade_in: AnimationDuration,
    pub custom_fade_in: f32,
    pub fade_out: AnimationDuration,
    pub custom_fade_out: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            trigger: EffectTrigger::empty(),
            mode: EffectMode::default(),
            overlay_color: Color::WHITE.with_alpha(0.5),
            overlay_image: None,
            blur_intensity: 10,
            shadow_color: Color::BLACK,
            fade_in: AnimationDuration::Normal,
            custom_fade_in: 0.5,
            fade_out: AnimationDuration::Normal,
            custom_fade_out: 0.5,
        }
    }
}

impl EffectConfig {
    pub fn new(mode: EffectMode, trigger: EffectTrigger) -> Self {
        Self {
            mode,
            trigger,
            ..Self::default()
        }
    }

    /// 淡入时长（秒）
    pub fn fade_in_seconds(&self) -> f32 {
        self.fade_in.fade_seconds(self.custom_fade_in)
    }

    /// 淡出时长（秒）
    pub fn fade_out_seconds(&self) -> f32 {
        self.fade_out.fade_seconds(self.custom_fade_out)
    }

    /// 当前模式对应的样式
    pub fn style(&self) -> EffectStyle {
        match self.mode {
            EffectMode::Overlay => EffectStyle::Overlay {
                color: self.overlay_color,
                image: self.overlay_image.clone(),
            },
            EffectMode::Blur => EffectStyle::Blur {
                intensity: self.blur_intensity,
            },
            EffectMode::Shadow => EffectStyle::Shadow {
                color: self.shadow_color,
            },
        }
    }
}
