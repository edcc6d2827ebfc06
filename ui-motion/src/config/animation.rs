//! 布局动画配置与解析。

use serde::{Deserialize, Serialize};

use super::duration::{AnimationDuration, AnimationEase};
use crate::easing::EasingFunction;
use crate::target::{LayoutTarget, PropertyKind};
use crate::tween::Tween;
use crate::value::{Anchors, Tweenable, Vec2, Vec3};

/// 未显式指定时的动画优先级
pub const DEFAULT_PRIORITY: i32 = 10;

/// 属性动画方向
///
/// - `RelativeTo`: 从当前值移动 `delta`
/// - `From`: 从 `基准值 + delta` 回到基准值
/// - `To`: 从当前值移动到 `基准值 + delta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationDirection {
    From,
    To,
    RelativeTo,
}

/// 预设的方向（移动、淡入淡出预设使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PresetDirection {
    #[default]
    From,
    To,
}

impl From<PresetDirection> for AnimationDirection {
    fn from(direction: PresetDirection) -> Self {
        match direction {
            PresetDirection::From => AnimationDirection::From,
            PresetDirection::To => AnimationDirection::To,
        }
    }
}

/// 移动预设
///
/// 滑动预设通过锚点增量实现：锚点平移一个父节点宽/高。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementPreset {
    #[default]
    NoMovement,
    SlideLeft,
    SlideRight,
    SlideTop,
    SlideBottom,
    /// 使用逐属性配置
    Custom,
}

impl MovementPreset {
    fn slide_offset(&self) -> Option<Vec2> {
        match self {
            MovementPreset::SlideLeft => Some(Vec2::new(-1.0, 0.0)),
            MovementPreset::SlideRight => Some(Vec2::new(1.0, 0.0)),
            MovementPreset::SlideTop => Some(Vec2::new(0.0, 1.0)),
            MovementPreset::SlideBottom => Some(Vec2::new(0.0, -1.0)),
            MovementPreset::NoMovement | MovementPreset::Custom => None,
        }
    }
}

/// 淡入淡出预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FadePreset {
    NoFade,
    #[default]
    FadeIn,
    FadeOut,
    /// 使用 `alpha` 配置
    Custom,
}

/// 可以出现在属性动画配置里的值类型
///
/// 每种值类型自带默认方向：位置/尺寸/旋转默认 `RelativeTo`，锚点/透明度默认 `From`。
pub trait PropertyValue: Tweenable {
    const DEFAULT_DIRECTION: AnimationDirection;
    const ZERO: Self;
}

impl PropertyValue for Vec2 {
    const DEFAULT_DIRECTION: AnimationDirection = AnimationDirection::RelativeTo;
    const ZERO: Self = Vec2::zero();
}

impl PropertyValue for Vec3 {
    const DEFAULT_DIRECTION: AnimationDirection = AnimationDirection::RelativeTo;
    const ZERO: Self = Vec3::zero();
}

impl PropertyValue for Anchors {
    const DEFAULT_DIRECTION: AnimationDirection = AnimationDirection::From;
    const ZERO: Self = Anchors::zero();
}

impl PropertyValue for f32 {
    const DEFAULT_DIRECTION: AnimationDirection = AnimationDirection::From;
    const ZERO: Self = 0.0;
}

fn default_direction<T: PropertyValue>() -> AnimationDirection {
    T::DEFAULT_DIRECTION
}

fn zero_delta<T: PropertyValue>() -> T {
    T::ZERO
}

/// 单个属性的动画设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyAnimation<T: PropertyValue> {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_direction::<T>")]
    pub direction: AnimationDirection,
    #[serde(default = "zero_delta::<T>")]
    pub delta: T,
}

impl<T: PropertyValue> Default for PropertyAnimation<T> {
    fn default() -> Self {
        Self {
            enabled: false,
            direction: T::DEFAULT_DIRECTION,
            delta: T::ZERO,
        }
    }
}

impl<T: PropertyValue> PropertyAnimation<T> {
    /// 启用的属性动画
    pub fn new(direction: AnimationDirection, delta: T) -> Self {
        Self {
            enabled: true,
            direction,
            delta,
        }
    }

    /// 根据快照计算起止值；未启用时返回 `None`
    pub fn span(&self, snapshot: PropertySnapshot<T>) -> Option<Span<T>> {
        if !self.enabled {
            return None;
        }
        let PropertySnapshot { live, base } = snapshot;
        Some(match self.direction {
            AnimationDirection::RelativeTo => Span::new(live, live.offset(self.delta)),
            AnimationDirection::From => Span::new(base.offset(self.delta), base),
            AnimationDirection::To => Span::new(live, base.offset(self.delta)),
        })
    }
}

/// 一个属性在解析时刻的值
///
/// `live` 是当前值；`base` 是方向模式的基准，通常是补间器记录的静止值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySnapshot<V> {
    pub live: V,
    pub base: V,
}

impl<V: Copy> PropertySnapshot<V> {
    /// 当前值即基准值
    pub fn at(value: V) -> Self {
        Self {
            live: value,
            base: value,
        }
    }
}

/// 目标在解析时刻的布局快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    pub position: PropertySnapshot<Vec2>,
    pub anchors: PropertySnapshot<Anchors>,
    pub size: PropertySnapshot<Vec2>,
    pub rotation: PropertySnapshot<Vec3>,
    pub alpha: PropertySnapshot<f32>,
}

impl LayoutSnapshot {
    /// 直接读取目标当前值（没有记录过静止值时的情况）
    pub fn of(target: &dyn LayoutTarget) -> Self {
        Self {
            position: PropertySnapshot::at(target.position()),
            anchors: PropertySnapshot::at(target.anchors()),
            size: PropertySnapshot::at(target.size()),
            rotation: PropertySnapshot::at(target.rotation()),
            alpha: PropertySnapshot::at(target.alpha()),
        }
    }
}

/// 起止值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span<V> {
    pub from: V,
    pub to: V,
}

impl<V> Span<V> {
    pub fn new(from: V, to: V) -> Self {
        Self { from, to }
    }
}

/// 展开预设后的逐属性设置
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropertySet {
    pub position: PropertyAnimation<Vec2>,
    pub anchors: PropertyAnimation<Anchors>,
    pub size: PropertyAnimation<Vec2>,
    pub rotation: PropertyAnimation<Vec3>,
    pub alpha: PropertyAnimation<f32>,
}

impl PropertySet {
    /// 某个属性是否启用
    pub fn is_enabled(&self, kind: PropertyKind) -> bool {
        match kind {
            PropertyKind::Position => self.position.enabled,
            PropertyKind::Anchors => self.anchors.enabled,
            PropertyKind::Size => self.size.enabled,
            PropertyKind::Rotation => self.rotation.enabled,
            PropertyKind::Alpha => self.alpha.enabled,
        }
    }

    /// 已启用的属性（固定顺序）
    pub fn enabled(&self) -> Vec<PropertyKind> {
        PropertyKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

/// 布局动画配置
///
/// 声明式记录，所有字段都有默认值；缺省为"Normal 时长、Smooth 缓动、淡入、不移动"。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub movement: MovementPreset,
    pub movement_direction: PresetDirection,
    pub fade: FadePreset,

    pub duration: AnimationDuration,
    /// `duration == Custom` 时使用（秒）
    pub custom_duration: f32,
    pub ease: AnimationEase,
    /// `ease == Custom` 时使用
    pub custom_ease: EasingFunction,

    /// `movement == Custom` 时使用
    pub position: PropertyAnimation<Vec2>,
    pub anchors: PropertyAnimation<Anchors>,
    pub size: PropertyAnimation<Vec2>,
    pub rotation: PropertyAnimation<Vec3>,
    /// `fade == Custom` 时使用
    pub alpha: PropertyAnimation<f32>,

    /// 覆盖默认优先级
    pub priority: Option<i32>,
    /// 动画开始前覆盖父节点锚点
    pub parent_anchors: Option<Anchors>,
    /// 结束后把终值保存为静止值
    pub save_target: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            movement: MovementPreset::default(),
            movement_direction: PresetDirection::default(),
            fade: FadePreset::default(),
            duration: AnimationDuration::default(),
            custom_duration: 0.75,
            ease: AnimationEase::default(),
            custom_ease: EasingFunction::Linear,
            position: PropertyAnimation::default(),
            anchors: PropertyAnimation::default(),
            size: PropertyAnimation::default(),
            rotation: PropertyAnimation::default(),
            alpha: PropertyAnimation::default(),
            priority: None,
            parent_anchors: None,
            save_target: false,
        }
    }
}

impl AnimationConfig {
    /// 只做逐属性配置、不带预设的空配置
    pub fn custom() -> Self {
        Self {
            movement: MovementPreset::Custom,
            fade: FadePreset::Custom,
            ..Self::default()
        }
    }

    /// 解析后的时长（秒）
    pub fn duration_seconds(&self) -> f32 {
        self.duration.seconds(self.custom_duration)
    }

    /// 解析后的缓动函数
    pub fn easing(&self) -> EasingFunction {
        self.ease.resolve(self.custom_ease)
    }

    /// 时长为 0 时直接跳到终值
    pub fn is_instant(&self) -> bool {
        self.duration_seconds() <= 0.0
    }

    /// 生效的优先级
    pub fn priority(&self) -> i32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    /// 展开移动和淡入淡出预设
    pub fn properties(&self) -> PropertySet {
        let mut set = PropertySet::default();

        match self.movement {
            MovementPreset::NoMovement => {}
            MovementPreset::Custom => {
                set.position = self.position;
                set.anchors = self.anchors;
                set.size = self.size;
                set.rotation = self.rotation;
            }
            slide => {
                if let Some(offset) = slide.slide_offset() {
                    set.anchors = PropertyAnimation::new(
                        self.movement_direction.into(),
                        Anchors::point(offset),
                    );
                }
            }
        }

        set.alpha = match self.fade {
            FadePreset::NoFade => PropertyAnimation::default(),
            FadePreset::FadeIn => PropertyAnimation::new(AnimationDirection::From, -1.0),
            FadePreset::FadeOut => PropertyAnimation::new(AnimationDirection::To, -1.0),
            FadePreset::Custom => self.alpha,
        };

        set
    }

    /// 根据当前布局计算具体的动画指令
    ///
    /// 每次动画开始时调用；结果只依赖配置和快照。
    pub fn resolve(&self, snapshot: &LayoutSnapshot) -> ResolvedAnimation {
        let set = self.properties();
        ResolvedAnimation {
            duration: self.duration_seconds(),
            easing: self.easing(),
            instant: self.is_instant(),
            save_target: self.save_target,
            priority: self.priority(),
            parent_anchors: self.parent_anchors,
            position: set.position.span(snapshot.position),
            anchors: set.anchors.span(snapshot.anchors),
            size: set.size.span(snapshot.size),
            rotation: set.rotation.span(snapshot.rotation),
            alpha: set.alpha.span(snapshot.alpha),
        }
    }
}

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAnimation {
    pub duration: f32,
    pub easing: EasingFunction,
    pub instant: bool,
    pub save_target: bool,
    pub priority: i32,
    pub parent_anchors: Option<Anchors>,
    pub position: Option<Span<Vec2>>,
    pub anchors: Option<Span<Anchors>>,
    pub size: Option<Span<Vec2>>,
    pub rotation: Option<Span<Vec3>>,
    pub alpha: Option<Span<f32>>,
}

impl ResolvedAnimation {
    /// 启用的属性数量
    pub fn enabled_count(&self) -> usize {
        [
            self.position.is_some(),
            self.anchors.is_some(),
            self.size.is_some(),
            self.rotation.is_some(),
            self.alpha.is_some(),
        ]
        .into_iter()
        .filter(|enabled| *enabled)
        .count()
    }

    /// 把起止值转换为补间参数
    pub fn tween<V: Tweenable>(&self, span: Span<V>) -> Tween<V> {
        let duration = if self.instant { 0.0 } else { self.duration };
        Tween::new(span.from, span.to, duration)
            .with_easing(self.easing)
            .with_save_target(self.save_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> LayoutSnapshot {
        LayoutSnapshot {
            position: PropertySnapshot::at(Vec2::new(10.0, 20.0)),
            anchors: PropertySnapshot::at(Anchors::new(Vec2::zero(), Vec2::one())),
            size: PropertySnapshot::at(Vec2::new(200.0, 100.0)),
            rotation: PropertySnapshot::at(Vec3::zero()),
            alpha: PropertySnapshot::at(1.0),
        }
    }

    #[test]
    fn test_default_config_is_fade_in() {
        let config = AnimationConfig::default();
        let resolved = config.resolve(&snapshot());

        assert_eq!(resolved.duration, 0.5);
        assert_eq!(resolved.easing, EasingFunction::EaseInOut);
        assert_eq!(resolved.priority, DEFAULT_PRIORITY);
        assert_eq!(resolved.enabled_count(), 1);
        assert_eq!(resolved.alpha, Some(Span::new(0.0, 1.0)));
        assert!(resolved.position.is_none());
    }

    #[test]
    fn test_direction_semantics() {
        let live = PropertySnapshot::at(5.0_f32);

        let relative = PropertyAnimation::new(AnimationDirection::RelativeTo, 2.0);
        assert_eq!(relative.span(live), Some(Span::new(5.0, 7.0)));

        let from = PropertyAnimation::new(AnimationDirection::From, 2.0);
        assert_eq!(from.span(live), Some(Span::new(7.0, 5.0)));

        let to = PropertyAnimation::new(AnimationDirection::To, 2.0);
        assert_eq!(to.span(live), Some(Span::new(5.0, 7.0)));

        assert_eq!(PropertyAnimation::<f32>::default().span(live), None);
    }

    #[test]
    fn test_from_and_to_use_base_value() {
        let interrupted = PropertySnapshot {
            live: 0.4_f32,
            base: 1.0,
        };
        let fade_in = PropertyAnimation::new(AnimationDirection::From, -1.0);
        assert_eq!(fade_in.span(interrupted), Some(Span::new(0.0, 1.0)));

        let fade_out = PropertyAnimation::new(AnimationDirection::To, -1.0);
        assert_eq!(fade_out.span(interrupted), Some(Span::new(0.4, 0.0)));
    }

    #[test]
    fn test_slide_preset_moves_anchors() {
        let config = AnimationConfig {
            movement: MovementPreset::SlideLeft,
            movement_direction: PresetDirection::To,
            fade: FadePreset::NoFade,
            ..AnimationConfig::default()
        };
        let resolved = config.resolve(&snapshot());
        let anchors = resolved.anchors.unwrap();

        assert_eq!(anchors.from, Anchors::new(Vec2::zero(), Vec2::one()));
        assert_eq!(
            anchors.to,
            Anchors::new(Vec2::new(-1.0, 0.0), Vec2::new(0.0, 1.0))
        );
        assert_eq!(resolved.enabled_count(), 1);
    }

    #[test]
    fn test_custom_fields_ignored_without_custom_preset() {
        let mut config = AnimationConfig::default();
        config.position = PropertyAnimation::new(AnimationDirection::RelativeTo, Vec2::one());
        assert!(config.resolve(&snapshot()).position.is_none());

        config.movement = MovementPreset::Custom;
        let position = config.resolve(&snapshot()).position.unwrap();
        assert_eq!(position.to, Vec2::new(11.0, 21.0));
    }

    #[test]
    fn test_instant_and_custom_duration() {
        let config = AnimationConfig {
            duration: AnimationDuration::Instant,
            ..AnimationConfig::default()
        };
        let resolved = config.resolve(&snapshot());
        assert!(resolved.instant);
        assert_eq!(resolved.tween(resolved.alpha.unwrap()).duration, 0.0);

        let config = AnimationConfig {
            duration: AnimationDuration::Custom,
            custom_duration: 1.25,
            ..AnimationConfig::default()
        };
        assert_eq!(config.duration_seconds(), 1.25);
        assert!(!config.is_instant());
    }

    #[test]
    fn test_enabled_properties_order() {
        let config = AnimationConfig {
            movement: MovementPreset::Custom,
            size: PropertyAnimation::new(AnimationDirection::To, Vec2::one()),
            position: PropertyAnimation::new(AnimationDirection::To, Vec2::one()),
            ..AnimationConfig::default()
        };
        assert_eq!(
            config.properties().enabled(),
            vec![PropertyKind::Position, PropertyKind::Size, PropertyKind::Alpha]
        );
    }

    #[test]
    fn test_partial_json_uses_per_type_defaults() {
        let json = r#"{
            "movement": "Custom",
            "fade": "Custom",
            "duration": "Fast",
            "alpha": { "enabled": true, "delta": -0.5 },
            "position": { "enabled": true, "delta": { "x": 30.0 } }
        }"#;
        let config: AnimationConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.alpha.direction, AnimationDirection::From);
        assert_eq!(config.position.direction, AnimationDirection::RelativeTo);
        assert_eq!(config.position.delta, Vec2::new(30.0, 0.0));
        assert_eq!(config.custom_duration, 0.75);
        assert_eq!(config.duration_seconds(), 0.35);
    }
}
