//! # Target 模块
//!
//! 补间目标的接口定义。
//!
//! ## 核心概念
//!
//! - `LayoutTarget`: 宿主侧可被布局动画修改的对象（位置、锚点、尺寸、旋转、透明度）
//! - `PropertyAccessor`: 单个属性的 getter/setter，补间器只通过它读写目标
//! - `TargetProperty`: 把 `LayoutTarget` 的某一个属性包装成 `PropertyAccessor`

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::value::{Anchors, Tweenable, Vec2, Vec3};

/// 可动画属性种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Position,
    Anchors,
    Size,
    Rotation,
    Alpha,
}

impl PropertyKind {
    /// 全部属性（Animator 的固定顺序）
    pub const ALL: [PropertyKind; 5] = [
        PropertyKind::Position,
        PropertyKind::Anchors,
        PropertyKind::Size,
        PropertyKind::Rotation,
        PropertyKind::Alpha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::Position => "position",
            PropertyKind::Anchors => "anchors",
            PropertyKind::Size => "size",
            PropertyKind::Rotation => "rotation",
            PropertyKind::Alpha => "alpha",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 布局目标
///
/// 由宿主实现。所有 setter 都是 `&self`：实现方使用内部可变性，
/// 这样多个补间器可以同时持有同一个目标。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Panel {
///     data: Rc<RefCell<PanelData>>,
/// }
///
/// impl LayoutTarget for Panel {
///     fn position(&self) -> Vec2 {
///         self.data.borrow().position
///     }
///
///     fn set_position(&self, value: Vec2) {
///         self.data.borrow_mut().position = value;
///     }
///     // ...
/// }
/// ```
pub trait LayoutTarget {
    fn position(&self) -> Vec2;
    fn set_position(&self, value: Vec2);

    fn anchors(&self) -> Anchors;
    fn set_anchors(&self, value: Anchors);

    fn size(&self) -> Vec2;
    fn set_size(&self, value: Vec2);

    fn rotation(&self) -> Vec3;
    fn set_rotation(&self, value: Vec3);

    fn alpha(&self) -> f32;
    fn set_alpha(&self, value: f32);

    /// 覆盖父节点锚点（动画开始前调用），默认忽略
    fn set_parent_anchors(&self, _anchors: Anchors) {}

    /// 目标当前是否处于可见的活动层级中
    ///
    /// 不活动的目标不会启动逐帧补间，而是直接写入终值。
    fn is_live(&self) -> bool {
        true
    }
}

/// 属性访问器接口
///
/// 提供对单个属性的 getter/setter 访问。
pub trait PropertyAccessor<V> {
    /// 获取当前值
    fn get(&self) -> V;

    /// 设置新值
    fn set(&self, value: V);

    /// 目标是否处于活动状态
    fn is_live(&self) -> bool {
        true
    }
}

/// 简单的属性访问器实现
///
/// 使用 `Rc<Cell<V>>` 包装单个值，主要用于测试和独立补间。
#[derive(Debug, Clone)]
pub struct SimplePropertyAccessor<V: Tweenable> {
    value: Rc<Cell<V>>,
}

impl<V: Tweenable> SimplePropertyAccessor<V> {
    /// 创建新的属性访问器
    pub fn new(initial_value: V) -> Self {
        Self {
            value: Rc::new(Cell::new(initial_value)),
        }
    }

    /// 获取值的引用（用于共享）
    pub fn value_ref(&self) -> Rc<Cell<V>> {
        self.value.clone()
    }
}

impl<V: Tweenable> PropertyAccessor<V> for SimplePropertyAccessor<V> {
    fn get(&self) -> V {
        self.value.get()
    }

    fn set(&self, value: V) {
        self.value.set(value);
    }
}

/// `LayoutTarget` 的单个属性
pub struct TargetProperty<V> {
    target: Rc<dyn LayoutTarget>,
    kind: PropertyKind,
    getter: fn(&dyn LayoutTarget) -> V,
    setter: fn(&dyn LayoutTarget, V),
}

impl<V> fmt::Debug for TargetProperty<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetProperty")
            .field("kind", &self.kind)
            .finish()
    }
}

impl<V> TargetProperty<V> {
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }
}

impl TargetProperty<Vec2> {
    pub fn position(target: Rc<dyn LayoutTarget>) -> Self {
        Self {
            target,
            kind: PropertyKind::Position,
            getter: |t| t.position(),
            setter: |t, v| t.set_position(v),
        }
    }

    pub fn size(target: Rc<dyn LayoutTarget>) -> Self {
        Self {
            target,
            kind: PropertyKind::Size,
            getter: |t| t.size(),
            setter: |t, v| t.set_size(v),
        }
    }
}

impl TargetProperty<Anchors> {
    pub fn anchors(target: Rc<dyn LayoutTarget>) -> Self {
        Self {
            target,
            kind: PropertyKind::Anchors,
            getter: |t| t.anchors(),
            setter: |t, v| t.set_anchors(v),
        }
    }
}

impl TargetProperty<Vec3> {
    pub fn rotation(target: Rc<dyn LayoutTarget>) -> Self {
        Self {
            target,
            kind: PropertyKind::Rotation,
            getter: |t| t.rotation(),
            setter: |t, v| t.set_rotation(v),
        }
    }
}

impl TargetProperty<f32> {
    pub fn alpha(target: Rc<dyn LayoutTarget>) -> Self {
        Self {
            target,
            kind: PropertyKind::Alpha,
            getter: |t| t.alpha(),
            setter: |t, v| t.set_alpha(v),
        }
    }
}

impl<V> PropertyAccessor<V> for TargetProperty<V> {
    fn get(&self) -> V {
        (self.getter)(self.target.as_ref())
    }

    fn set(&self, value: V) {
        (self.setter)(self.target.as_ref(), value);
    }

    fn is_live(&self) -> bool {
        self.target.is_live()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Default, Clone)]
    pub(crate) struct TestTargetData {
        pub position: Vec2,
        pub anchors: Anchors,
        pub size: Vec2,
        pub rotation: Vec3,
        pub alpha: f32,
        pub parent_anchors: Option<Anchors>,
        pub live: bool,
        pub writes: usize,
    }

    /// 测试用布局目标，记录写入次数
    #[derive(Debug, Default)]
    pub(crate) struct TestTarget {
        pub data: RefCell<TestTargetData>,
    }

    impl TestTarget {
        pub fn new() -> Rc<Self> {
            Rc::new(Self {
                data: RefCell::new(TestTargetData {
                    size: Vec2::new(200.0, 100.0),
                    alpha: 1.0,
                    live: true,
                    ..TestTargetData::default()
                }),
            })
        }

        pub fn writes(&self) -> usize {
            self.data.borrow().writes
        }
    }

    impl LayoutTarget for TestTarget {
        fn position(&self) -> Vec2 {
            self.data.borrow().position
        }
        fn set_position(&self, value: Vec2) {
            let mut data = self.data.borrow_mut();
            data.position = value;
            data.writes += 1;
        }
        fn anchors(&self) -> Anchors {
            self.data.borrow().anchors
        }
        fn set_anchors(&self, value: Anchors) {
            let mut data = self.data.borrow_mut();
            data.anchors = value;
            data.writes += 1;
        }
        fn size(&self) -> Vec2 {
            self.data.borrow().size
        }
        fn set_size(&self, value: Vec2) {
            let mut data = self.data.borrow_mut();
            data.size = value;
            data.writes += 1;
        }
        fn rotation(&self) -> Vec3 {
            self.data.borrow().rotation
        }
        fn set_rotation(&self, value: Vec3) {
            let mut data = self.data.borrow_mut();
            data.rotation = value;
            data.writes += 1;
        }
        fn alpha(&self) -> f32 {
            self.data.borrow().alpha
        }
        fn set_alpha(&self, value: f32) {
            let mut data = self.data.borrow_mut();
            data.alpha = value;
            data.writes += 1;
        }
        fn set_parent_anchors(&self, anchors: Anchors) {
            self.data.borrow_mut().parent_anchors = Some(anchors);
        }
        fn is_live(&self) -> bool {
            self.data.borrow().live
        }
    }

    #[test]
    fn test_simple_property_accessor() {
        let accessor = SimplePropertyAccessor::new(0.5_f32);

        assert_eq!(accessor.get(), 0.5);

        accessor.set(0.8);
        assert_eq!(accessor.get(), 0.8);

        // 测试共享引用
        let shared = accessor.value_ref();
        accessor.set(1.0);
        assert_eq!(shared.get(), 1.0);
    }

    #[test]
    fn test_target_property_reads_and_writes_through() {
        let target = TestTarget::new();
        let size = TargetProperty::size(target.clone());
        let alpha = TargetProperty::alpha(target.clone());

        assert_eq!(size.get(), Vec2::new(200.0, 100.0));
        size.set(Vec2::new(10.0, 10.0));
        alpha.set(0.25);

        assert_eq!(target.size(), Vec2::new(10.0, 10.0));
        assert_eq!(target.alpha(), 0.25);
        assert_eq!(size.kind(), PropertyKind::Size);
        assert_eq!(target.writes(), 2);
    }

    #[test]
    fn test_target_property_liveness() {
        let target = TestTarget::new();
        let position = TargetProperty::position(target.clone());
        assert!(position.is_live());
        target.data.borrow_mut().live = false;
        assert!(!position.is_live());
    }

    #[test]
    fn test_property_kind_display() {
        assert_eq!(PropertyKind::Anchors.to_string(), "anchors");
        assert_eq!(PropertyKind::ALL.len(), 5);
    }
}
