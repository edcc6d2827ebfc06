//! # Animator 模块
//!
//! 一个布局目标的动画入口：每个属性一个补间器，统一接收 [`AnimationConfig`]。
//!
//! ## 同步回调
//!
//! 一次 `animate` 可能同时启动多个属性的补间。调用方的回调通过
//! [`CompletionLatch`] 只触发一次：第一个属性完成时触发，之后的完成被忽略。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::{AnimationConfig, LayoutSnapshot, PropertySnapshot, ResolvedAnimation, Span};
use crate::target::{LayoutTarget, PropertyKind, TargetProperty};
use crate::task::{OwnerId, Scheduler};
use crate::tween::Tweener;
use crate::value::{Anchors, Tweenable, Vec2, Vec3};

/// 完成闩
///
/// 多个补间共享同一个闩，第一个到达时触发回调，回调只会执行一次。
pub struct CompletionLatch {
    expected: usize,
    arrived: Cell<usize>,
    callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl fmt::Debug for CompletionLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionLatch")
            .field("expected", &self.expected)
            .field("arrived", &self.arrived.get())
            .field("fired", &self.has_fired())
            .finish()
    }
}

impl CompletionLatch {
    pub fn new(expected: usize, callback: impl FnOnce() + 'static) -> Rc<Self> {
        Rc::new(Self {
            expected,
            arrived: Cell::new(0),
            callback: RefCell::new(Some(Box::new(callback))),
        })
    }

    /// 一个参与者完成
    pub fn arrive(&self) {
        self.arrived.set(self.arrived.get() + 1);
        self.fire();
    }

    /// 不等参与者，直接触发（没有启用任何属性时）
    pub fn fire(&self) {
        let callback = self.callback.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn has_fired(&self) -> bool {
        self.callback.borrow().is_none()
    }

    /// 已完成的参与者数量
    pub fn arrived(&self) -> usize {
        self.arrived.get()
    }

    pub fn expected(&self) -> usize {
        self.expected
    }
}

/// 布局动画器
pub struct Animator {
    target: Rc<dyn LayoutTarget>,
    position: Tweener<Vec2>,
    anchors: Tweener<Anchors>,
    size: Tweener<Vec2>,
    rotation: Tweener<Vec3>,
    alpha: Tweener<f32>,
    /// 正在进行的动画的优先级
    priority: i32,
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("position", &self.position)
            .field("anchors", &self.anchors)
            .field("size", &self.size)
            .field("rotation", &self.rotation)
            .field("alpha", &self.alpha)
            .field("priority", &self.priority)
            .finish()
    }
}

impl Animator {
    /// 为目标创建动画器，补间任务归属于 `owner`
    pub fn new(target: Rc<dyn LayoutTarget>, scheduler: Scheduler, owner: OwnerId) -> Self {
        let label = |kind: PropertyKind| format!("{}:{}", owner, kind);
        Self {
            position: Tweener::new(
                Rc::new(TargetProperty::position(target.clone())),
                scheduler.clone(),
                owner,
                label(PropertyKind::Position),
            ),
            anchors: Tweener::new(
                Rc::new(TargetProperty::anchors(target.clone())),
                scheduler.clone(),
                owner,
                label(PropertyKind::Anchors),
            ),
            size: Tweener::new(
                Rc::new(TargetProperty::size(target.clone())),
                scheduler.clone(),
                owner,
                label(PropertyKind::Size),
            ),
            rotation: Tweener::new(
                Rc::new(TargetProperty::rotation(target.clone())),
                scheduler.clone(),
                owner,
                label(PropertyKind::Rotation),
            ),
            alpha: Tweener::new(
                Rc::new(TargetProperty::alpha(target.clone())),
                scheduler,
                owner,
                label(PropertyKind::Alpha),
            ),
            target,
            priority: i32::MIN,
        }
    }

    /// 当前布局快照（基准值取各补间器的静止值）
    pub fn snapshot(&self) -> LayoutSnapshot {
        fn of<V: Tweenable>(tweener: &Tweener<V>) -> PropertySnapshot<V> {
            PropertySnapshot {
                live: tweener.current(),
                base: tweener.base_value(),
            }
        }

        LayoutSnapshot {
            position: of(&self.position),
            anchors: of(&self.anchors),
            size: of(&self.size),
            rotation: of(&self.rotation),
            alpha: of(&self.alpha),
        }
    }

    /// 按配置开始动画
    ///
    /// `callback` 在第一个属性完成时触发一次；没有启用任何属性时立即触发。
    /// 如果正在进行的动画优先级更高，本次请求被忽略，回调不会触发，返回 `false`。
    pub fn animate(&mut self, config: &AnimationConfig, callback: impl FnOnce() + 'static) -> bool {
        let resolved = config.resolve(&self.snapshot());

        if self.is_animating() && self.priority > resolved.priority {
            debug!(
                current = self.priority,
                requested = resolved.priority,
                "优先级较低，忽略动画请求"
            );
            return false;
        }
        self.priority = resolved.priority;

        if let Some(anchors) = resolved.parent_anchors {
            self.target.set_parent_anchors(anchors);
        }

        let latch = CompletionLatch::new(resolved.enabled_count(), callback);
        if latch.expected() == 0 {
            latch.fire();
            return true;
        }

        debug!(
            properties = latch.expected(),
            duration = resolved.duration,
            instant = resolved.instant,
            "开始布局动画"
        );
        drive(&mut self.position, resolved.position, &resolved, &latch);
        drive(&mut self.anchors, resolved.anchors, &resolved, &latch);
        drive(&mut self.rotation, resolved.rotation, &resolved, &latch);
        drive(&mut self.size, resolved.size, &resolved, &latch);
        drive(&mut self.alpha, resolved.alpha, &resolved, &latch);
        true
    }

    /// 停止配置中启用的属性
    pub fn stop(&mut self, config: &AnimationConfig, reset: bool) {
        let set = config.properties();
        for kind in set.enabled() {
            self.stop_property(kind, reset);
        }
    }

    /// 停止所有属性
    pub fn stop_all(&mut self, reset: bool) {
        for kind in PropertyKind::ALL {
            self.stop_property(kind, reset);
        }
    }

    fn stop_property(&mut self, kind: PropertyKind, reset: bool) {
        match kind {
            PropertyKind::Position => self.position.stop_tween(reset),
            PropertyKind::Anchors => self.anchors.stop_tween(reset),
            PropertyKind::Size => self.size.stop_tween(reset),
            PropertyKind::Rotation => self.rotation.stop_tween(reset),
            PropertyKind::Alpha => self.alpha.stop_tween(reset),
        }
    }

    /// 是否有属性正在补间
    pub fn is_animating(&self) -> bool {
        self.position.is_animating()
            || self.anchors.is_animating()
            || self.size.is_animating()
            || self.rotation.is_animating()
            || self.alpha.is_animating()
    }

    pub fn target(&self) -> &Rc<dyn LayoutTarget> {
        &self.target
    }

    pub fn position(&self) -> &Tweener<Vec2> {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut Tweener<Vec2> {
        &mut self.position
    }

    pub fn anchors(&self) -> &Tweener<Anchors> {
        &self.anchors
    }

    pub fn anchors_mut(&mut self) -> &mut Tweener<Anchors> {
        &mut self.anchors
    }

    pub fn size(&self) -> &Tweener<Vec2> {
        &self.size
    }

    pub fn size_mut(&mut self) -> &mut Tweener<Vec2> {
        &mut self.size
    }

    pub fn rotation(&self) -> &Tweener<Vec3> {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut Tweener<Vec3> {
        &mut self.rotation
    }

    pub fn alpha(&self) -> &Tweener<f32> {
        &self.alpha
    }

    pub fn alpha_mut(&mut self) -> &mut Tweener<f32> {
        &mut self.alpha
    }
}

fn drive<V: Tweenable>(
    tweener: &mut Tweener<V>,
    span: Option<Span<V>>,
    resolved: &ResolvedAnimation,
    latch: &Rc<CompletionLatch>,
) {
    let Some(span) = span else {
        return;
    };
    let latch = latch.clone();
    tweener.start(resolved.tween(span), move || latch.arrive());
}
