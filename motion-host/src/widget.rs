//! # Widget 模块
//!
//! 无界面的组件：同时实现 [`LayoutTarget`] 与 [`Component`]，
//! 只记录布局数值和写入次数。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use ui_motion::{Anchors, Component, LayoutTarget, OwnerId, UiState, Vec2, Vec3};

/// 组件布局
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetLayout {
    pub position: Vec2,
    pub anchors: Anchors,
    pub size: Vec2,
    pub rotation: Vec3,
    pub alpha: f32,
}

impl Default for WidgetLayout {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            anchors: Anchors::default(),
            size: Vec2::new(100.0, 100.0),
            rotation: Vec3::zero(),
            alpha: 1.0,
        }
    }
}

/// 无界面组件
#[derive(Debug)]
pub struct Widget {
    name: String,
    owner: OwnerId,
    layout: RefCell<WidgetLayout>,
    parent_anchors: Cell<Option<Anchors>>,
    state: Cell<UiState>,
    visible: Cell<bool>,
    live: Cell<bool>,
    writes: Cell<usize>,
}

impl Widget {
    pub fn new(name: impl Into<String>, owner: OwnerId, layout: WidgetLayout) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            owner,
            layout: RefCell::new(layout),
            parent_anchors: Cell::new(None),
            state: Cell::new(UiState::empty()),
            visible: Cell::new(true),
            live: Cell::new(true),
            writes: Cell::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> WidgetLayout {
        *self.layout.borrow()
    }

    pub fn parent_anchors(&self) -> Option<Anchors> {
        self.parent_anchors.get()
    }

    pub fn set_state(&self, state: UiState) {
        self.state.set(state);
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub fn set_live(&self, live: bool) {
        self.live.set(live);
    }

    /// 属性写入总次数
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn write(&self, apply: impl FnOnce(&mut WidgetLayout)) {
        apply(&mut self.layout.borrow_mut());
        self.writes.set(self.writes.get() + 1);
    }
}

impl LayoutTarget for Widget {
    fn position(&self) -> Vec2 {
        self.layout.borrow().position
    }

    fn set_position(&self, value: Vec2) {
        self.write(|layout| layout.position = value);
    }

    fn anchors(&self) -> Anchors {
        self.layout.borrow().anchors
    }

    fn set_anchors(&self, value: Anchors) {
        self.write(|layout| layout.anchors = value);
    }

    fn size(&self) -> Vec2 {
        self.layout.borrow().size
    }

    fn set_size(&self, value: Vec2) {
        self.write(|layout| layout.size = value);
    }

    fn rotation(&self) -> Vec3 {
        self.layout.borrow().rotation
    }

    fn set_rotation(&self, value: Vec3) {
        self.write(|layout| layout.rotation = value);
    }

    fn alpha(&self) -> f32 {
        self.layout.borrow().alpha
    }

    fn set_alpha(&self, value: f32) {
        self.write(|layout| layout.alpha = value);
    }

    fn set_parent_anchors(&self, anchors: Anchors) {
        self.parent_anchors.set(Some(anchors));
    }

    fn is_live(&self) -> bool {
        self.live.get()
    }
}

impl Component for Widget {
    fn owner(&self) -> OwnerId {
        self.owner
    }

    fn state(&self) -> UiState {
        self.state.get()
    }

    fn should_render(&self) -> bool {
        self.visible.get()
    }

    fn is_live(&self) -> bool {
        self.live.get()
    }
}
