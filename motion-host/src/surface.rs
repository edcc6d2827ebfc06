//! 记录型效果表面。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;
use ui_motion::{EffectMode, EffectStyle, EffectSurface, OwnerId, SurfaceFactory};

/// 只记录写入的表面
#[derive(Debug)]
pub struct RecordingSurface {
    mode: EffectMode,
    owner: Cell<Option<OwnerId>>,
    style: RefCell<Option<EffectStyle>>,
    enabled: Cell<bool>,
    channel: Cell<f32>,
    /// 通道出现过的最大值
    peak: Cell<f32>,
}

impl RecordingSurface {
    pub fn new(mode: EffectMode) -> Self {
        Self {
            mode,
            owner: Cell::new(None),
            style: RefCell::new(None),
            enabled: Cell::new(false),
            channel: Cell::new(0.0),
            peak: Cell::new(0.0),
        }
    }

    pub fn mode(&self) -> EffectMode {
        self.mode
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner.get()
    }

    pub fn style(&self) -> Option<EffectStyle> {
        self.style.borrow().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn channel(&self) -> f32 {
        self.channel.get()
    }

    pub fn peak(&self) -> f32 {
        self.peak.get()
    }
}

impl EffectSurface for RecordingSurface {
    fn configure(&self, style: &EffectStyle) {
        *self.style.borrow_mut() = Some(style.clone());
    }

    fn attach(&self, owner: OwnerId) {
        self.owner.set(Some(owner));
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn set_channel(&self, value: f32) {
        trace!(mode = ?self.mode, value, "效果通道");
        self.channel.set(value);
        self.peak.set(self.peak.get().max(value));
    }
}

/// 为单个效果创建表面，并保留创建出的表面供报告读取
#[derive(Debug, Default)]
pub struct RecordingFactory {
    created: RefCell<Vec<Rc<RecordingSurface>>>,
}

impl RecordingFactory {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// 最近创建的表面
    pub fn last(&self) -> Option<Rc<RecordingSurface>> {
        self.created.borrow().last().cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create_surface(&self, mode: EffectMode) -> Rc<dyn EffectSurface> {
        let surface = Rc::new(RecordingSurface::new(mode));
        self.created.borrow_mut().push(surface.clone());
        surface
    }
}
