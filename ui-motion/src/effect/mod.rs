//! # Effect 模块
//!
//! 由组件状态触发的临时视觉效果（遮罩、模糊、阴影）。
//!
//! ## 状态机
//!
//! ```text
//! Inactive ──start──► Activating ──淡入完成──► Active
//!     ▲                   │ stop                 │ stop
//!     │                   ▼                      ▼
//!     └────淡出完成──── Deactivating ◄────────────┘
//! ```
//!
//! - `active` 标志在 `start`/`stop` 中同步翻转，不等待淡入淡出
//! - 同一时刻最多只有一个激活或撤销任务：新的一方先取消旧的一方
//! - 淡入淡出从当前可见度继续，被打断时不会跳变
//! - 表面只在淡出自然完成后才被禁用

mod surface;

pub use surface::{EffectSurface, SurfaceFactory};

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::component::Component;
use crate::config::{EffectConfig, EffectMode};
use crate::easing::{EasingFunction, ease};
use crate::state;
use crate::task::{Scheduler, Task, timed_from};

/// 效果所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EffectPhase {
    #[default]
    Inactive,
    Activating,
    Active,
    Deactivating,
}

/// 淡入淡出共享状态（任务体与完成回调共用）
#[derive(Debug, Default)]
struct FadeState {
    active: Cell<bool>,
    visibility: Cell<f32>,
    phase: Cell<EffectPhase>,
}

/// 当前挂在组件上的表面及其通道峰值
#[derive(Clone)]
struct Attached {
    surface: Rc<dyn EffectSurface>,
    peak: f32,
}

/// 视觉效果
pub struct Effect {
    config: EffectConfig,
    scheduler: Scheduler,
    factory: Rc<dyn SurfaceFactory>,
    surfaces: HashMap<EffectMode, Rc<dyn EffectSurface>>,
    /// 最近一次 `start` 挂上的表面；撤销时总是作用于它，而不是按当前模式查找
    attached: Option<Attached>,
    fade: Rc<FadeState>,
    activate_task: Option<Task>,
    deactivate_task: Option<Task>,
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("mode", &self.config.mode)
            .field("trigger", &self.config.trigger)
            .field("phase", &self.fade.phase.get())
            .field("visibility", &self.fade.visibility.get())
            .field("surfaces", &self.surfaces.len())
            .finish()
    }
}

impl Effect {
    pub fn new(config: EffectConfig, scheduler: Scheduler, factory: Rc<dyn SurfaceFactory>) -> Self {
        Self {
            config,
            scheduler,
            factory,
            surfaces: HashMap::new(),
            attached: None,
            fade: Rc::new(FadeState::default()),
            activate_task: None,
            deactivate_task: None,
        }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// 替换配置（下一次激活时生效）
    ///
    /// 正在显示的表面不受影响，之后的 `stop` 仍然淡出并禁用它。
    pub fn set_config(&mut self, config: EffectConfig) {
        self.config = config;
    }

    /// 按组件当前状态判断是否应该激活
    pub fn should_be_active(&self, component: &dyn Component) -> bool {
        state::should_be_active(
            self.config.trigger,
            component.state(),
            component.should_render(),
        )
    }

    /// 按触发条件同步激活状态，返回求值结果
    pub fn sync(&mut self, component: &dyn Component) -> bool {
        let should = self.should_be_active(component);
        if should {
            self.start(component);
        } else {
            self.stop(component);
        }
        should
    }

    /// 激活效果
    pub fn start(&mut self, component: &dyn Component) {
        if self.fade.active.get() {
            trace!(mode = ?self.config.mode, "效果已激活，忽略");
            return;
        }
        if let Some(task) = self.deactivate_task.take() {
            task.stop();
        }
        self.fade.active.set(true);

        if !component.is_live() {
            // 逻辑状态照常更新，不做视觉过渡
            self.fade.phase.set(EffectPhase::Active);
            return;
        }

        let style = self.config.style();
        let peak = style.peak();
        let surface = self.surface_for(self.config.mode);
        if let Some(previous) = self.attached.take()
            && !Rc::ptr_eq(&previous.surface, &surface)
        {
            // 模式切换后旧表面可能还停在淡出中途
            previous.surface.set_channel(0.0);
            previous.surface.set_enabled(false);
        }
        self.attached = Some(Attached {
            surface: surface.clone(),
            peak,
        });
        surface.configure(&style);
        surface.attach(component.owner());
        surface.set_enabled(true);

        let from = self.fade.visibility.get();
        surface.set_channel(channel(peak, from));
        self.fade.phase.set(EffectPhase::Activating);

        let body = {
            let fade = self.fade.clone();
            let surface = surface.clone();
            timed_from(from, self.config.fade_in_seconds(), move |p| {
                fade.visibility.set(p);
                surface.set_channel(channel(peak, p));
            })
        };
        let task = self
            .scheduler
            .create_named(body, component.owner(), "effect-in");
        {
            let fade = self.fade.clone();
            task.on_finished(move |cancelled| {
                if !cancelled {
                    fade.phase.set(EffectPhase::Active);
                }
            });
        }

        if self.scheduler.start(&task).is_err() {
            self.fade.visibility.set(1.0);
            surface.set_channel(peak);
            self.fade.phase.set(EffectPhase::Active);
            return;
        }
        debug!(mode = ?self.config.mode, owner = %component.owner(), "效果淡入");
        self.activate_task = Some(task);
    }

    /// 撤销效果
    pub fn stop(&mut self, component: &dyn Component) {
        if !self.fade.active.get() {
            trace!(mode = ?self.config.mode, "效果未激活，忽略");
            return;
        }
        if let Some(task) = self.activate_task.take() {
            task.stop();
        }
        self.fade.active.set(false);

        let Some(Attached { surface, peak }) = self.attached.clone() else {
            self.settle_inactive(None);
            return;
        };
        if !component.is_live() {
            self.settle_inactive(Some(&surface));
            return;
        }

        surface.attach(component.owner());
        self.fade.phase.set(EffectPhase::Deactivating);

        let body = {
            let fade = self.fade.clone();
            let surface = surface.clone();
            timed_from(
                1.0 - self.fade.visibility.get(),
                self.config.fade_out_seconds(),
                move |p| {
                    let visibility = 1.0 - p;
                    fade.visibility.set(visibility);
                    surface.set_channel(channel(peak, visibility));
                },
            )
        };
        let task = self
            .scheduler
            .create_named(body, component.owner(), "effect-out");
        {
            let fade = self.fade.clone();
            let surface = surface.clone();
            task.on_finished(move |cancelled| {
                if !cancelled {
                    surface.set_enabled(false);
                    fade.phase.set(EffectPhase::Inactive);
                }
            });
        }

        if self.scheduler.start(&task).is_err() {
            self.settle_inactive(Some(&surface));
            return;
        }
        debug!(mode = ?self.config.mode, owner = %component.owner(), "效果淡出");
        self.deactivate_task = Some(task);
    }

    fn settle_inactive(&mut self, surface: Option<&Rc<dyn EffectSurface>>) {
        if let Some(surface) = surface {
            surface.set_channel(0.0);
            surface.set_enabled(false);
        }
        self.fade.visibility.set(0.0);
        self.fade.phase.set(EffectPhase::Inactive);
    }

    /// 取出或创建表面（首次创建后一直复用）
    fn surface_for(&mut self, mode: EffectMode) -> Rc<dyn EffectSurface> {
        self.surfaces
            .entry(mode)
            .or_insert_with(|| {
                debug!(mode = ?mode, "创建效果表面");
                let surface = self.factory.create_surface(mode);
                surface.set_enabled(false);
                surface
            })
            .clone()
    }

    // ========== 查询方法 ==========

    /// 逻辑激活状态（同步翻转）
    pub fn is_active(&self) -> bool {
        self.fade.active.get()
    }

    pub fn phase(&self) -> EffectPhase {
        self.fade.phase.get()
    }

    /// 当前可见度（0.0 - 1.0）
    pub fn visibility(&self) -> f32 {
        self.fade.visibility.get()
    }

    /// 最近挂上的表面；从未激活过时取当前模式的表面（都没有时为 `None`）
    pub fn surface(&self) -> Option<&Rc<dyn EffectSurface>> {
        self.attached
            .as_ref()
            .map(|attached| &attached.surface)
            .or_else(|| self.surfaces.get(&self.config.mode))
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        for task in [self.activate_task.take(), self.deactivate_task.take()]
            .into_iter()
            .flatten()
        {
            task.stop();
        }
    }
}

fn channel(peak: f32, visibility: f32) -> f32 {
    ease(0.0, peak, visibility, EasingFunction::Linear)
}
