//! # Runner 模块
//!
//! 固定帧率回放场景：每帧先执行该帧的事件，再同步效果，最后推进调度器。

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, warn};
use ui_motion::{Animator, Component, Effect, EffectMode, EffectPhase, Resizer, Scheduler};

use crate::scene::{Action, Cue, Scene, SceneError, WidgetSpec};
use crate::surface::RecordingFactory;
use crate::widget::{Widget, WidgetLayout};

/// 一个组件的运行时
struct WidgetRuntime {
    spec: WidgetSpec,
    widget: Rc<Widget>,
    animator: Animator,
    effects: Vec<(Effect, Rc<RecordingFactory>)>,
    resizer: Resizer,
    completions: Rc<Cell<u32>>,
    rejected: u32,
    destroyed: bool,
}

impl WidgetRuntime {
    fn new(spec: &WidgetSpec, scheduler: &Scheduler) -> Self {
        let owner = scheduler.register_owner(spec.name.clone());
        let widget = Widget::new(spec.name.clone(), owner, spec.layout);
        widget.set_state(spec.state);
        widget.set_visible(spec.visible);

        let effects = spec
            .effects
            .iter()
            .map(|config| {
                let factory = RecordingFactory::new();
                let effect = Effect::new(config.clone(), scheduler.clone(), factory.clone());
                (effect, factory)
            })
            .collect();

        Self {
            spec: spec.clone(),
            animator: Animator::new(widget.clone(), scheduler.clone(), owner),
            widget,
            effects,
            resizer: Resizer::new(spec.resize_limits),
            completions: Rc::new(Cell::new(0)),
            rejected: 0,
            destroyed: false,
        }
    }

    fn sync_effects(&mut self) {
        if self.destroyed {
            return;
        }
        for (effect, _) in &mut self.effects {
            effect.sync(self.widget.as_ref());
        }
    }

    fn apply(&mut self, action: &Action, scheduler: &Scheduler) {
        if self.destroyed {
            warn!(widget = self.widget.name(), ?action, "组件已销毁，忽略事件");
            return;
        }

        match action {
            Action::Animate { animation } => {
                let Some(config) = self.spec.animations.get(animation) else {
                    return;
                };
                let completions = self.completions.clone();
                let name = self.widget.name().to_string();
                let label = animation.clone();
                let accepted = self.animator.animate(config, move || {
                    completions.set(completions.get() + 1);
                    debug!(widget = %name, animation = %label, "动画完成");
                });
                if !accepted {
                    self.rejected += 1;
                }
            }
            Action::Stop { animation, reset } => {
                if let Some(config) = self.spec.animations.get(animation) {
                    self.animator.stop(config, *reset);
                }
            }
            Action::StopAll { reset } => self.animator.stop_all(*reset),
            Action::SetState { state } => self.widget.set_state(*state),
            Action::SetVisible { visible } => self.widget.set_visible(*visible),
            Action::SetLive { live } => self.widget.set_live(*live),
            Action::Resize { direction, amount } => {
                self.resizer.begin(*direction);
                self.resizer.drag(self.widget.as_ref(), *amount);
                self.resizer.end(Some(&mut self.animator));
            }
            Action::Destroy => {
                let cancelled = scheduler.destroy_owner(self.widget.owner());
                debug!(widget = self.widget.name(), cancelled, "组件销毁");
                self.destroyed = true;
            }
        }
    }

    fn report(&self) -> WidgetReport {
        WidgetReport {
            name: self.widget.name().to_string(),
            layout: self.widget.layout(),
            writes: self.widget.writes(),
            completions: self.completions.get(),
            rejected: self.rejected,
            animating: self.animator.is_animating(),
            destroyed: self.destroyed,
            effects: self
                .effects
                .iter()
                .map(|(effect, factory)| {
                    let surface = factory.last();
                    EffectReport {
                        mode: effect.config().mode,
                        phase: effect.phase(),
                        visibility: effect.visibility(),
                        enabled: surface.as_ref().is_some_and(|s| s.is_enabled()),
                        channel: surface.as_ref().map_or(0.0, |s| s.channel()),
                        peak: surface.as_ref().map_or(0.0, |s| s.peak()),
                    }
                })
                .collect(),
        }
    }
}

/// 场景回放器
pub struct SceneRunner {
    name: String,
    scheduler: Scheduler,
    widgets: Vec<WidgetRuntime>,
    /// 按帧分组的事件
    cues: BTreeMap<u32, Vec<Cue>>,
    fps: u32,
    frame: u32,
}

impl SceneRunner {
    pub fn new(scene: &Scene, fps: u32) -> Result<Self, SceneError> {
        scene.validate()?;

        let scheduler = Scheduler::new();
        let widgets = scene
            .widgets
            .iter()
            .map(|spec| WidgetRuntime::new(spec, &scheduler))
            .collect();

        let mut cues: BTreeMap<u32, Vec<Cue>> = BTreeMap::new();
        for cue in &scene.timeline {
            cues.entry(cue.frame).or_default().push(cue.clone());
        }

        Ok(Self {
            name: scene.name.clone(),
            scheduler,
            widgets,
            cues,
            fps: fps.max(1),
            frame: 0,
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// 已推进的帧数
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// 推进一帧
    pub fn step(&mut self) {
        if let Some(cues) = self.cues.remove(&self.frame) {
            for cue in cues {
                debug!(frame = self.frame, widget = %cue.widget, action = ?cue.action, "执行事件");
                if let Some(runtime) = self
                    .widgets
                    .iter_mut()
                    .find(|runtime| runtime.spec.name == cue.widget)
                {
                    runtime.apply(&cue.action, &self.scheduler);
                }
            }
        }

        for runtime in &mut self.widgets {
            runtime.sync_effects();
        }

        self.scheduler.advance(1.0 / self.fps as f32);
        self.frame += 1;
    }

    /// 推进 `frames` 帧并生成报告
    pub fn run(&mut self, frames: u32) -> Report {
        info!(scene = %self.name, frames, fps = self.fps, "开始回放");
        for _ in 0..frames {
            self.step();
        }
        let report = self.report();
        info!(scene = %self.name, running = report.running_tasks, "回放结束");
        report
    }

    pub fn report(&self) -> Report {
        Report {
            scene: self.name.clone(),
            frames: self.frame,
            fps: self.fps,
            running_tasks: self.scheduler.running_count(),
            widgets: self.widgets.iter().map(WidgetRuntime::report).collect(),
        }
    }
}

/// 回放报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub scene: String,
    pub frames: u32,
    pub fps: u32,
    pub running_tasks: usize,
    pub widgets: Vec<WidgetReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetReport {
    pub name: String,
    pub layout: WidgetLayout,
    pub writes: usize,
    pub completions: u32,
    pub rejected: u32,
    pub animating: bool,
    pub destroyed: bool,
    pub effects: Vec<EffectReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectReport {
    pub mode: EffectMode,
    pub phase: EffectPhase,
    pub visibility: f32,
    pub enabled: bool,
    pub channel: f32,
    pub peak: f32,
}

impl Report {
    pub fn widget(&self, name: &str) -> Option<&WidgetReport> {
        self.widgets.iter().find(|widget| widget.name == name)
    }

    /// 人类可读的摘要
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "scene {} ({} frames @ {} fps)", self.scene, self.frames, self.fps);
        for widget in &self.widgets {
            let layout = &widget.layout;
            let _ = writeln!(
                out,
                "{}: alpha={:.2} position=({:.1}, {:.1}) size=({:.1}, {:.1}) completed={} rejected={}{}",
                widget.name,
                layout.alpha,
                layout.position.x,
                layout.position.y,
                layout.size.x,
                layout.size.y,
                widget.completions,
                widget.rejected,
                if widget.destroyed { " destroyed" } else { "" },
            );
            for effect in &widget.effects {
                let _ = writeln!(
                    out,
                    "  {:?}: {:?} channel={:.2} peak={:.2}",
                    effect.mode, effect.phase, effect.channel, effect.peak
                );
            }
        }
        let _ = write!(out, "running tasks: {}", self.running_tasks);
        out
    }
}
