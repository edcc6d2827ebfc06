//! 端到端过渡行为：调度器 + 动画器 + 效果 + 触发求值。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ui_motion::{
    AnimationConfig, AnimationDuration, Animator, Component, Effect, EffectConfig, EffectMode,
    EffectPhase, EffectStyle, EffectSurface, EffectTrigger, FadePreset, LayoutTarget, OwnerId,
    Scheduler, SurfaceFactory, UiState, Vec2, Vec3, Anchors,
};

#[derive(Default)]
struct Layout {
    position: Vec2,
    anchors: Anchors,
    size: Vec2,
    rotation: Vec3,
    alpha: f32,
    alpha_writes: usize,
}

/// 最小的宿主组件：既是布局目标，也提供状态
struct Widget {
    owner: OwnerId,
    layout: RefCell<Layout>,
    state: Cell<UiState>,
}

impl Widget {
    fn new(scheduler: &Scheduler, name: &str) -> Rc<Self> {
        Rc::new(Self {
            owner: scheduler.register_owner(name),
            layout: RefCell::new(Layout {
                size: Vec2::new(320.0, 240.0),
                alpha: 1.0,
                ..Layout::default()
            }),
            state: Cell::new(UiState::empty()),
        })
    }
}

impl LayoutTarget for Widget {
    fn position(&self) -> Vec2 {
        self.layout.borrow().position
    }
    fn set_position(&self, value: Vec2) {
        self.layout.borrow_mut().position = value;
    }
    fn anchors(&self) -> Anchors {
        self.layout.borrow().anchors
    }
    fn set_anchors(&self, value: Anchors) {
        self.layout.borrow_mut().anchors = value;
    }
    fn size(&self) -> Vec2 {
        self.layout.borrow().size
    }
    fn set_size(&self, value: Vec2) {
        self.layout.borrow_mut().size = value;
    }
    fn rotation(&self) -> Vec3 {
        self.layout.borrow().rotation
    }
    fn set_rotation(&self, value: Vec3) {
        self.layout.borrow_mut().rotation = value;
    }
    fn alpha(&self) -> f32 {
        self.layout.borrow().alpha
    }
    fn set_alpha(&self, value: f32) {
        let mut layout = self.layout.borrow_mut();
        layout.alpha = value;
        layout.alpha_writes += 1;
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
        true
    }
}

#[derive(Default)]
struct Overlay {
    enabled: Cell<bool>,
    channel: Cell<f32>,
    peak_seen: Cell<f32>,
}

impl EffectSurface for Overlay {
    fn configure(&self, _style: &EffectStyle) {}
    fn attach(&self, _owner: OwnerId) {}
    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }
    fn set_channel(&self, value: f32) {
        self.channel.set(value);
        self.peak_seen.set(self.peak_seen.get().max(value));
    }
}

#[derive(Default)]
struct Factory {
    last: RefCell<Option<Rc<Overlay>>>,
}

impl SurfaceFactory for Factory {
    fn create_surface(&self, _mode: EffectMode) -> Rc<dyn EffectSurface> {
        let surface = Rc::new(Overlay::default());
        *self.last.borrow_mut() = Some(surface.clone());
        surface
    }
}

fn frames(scheduler: &Scheduler, count: usize) {
    for _ in 0..count {
        scheduler.advance(1.0 / 60.0);
    }
}

#[test]
fn fade_in_runs_to_completion_once() {
    let scheduler = Scheduler::new();
    let widget = Widget::new(&scheduler, "panel");
    let mut animator = Animator::new(widget.clone(), scheduler.clone(), widget.owner);

    let completions = Rc::new(Cell::new(0));
    {
        let completions = completions.clone();
        animator.animate(&AnimationConfig::default(), move || {
            completions.set(completions.get() + 1)
        });
    }

    // Normal = 0.5 秒
    frames(&scheduler, 15);
    let midway = widget.alpha();
    assert!(midway > 0.0 && midway < 1.0);

    frames(&scheduler, 30);
    assert_eq!(widget.alpha(), 1.0);
    assert_eq!(completions.get(), 1);
    assert_eq!(scheduler.running_count(), 0);
}

#[test]
fn destroying_owner_freezes_target() {
    let scheduler = Scheduler::new();
    let widget = Widget::new(&scheduler, "toast");
    let mut animator = Animator::new(widget.clone(), scheduler.clone(), widget.owner);

    let completed = Rc::new(Cell::new(false));
    {
        let completed = completed.clone();
        animator.animate(&AnimationConfig::default(), move || completed.set(true));
    }
    frames(&scheduler, 10);

    let writes = widget.layout.borrow().alpha_writes;
    assert_eq!(scheduler.destroy_owner(widget.owner), 1);
    frames(&scheduler, 60);

    assert_eq!(widget.layout.borrow().alpha_writes, writes);
    assert!(!completed.get());
    assert!(!animator.is_animating());
}

#[test]
fn retrigger_cancels_previous_and_settles_on_rest_value() {
    let scheduler = Scheduler::new();
    let widget = Widget::new(&scheduler, "menu");
    let mut animator = Animator::new(widget.clone(), scheduler.clone(), widget.owner);

    let fade_out = AnimationConfig {
        fade: FadePreset::FadeOut,
        duration: AnimationDuration::Slower,
        ..AnimationConfig::default()
    };
    animator.animate(&fade_out, || {});
    frames(&scheduler, 30);
    let interrupted = widget.alpha();
    assert!(interrupted < 1.0);

    // 重新淡入：旧任务被同步取消，下一帧之前值不变
    let first_done = Rc::new(Cell::new(false));
    {
        let first_done = first_done.clone();
        animator.animate(&AnimationConfig::default(), move || first_done.set(true));
    }
    assert_eq!(widget.alpha(), interrupted);
    assert_eq!(scheduler.owned_count(widget.owner), 1);

    frames(&scheduler, 60);
    assert_eq!(widget.alpha(), 1.0);
    assert!(first_done.get());
}

#[test]
fn focus_driven_overlay() {
    let scheduler = Scheduler::new();
    let widget = Widget::new(&scheduler, "button");
    let factory = Rc::new(Factory::default());
    let mut effect = Effect::new(
        EffectConfig::new(EffectMode::Overlay, EffectTrigger::FOCUSED),
        scheduler.clone(),
        factory.clone(),
    );

    widget.state.set(UiState::FOCUSED_THIS | UiState::OPENED);
    assert!(effect.sync(widget.as_ref()));
    frames(&scheduler, 2);

    // 焦点在淡入完成前离开
    widget.state.set(UiState::OPENED);
    assert!(!effect.sync(widget.as_ref()));
    assert!(!effect.is_active());

    frames(&scheduler, 60);
    let surface = factory.last.borrow().clone().unwrap();
    assert!(surface.peak_seen.get() < 0.5);
    assert_eq!(surface.channel.get(), 0.0);
    assert!(!surface.enabled.get());
    assert_eq!(effect.phase(), EffectPhase::Inactive);
}
