//! # Tween 模块
//!
//! 单属性补间器。
//!
//! ## 状态机
//!
//! ```text
//! Idle ──start──► Animating ──progress ≥ 1──► Completed ─┐
//!                     │                                  ├──► Idle
//!                     └──────stop / restart────► Cancelled ┘
//! ```
//!
//! - 一个补间器同时最多只有一个驱动任务
//! - 重新 `start` 会先同步取消旧任务：属性停在当前值，旧任务的 `on_done` 不会触发
//! - 第一次 `start` 时记录"静止值"，`stop_tween(true)` 恢复到它

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::easing::EasingFunction;
use crate::target::PropertyAccessor;
use crate::task::{OwnerId, Scheduler, Task, timed};
use crate::value::Tweenable;

/// 一次补间的参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<V> {
    pub from: V,
    pub to: V,
    /// 持续时间（秒），≤ 0 表示下一个 tick 直接到终值
    pub duration: f32,
    pub easing: EasingFunction,
    /// 自然结束时把终值保存为新的静止值
    pub save_target: bool,
}

impl<V: Tweenable> Tween<V> {
    /// 创建线性补间
    pub fn new(from: V, to: V, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            easing: EasingFunction::Linear,
            save_target: false,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置是否保存终值
    pub fn with_save_target(mut self, save_target: bool) -> Self {
        self.save_target = save_target;
        self
    }

    /// 计算进度 `p` 处的值（`p ≥ 1` 时精确返回终值）
    pub fn sample(&self, p: f32) -> V {
        if p >= 1.0 {
            self.to
        } else {
            self.from.lerp(self.to, self.easing.apply(p.clamp(0.0, 1.0)))
        }
    }
}

/// 补间阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenPhase {
    #[default]
    Idle,
    Animating,
}

/// 最近一次补间的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenOutcome {
    Completed,
    Cancelled,
}

struct TweenShared<V> {
    phase: TweenPhase,
    progress: f32,
    rest: Option<V>,
    outcome: Option<TweenOutcome>,
}

/// 单属性补间器
pub struct Tweener<V: Tweenable> {
    accessor: Rc<dyn PropertyAccessor<V>>,
    scheduler: Scheduler,
    owner: OwnerId,
    label: String,
    shared: Rc<RefCell<TweenShared<V>>>,
    task: Option<Task>,
}

impl<V: Tweenable> fmt::Debug for Tweener<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Tweener")
            .field("label", &self.label)
            .field("owner", &self.owner)
            .field("phase", &shared.phase)
            .field("progress", &shared.progress)
            .field("rest", &shared.rest)
            .finish()
    }
}

impl<V: Tweenable> Tweener<V> {
    /// 创建补间器
    ///
    /// `label` 仅用于日志和任务名称。
    pub fn new(
        accessor: Rc<dyn PropertyAccessor<V>>,
        scheduler: Scheduler,
        owner: OwnerId,
        label: impl Into<String>,
    ) -> Self {
        Self {
            accessor,
            scheduler,
            owner,
            label: label.into(),
            shared: Rc::new(RefCell::new(TweenShared {
                phase: TweenPhase::Idle,
                progress: 0.0,
                rest: None,
                outcome: None,
            })),
            task: None,
        }
    }

    /// 开始补间
    ///
    /// 起始值在第一个 tick 才写入，`start` 本身不修改属性。
    /// 如果驱动任务无法启动（例如所有者已销毁），直接写入终值并调用 `on_done`。
    pub fn start(&mut self, tween: Tween<V>, on_done: impl FnOnce() + 'static) {
        self.cancel_in_flight();
        self.capture_rest();

        if !self.accessor.is_live() {
            trace!(tween = %self.label, "目标不活动，直接写入终值");
            self.settle(tween, on_done);
            return;
        }

        let body = {
            let accessor = self.accessor.clone();
            let shared = self.shared.clone();
            timed(tween.duration, move |p| {
                accessor.set(tween.sample(p));
                shared.borrow_mut().progress = p;
            })
        };
        let task = self
            .scheduler
            .create_named(body, self.owner, self.label.clone());

        // 启动失败时回调要由这里直接调用，所以放在共享槽里
        let pending: Rc<Cell<Option<Box<dyn FnOnce()>>>> =
            Rc::new(Cell::new(Some(Box::new(on_done))));
        {
            let shared = self.shared.clone();
            let pending = pending.clone();
            let to = tween.to;
            let save_target = tween.save_target;
            task.on_finished(move |cancelled| {
                let mut state = shared.borrow_mut();
                state.phase = TweenPhase::Idle;
                if cancelled {
                    state.outcome = Some(TweenOutcome::Cancelled);
                    return;
                }
                state.outcome = Some(TweenOutcome::Completed);
                state.progress = 1.0;
                if save_target {
                    state.rest = Some(to);
                }
                drop(state);
                if let Some(on_done) = pending.take() {
                    on_done();
                }
            });
        }

        {
            let mut state = self.shared.borrow_mut();
            state.phase = TweenPhase::Animating;
            state.progress = 0.0;
        }

        if self.scheduler.start(&task).is_err() {
            // 任务没有运行，完成回调不会触发
            self.settle(tween, move || {
                if let Some(on_done) = pending.take() {
                    on_done();
                }
            });
            return;
        }

        debug!(tween = %self.label, duration = tween.duration, "补间开始");
        self.task = Some(task);
    }

    /// 不经过调度器直接完成补间
    pub fn apply_instant(&mut self, tween: Tween<V>, on_done: impl FnOnce() + 'static) {
        self.cancel_in_flight();
        self.capture_rest();
        self.settle(tween, on_done);
    }

    fn settle(&mut self, tween: Tween<V>, on_done: impl FnOnce() + 'static) {
        self.accessor.set(tween.to);
        self.complete_instantly(tween);
        on_done();
    }

    fn complete_instantly(&mut self, tween: Tween<V>) {
        let mut state = self.shared.borrow_mut();
        state.phase = TweenPhase::Idle;
        state.progress = 1.0;
        state.outcome = Some(TweenOutcome::Completed);
        if tween.save_target {
            state.rest = Some(tween.to);
        }
    }

    /// 停止补间
    ///
    /// `reset = true` 时恢复并清除静止值；否则属性停在当前值，之后不再被修改。
    pub fn stop_tween(&mut self, reset: bool) {
        self.cancel_in_flight();
        let rest = {
            let mut state = self.shared.borrow_mut();
            state.phase = TweenPhase::Idle;
            if reset { state.rest.take() } else { None }
        };
        if let Some(rest) = rest {
            trace!(tween = %self.label, rest = ?rest, "恢复静止值");
            self.accessor.set(rest);
        }
    }

    /// 把当前值记录为新的静止值
    pub fn save_property(&mut self) {
        let value = self.accessor.get();
        self.shared.borrow_mut().rest = Some(value);
    }

    fn capture_rest(&mut self) {
        let mut state = self.shared.borrow_mut();
        if state.rest.is_none() {
            state.rest = Some(self.accessor.get());
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(task) = self.task.take() {
            // 取消回调会把阶段置为 Idle
            task.stop();
        }
    }

    // ========== 查询方法 ==========

    pub fn phase(&self) -> TweenPhase {
        self.shared.borrow().phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase() == TweenPhase::Animating
    }

    /// 当前补间进度（0.0 - 1.0）
    pub fn progress(&self) -> f32 {
        self.shared.borrow().progress
    }

    pub fn last_outcome(&self) -> Option<TweenOutcome> {
        self.shared.borrow().outcome
    }

    /// 已记录的静止值
    pub fn rest_value(&self) -> Option<V> {
        self.shared.borrow().rest
    }

    /// 属性的当前值
    pub fn current(&self) -> V {
        self.accessor.get()
    }

    /// 方向模式的基准值：有静止值时用静止值，否则用当前值
    pub fn base_value(&self) -> V {
        self.rest_value().unwrap_or_else(|| self.current())
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<V: Tweenable> Drop for Tweener<V> {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
