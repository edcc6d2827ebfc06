//! # Task 模块
//!
//! 协作式任务：一段可以在挂起点让出执行权的工作，绑定到一个所有者上，
//! 由 [`Scheduler`] 在每次 tick 时推进。
//!
//! ## 执行模型
//!
//! ```text
//! Host ── advance(dt) ──► Scheduler ── resume(dt) ──► TaskBody
//!                                   ◄── Step::Yield / Step::Done
//! ```
//!
//! - 任务体在两个挂起点之间同步执行，不会被其他任务打断
//! - 挂起点可以请求"下一个 tick 继续"或"等待 D 秒后继续"
//! - 完成通知恰好触发一次：自然结束为 `false`，被 `stop` 取消为 `true`
//! - 结束后的任务是惰性的，不能再次启动

mod body;
mod scheduler;

pub use body::{delayed, once, repeating, timed, timed_from};
pub use scheduler::Scheduler;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

/// 等待剩余时间小于该值时视为已到期（吸收浮点累计误差）
const WAIT_EPSILON: f32 = 1e-6;

/// 任务唯一标识符
///
/// 由 [`Scheduler`] 分配，同一调度器内不会重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// 所有者标识符
///
/// 所有者是宿主侧的组件。调度器只跟踪它的生命周期，不持有它。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub(crate) u64);

impl OwnerId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner({})", self.0)
    }
}

/// 挂起方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// 下一个 tick 继续
    NextTick,
    /// 等待指定秒数后继续（≤ 0 等价于下一个 tick）
    Wait(f32),
}

/// 任务体单步执行的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// 在挂起点让出执行权
    Yield(Suspend),
    /// 任务体执行完毕
    Done,
}

impl Step {
    /// 下一个 tick 继续
    pub fn next_tick() -> Self {
        Self::Yield(Suspend::NextTick)
    }

    /// 等待 `seconds` 秒后继续
    pub fn wait(seconds: f32) -> Self {
        Self::Yield(Suspend::Wait(seconds))
    }
}

/// 任务体
///
/// 每次被恢复时执行到下一个挂起点。`dt` 为本次 tick 的时间增量（秒）。
///
/// 任何 `FnMut(f32) -> Step` 闭包都自动实现该 trait。
pub trait TaskBody {
    /// 从上一个挂起点继续执行
    fn resume(&mut self, dt: f32) -> Step;
}

impl<F> TaskBody for F
where
    F: FnMut(f32) -> Step,
{
    fn resume(&mut self, dt: f32) -> Step {
        self(dt)
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    /// 已创建，尚未启动
    #[default]
    Suspended,
    /// 运行中（可能处于暂停）
    Running,
    /// 自然结束
    Completed,
    /// 被取消
    Cancelled,
}

impl TaskState {
    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

type FinishHandler = Box<dyn FnOnce(bool)>;

struct TaskInner {
    id: TaskId,
    owner: OwnerId,
    name: String,
    state: Cell<TaskState>,
    paused: Cell<bool>,
    wait_remaining: Cell<f32>,
    body: RefCell<Option<Box<dyn TaskBody>>>,
    handlers: RefCell<Vec<FinishHandler>>,
}

/// 任务句柄
///
/// 克隆得到的是同一个任务的另一个句柄。
#[derive(Clone)]
pub struct Task {
    inner: Rc<TaskInner>,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.inner.id)
            .field("owner", &self.inner.owner)
            .field("name", &self.inner.name)
            .field("state", &self.inner.state.get())
            .field("paused", &self.inner.paused.get())
            .finish()
    }
}

impl Task {
    pub(crate) fn new(id: TaskId, owner: OwnerId, name: String, body: Box<dyn TaskBody>) -> Self {
        Self {
            inner: Rc::new(TaskInner {
                id,
                owner,
                name,
                state: Cell::new(TaskState::Suspended),
                paused: Cell::new(false),
                wait_remaining: Cell::new(0.0),
                body: RefCell::new(Some(body)),
                handlers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// 任务 ID
    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    /// 所有者 ID
    pub fn owner(&self) -> OwnerId {
        self.inner.owner
    }

    /// 调试名称
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 当前状态
    pub fn state(&self) -> TaskState {
        self.inner.state.get()
    }

    /// 是否正在运行（暂停中的任务也算运行）
    pub fn is_running(&self) -> bool {
        self.state() == TaskState::Running
    }

    /// 是否处于暂停
    pub fn is_paused(&self) -> bool {
        self.inner.paused.get()
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// 暂停 / 恢复
    ///
    /// 暂停不会取消任务，只是让调度器在 tick 时跳过它。
    pub fn set_paused(&self, paused: bool) {
        if self.inner.paused.replace(paused) != paused {
            trace!(task = %self.id(), paused, "任务暂停状态变化");
        }
    }

    /// 注册完成回调
    ///
    /// 参数为 `was_cancelled`。如果任务已经结束，回调立即以记录的结果执行。
    pub fn on_finished(&self, handler: impl FnOnce(bool) + 'static) {
        match self.state() {
            TaskState::Completed => handler(false),
            TaskState::Cancelled => handler(true),
            TaskState::Suspended | TaskState::Running => {
                self.inner.handlers.borrow_mut().push(Box::new(handler));
            }
        }
    }

    /// 取消任务
    ///
    /// 同步生效：返回前任务体已被丢弃，完成回调已以 `was_cancelled = true` 执行。
    /// 对未运行的任务调用是 no-op。
    pub fn stop(&self) {
        if self.is_running() {
            self.finish(true);
        }
    }

    pub(crate) fn mark_running(&self) {
        self.inner.state.set(TaskState::Running);
    }

    /// 推进一个 tick
    pub(crate) fn advance(&self, dt: f32) {
        if !self.is_running() || self.is_paused() {
            return;
        }

        let remaining = self.inner.wait_remaining.get();
        if remaining > 0.0 {
            let left = remaining - dt;
            if left > WAIT_EPSILON {
                self.inner.wait_remaining.set(left);
                return;
            }
            self.inner.wait_remaining.set(0.0);
        }

        // 执行期间把任务体取出来，任务体内部可以安全地 stop 自己
        let Some(mut body) = self.inner.body.borrow_mut().take() else {
            return;
        };
        let step = body.resume(dt);

        if self.is_finished() {
            return;
        }

        match step {
            Step::Done => {
                drop(body);
                self.finish(false);
            }
            Step::Yield(suspend) => {
                if let Suspend::Wait(seconds) = suspend {
                    self.inner.wait_remaining.set(seconds.max(0.0));
                }
                *self.inner.body.borrow_mut() = Some(body);
            }
        }
    }

    fn finish(&self, cancelled: bool) {
        if self.is_finished() {
            return;
        }
        self.inner.state.set(if cancelled {
            TaskState::Cancelled
        } else {
            TaskState::Completed
        });
        self.inner.paused.set(false);
        let body = self.inner.body.borrow_mut().take();
        drop(body);

        debug!(task = %self.id(), name = %self.name(), cancelled, "任务结束");

        let handlers = std::mem::take(&mut *self.inner.handlers.borrow_mut());
        for handler in handlers {
            handler(cancelled);
        }
    }
}
