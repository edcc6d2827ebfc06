//! # Scheduler 模块
//!
//! 协作式任务调度器。
//!
//! ## 设计说明
//!
//! - 调度器是一个可克隆的句柄（`Rc<RefCell<..>>`），子系统各自持有一份
//! - tick 开始时对注册表做快照：本 tick 内新启动的任务从下一个 tick 才开始推进
//! - 推进任务体时不持有注册表借用，任务体和完成回调可以同步地启动/取消其他任务
//! - 所有者销毁时强制取消它名下的全部任务

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::cell::RefCell;

use tracing::{debug, trace, warn};

use super::{OwnerId, Task, TaskBody, TaskId, TaskState};
use crate::error::{TaskError, TaskResult};

/// 根所有者名称（调度器自身）
const ROOT_OWNER_NAME: &str = "scheduler";

thread_local! {
    static SHARED: Scheduler = Scheduler::new();
}

struct SchedulerInner {
    /// 已注册且存活的所有者
    owners: HashMap<OwnerId, String>,
    /// 按启动顺序排列的任务
    tasks: Vec<Task>,
    next_task_id: u64,
    next_owner_id: u64,
    root: OwnerId,
}

/// 调度器
///
/// 宿主每帧调用一次 [`advance`](Scheduler::advance)；调度器本身没有时钟。
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("owners", &inner.owners.len())
            .field("tasks", &inner.tasks.len())
            .finish()
    }
}

impl Scheduler {
    /// 创建独立的调度器
    pub fn new() -> Self {
        let root = OwnerId(0);
        let mut owners = HashMap::new();
        owners.insert(root, ROOT_OWNER_NAME.to_string());

        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                owners,
                tasks: Vec::new(),
                next_task_id: 1,
                next_owner_id: 1,
                root,
            })),
        }
    }

    /// 当前线程共享的调度器（首次访问时创建）
    pub fn shared() -> Self {
        SHARED.with(Clone::clone)
    }

    /// 调度器自身作为所有者（用于没有宿主组件的任务），永远不会被销毁
    pub fn root_owner(&self) -> OwnerId {
        self.inner.borrow().root
    }

    // ========== 所有者管理 ==========

    /// 注册所有者
    pub fn register_owner(&self, name: impl Into<String>) -> OwnerId {
        let mut inner = self.inner.borrow_mut();
        let id = OwnerId(inner.next_owner_id);
        inner.next_owner_id += 1;
        let name = name.into();
        debug!(owner = %id, name = %name, "注册所有者");
        inner.owners.insert(id, name);
        id
    }

    /// 所有者是否存活
    pub fn is_owner_alive(&self, owner: OwnerId) -> bool {
        self.inner.borrow().owners.contains_key(&owner)
    }

    /// 所有者名称
    pub fn owner_name(&self, owner: OwnerId) -> Option<String> {
        self.inner.borrow().owners.get(&owner).cloned()
    }

    /// 宿主销毁所有者时调用
    ///
    /// 返回前，该所有者名下的所有运行中任务都已被取消（`was_cancelled = true`）。
    /// 返回被取消的任务数量。
    pub fn destroy_owner(&self, owner: OwnerId) -> usize {
        let owned: Vec<Task> = {
            let mut inner = self.inner.borrow_mut();
            if owner == inner.root {
                warn!(owner = %owner, "根所有者不能被销毁");
                return 0;
            }
            if inner.owners.remove(&owner).is_none() {
                return 0;
            }
            inner
                .tasks
                .iter()
                .filter(|task| task.owner() == owner && task.is_running())
                .cloned()
                .collect()
        };

        for task in &owned {
            task.stop();
        }
        self.prune();

        debug!(owner = %owner, stopped = owned.len(), "所有者已销毁");
        owned.len()
    }

    // ========== 任务控制 ==========

    /// 创建处于挂起状态的任务
    pub fn create(&self, body: impl TaskBody + 'static, owner: OwnerId) -> Task {
        let name = self
            .owner_name(owner)
            .unwrap_or_else(|| format!("orphan-{}", owner.value()));
        self.create_named(body, owner, name)
    }

    /// 创建带调试名称的任务
    pub fn create_named(
        &self,
        body: impl TaskBody + 'static,
        owner: OwnerId,
        name: impl Into<String>,
    ) -> Task {
        let mut inner = self.inner.borrow_mut();
        let id = TaskId(inner.next_task_id);
        inner.next_task_id += 1;
        Task::new(id, owner, name.into(), Box::new(body))
    }

    /// 创建并立即启动
    pub fn spawn(&self, body: impl TaskBody + 'static, owner: OwnerId) -> TaskResult<Task> {
        let task = self.create(body, owner);
        self.start(&task)?;
        Ok(task)
    }

    /// 启动任务
    ///
    /// 重复启动、启动已结束的任务、所有者已销毁都会记录警告并返回错误，任务不受影响。
    pub fn start(&self, task: &Task) -> TaskResult<()> {
        let result = self.try_start(task);
        if let Err(err) = &result {
            warn!(task = %task.id(), name = %task.name(), error = %err, "任务启动失败");
        }
        result
    }

    fn try_start(&self, task: &Task) -> TaskResult<()> {
        match task.state() {
            TaskState::Running => return Err(TaskError::AlreadyRunning { task: task.id() }),
            TaskState::Completed | TaskState::Cancelled => {
                return Err(TaskError::Finished { task: task.id() });
            }
            TaskState::Suspended => {}
        }

        let mut inner = self.inner.borrow_mut();
        let owner = task.owner();
        if !inner.owners.contains_key(&owner) {
            // 所有者 ID 单调递增，小于下一个 ID 说明曾经注册过
            return Err(if owner.value() < inner.next_owner_id {
                TaskError::OwnerDestroyed {
                    task: task.id(),
                    owner,
                }
            } else {
                TaskError::UnknownOwner {
                    task: task.id(),
                    owner,
                }
            });
        }

        task.mark_running();
        inner.tasks.push(task.clone());
        trace!(task = %task.id(), name = %task.name(), "任务启动");
        Ok(())
    }

    /// 取消任务（对未运行的任务是 no-op）
    pub fn stop(&self, task: &Task) {
        task.stop();
    }

    /// 暂停 / 恢复任务
    pub fn pause(&self, task: &Task, paused: bool) {
        task.set_paused(paused);
    }

    /// 推进一帧
    ///
    /// 按启动顺序推进所有未暂停的任务，随后移除已结束的任务。
    pub fn advance(&self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let snapshot: Vec<Task> = self.inner.borrow().tasks.clone();

        for task in &snapshot {
            task.advance(dt);
        }

        self.prune();
    }

    fn prune(&self) {
        self.inner
            .borrow_mut()
            .tasks
            .retain(|task| !task.is_finished());
    }

    // ========== 查询方法 ==========

    /// 注册表中运行中的任务数量（包括暂停的）
    pub fn running_count(&self) -> usize {
        self.inner
            .borrow()
            .tasks
            .iter()
            .filter(|task| task.is_running())
            .count()
    }

    /// 指定所有者名下运行中的任务数量
    pub fn owned_count(&self, owner: OwnerId) -> usize {
        self.inner
            .borrow()
            .tasks
            .iter()
            .filter(|task| task.owner() == owner && task.is_running())
            .count()
    }

    /// 取消所有任务
    pub fn stop_all(&self) {
        let tasks = std::mem::take(&mut self.inner.borrow_mut().tasks);
        for task in &tasks {
            task.stop();
        }
        self.prune();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Step, timed};
    use std::cell::Cell;

    fn counter_body(counter: &Rc<Cell<u32>>) -> impl FnMut(f32) -> Step + 'static {
        let counter = counter.clone();
        move |_dt| {
            counter.set(counter.get() + 1);
            Step::next_tick()
        }
    }

    #[test]
    fn test_create_is_suspended() {
        let scheduler = Scheduler::new();
        let counter = Rc::new(Cell::new(0));
        let task = scheduler.create(counter_body(&counter), scheduler.root_owner());

        scheduler.advance(0.1);
        assert_eq!(task.state(), TaskState::Suspended);
        assert_eq!(counter.get(), 0);
        assert_eq!(task.name(), "scheduler");
    }

    #[test]
    fn test_start_twice_is_error() {
        let scheduler = Scheduler::new();
        let counter = Rc::new(Cell::new(0));
        let task = scheduler.create(counter_body(&counter), scheduler.root_owner());

        assert!(scheduler.start(&task).is_ok());
        assert_eq!(
            scheduler.start(&task),
            Err(TaskError::AlreadyRunning { task: task.id() })
        );

        // 重复启动不会导致任务被推进两次
        scheduler.advance(0.1);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_restart_finished_is_error() {
        let scheduler = Scheduler::new();
        let task = scheduler
            .spawn(|_dt: f32| Step::Done, scheduler.root_owner())
            .unwrap();
        scheduler.advance(0.1);
        assert_eq!(
            scheduler.start(&task),
            Err(TaskError::Finished { task: task.id() })
        );
    }

    #[test]
    fn test_registration_order() {
        let scheduler = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let log = log.clone();
            scheduler
                .spawn(
                    move |_dt: f32| {
                        log.borrow_mut().push(tag);
                        Step::Done
                    },
                    scheduler.root_owner(),
                )
                .unwrap();
        }

        scheduler.advance(0.1);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.running_count(), 0);
    }

    #[test]
    fn test_task_started_during_tick_waits_for_next_tick() {
        let scheduler = Scheduler::new();
        let inner_runs = Rc::new(Cell::new(0));

        {
            let scheduler2 = scheduler.clone();
            let inner_runs = inner_runs.clone();
            scheduler
                .spawn(
                    move |_dt: f32| {
                        let inner_runs = inner_runs.clone();
                        scheduler2
                            .spawn(
                                move |_dt: f32| {
                                    inner_runs.set(inner_runs.get() + 1);
                                    Step::Done
                                },
                                scheduler2.root_owner(),
                            )
                            .unwrap();
                        Step::Done
                    },
                    scheduler.root_owner(),
                )
                .unwrap();
        }

        scheduler.advance(0.1);
        assert_eq!(inner_runs.get(), 0);
        assert_eq!(scheduler.running_count(), 1);

        scheduler.advance(0.1);
        assert_eq!(inner_runs.get(), 1);
    }

    #[test]
    fn test_pause_keeps_task_registered() {
        let scheduler = Scheduler::new();
        let counter = Rc::new(Cell::new(0));
        let task = scheduler
            .spawn(counter_body(&counter), scheduler.root_owner())
            .unwrap();

        scheduler.pause(&task, true);
        scheduler.advance(0.1);
        scheduler.advance(0.1);
        assert_eq!(counter.get(), 0);
        assert_eq!(scheduler.running_count(), 1);

        scheduler.pause(&task, false);
        scheduler.advance(0.1);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_half_duration_progress_then_complete() {
        let scheduler = Scheduler::new();
        let progress = Rc::new(Cell::new(0.0_f32));
        let task = {
            let progress = progress.clone();
            scheduler
                .spawn(timed(1.0, move |p| progress.set(p)), scheduler.root_owner())
                .unwrap()
        };

        let finished = Rc::new(RefCell::new(Vec::new()));
        {
            let finished = finished.clone();
            task.on_finished(move |cancelled| finished.borrow_mut().push(cancelled));
        }

        for _ in 0..5 {
            scheduler.advance(0.1);
        }
        assert!((progress.get() - 0.5).abs() < 1e-4);
        assert!(finished.borrow().is_empty());

        for _ in 0..6 {
            scheduler.advance(0.1);
        }
        assert_eq!(progress.get(), 1.0);
        assert_eq!(*finished.borrow(), vec![false]);
    }

    #[test]
    fn test_destroy_owner_stops_owned_tasks() {
        let scheduler = Scheduler::new();
        let owner = scheduler.register_owner("panel");
        let other = scheduler.register_owner("other");

        let counter = Rc::new(Cell::new(0));
        let owned = scheduler.spawn(counter_body(&counter), owner).unwrap();
        let unrelated = scheduler.spawn(counter_body(&counter), other).unwrap();

        let cancelled = Rc::new(Cell::new(None));
        {
            let cancelled = cancelled.clone();
            owned.on_finished(move |c| cancelled.set(Some(c)));
        }

        scheduler.advance(0.1);
        assert_eq!(counter.get(), 2);

        assert_eq!(scheduler.destroy_owner(owner), 1);
        assert_eq!(cancelled.get(), Some(true));
        assert!(!scheduler.is_owner_alive(owner));
        assert_eq!(scheduler.owned_count(owner), 0);

        scheduler.advance(0.1);
        assert_eq!(counter.get(), 3);
        assert!(unrelated.is_running());
    }

    #[test]
    fn test_start_for_destroyed_owner_fails() {
        let scheduler = Scheduler::new();
        let owner = scheduler.register_owner("gone");
        scheduler.destroy_owner(owner);

        let task = scheduler.create(|_dt: f32| Step::Done, owner);
        assert_eq!(
            scheduler.start(&task),
            Err(TaskError::OwnerDestroyed {
                task: task.id(),
                owner
            })
        );
        assert_eq!(task.state(), TaskState::Suspended);
    }

    #[test]
    fn test_start_for_unknown_owner_fails() {
        let scheduler = Scheduler::new();
        let task = scheduler.create(|_dt: f32| Step::Done, OwnerId(42));
        assert!(matches!(
            scheduler.start(&task),
            Err(TaskError::UnknownOwner { .. })
        ));
    }

    #[test]
    fn test_root_owner_cannot_be_destroyed() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.destroy_owner(scheduler.root_owner()), 0);
        assert!(scheduler.is_owner_alive(scheduler.root_owner()));
    }

    #[test]
    fn test_replacement_started_from_cancel_handler() {
        let scheduler = Scheduler::new();
        let owner = scheduler.register_owner("widget");
        let first = scheduler.spawn(|_dt: f32| Step::next_tick(), owner).unwrap();

        let replacement: Rc<RefCell<Option<Task>>> = Rc::new(RefCell::new(None));
        {
            let scheduler = scheduler.clone();
            let replacement = replacement.clone();
            first.on_finished(move |cancelled| {
                assert!(cancelled);
                let task = scheduler
                    .spawn(|_dt: f32| Step::next_tick(), scheduler.root_owner())
                    .unwrap();
                *replacement.borrow_mut() = Some(task);
            });
        }

        scheduler.stop(&first);
        assert!(!first.is_running());
        assert!(replacement.borrow().as_ref().unwrap().is_running());
        assert_eq!(scheduler.running_count(), 1);
    }

    #[test]
    fn test_shared_scheduler_is_same_instance() {
        let a = Scheduler::shared();
        let b = Scheduler::shared();
        let owner = a.register_owner("shared");
        assert!(b.is_owner_alive(owner));
    }
}
