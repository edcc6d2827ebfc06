//! 常用任务体构造函数。

use super::Step;

/// 在第一次 tick 时执行一次 `action` 后结束
pub fn once(action: impl FnOnce() + 'static) -> impl FnMut(f32) -> Step {
    let mut action = Some(action);
    move |_dt| {
        if let Some(action) = action.take() {
            action();
        }
        Step::Done
    }
}

/// 等待 `delay` 秒后执行一次 `action`
pub fn delayed(action: impl FnOnce() + 'static, delay: f32) -> impl FnMut(f32) -> Step {
    let mut action = Some(action);
    let mut waited = false;
    move |_dt| {
        if !waited {
            waited = true;
            return Step::wait(delay);
        }
        if let Some(action) = action.take() {
            action();
        }
        Step::Done
    }
}

/// 每隔 `interval` 秒执行一次 `action`，永不自然结束
///
/// `interval <= 0` 时每个 tick 执行一次。
pub fn repeating(mut action: impl FnMut() + 'static, interval: f32) -> impl FnMut(f32) -> Step {
    move |_dt| {
        action();
        if interval <= 0.0 {
            Step::next_tick()
        } else {
            Step::wait(interval)
        }
    }
}

/// 在 `duration` 秒内把进度从 0 推进到 1
///
/// 每个 tick 以截断到 `[0, 1]` 的进度调用一次 `apply`；最后一次调用的进度恰好是 1。
/// `duration <= 0` 时第一个 tick 就直接到 1。
pub fn timed(duration: f32, apply: impl FnMut(f32) + 'static) -> impl FnMut(f32) -> Step {
    timed_from(0.0, duration, apply)
}

/// 与 [`timed`] 相同，但从 `initial` 进度开始（用于接续被打断的过渡）
pub fn timed_from(
    initial: f32,
    duration: f32,
    mut apply: impl FnMut(f32) + 'static,
) -> impl FnMut(f32) -> Step {
    let mut progress = initial.clamp(0.0, 1.0);
    move |dt| {
        if duration > 0.0 {
            progress += dt / duration;
        } else {
            progress = 1.0;
        }

        if progress >= 1.0 {
            apply(1.0);
            Step::Done
        } else {
            apply(progress.max(0.0));
            Step::next_tick()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskBody;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_once() {
        let count = Rc::new(Cell::new(0));
        let mut body = {
            let count = count.clone();
            once(move || count.set(count.get() + 1))
        };
        assert_eq!(body.resume(0.1), Step::Done);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_delayed() {
        let count = Rc::new(Cell::new(0));
        let mut body = {
            let count = count.clone();
            delayed(move || count.set(count.get() + 1), 0.5)
        };
        assert_eq!(body.resume(0.1), Step::wait(0.5));
        assert_eq!(count.get(), 0);
        assert_eq!(body.resume(0.5), Step::Done);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_repeating() {
        let count = Rc::new(Cell::new(0));
        let mut every_tick = {
            let count = count.clone();
            repeating(move || count.set(count.get() + 1), 0.0)
        };
        assert_eq!(every_tick.resume(0.1), Step::next_tick());
        assert_eq!(every_tick.resume(0.1), Step::next_tick());
        assert_eq!(count.get(), 2);

        let mut spaced = repeating(|| {}, 0.25);
        assert_eq!(spaced.resume(0.1), Step::wait(0.25));
    }

    #[test]
    fn test_timed_progress() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut body = {
            let seen = seen.clone();
            timed(1.0, move |p| seen.borrow_mut().push(p))
        };

        assert_eq!(body.resume(0.25), Step::next_tick());
        assert_eq!(body.resume(0.25), Step::next_tick());
        assert_eq!(body.resume(0.25), Step::next_tick());
        assert_eq!(body.resume(0.25), Step::Done);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!((seen[1] - 0.5).abs() < 1e-5);
        assert_eq!(seen[3], 1.0);
    }

    #[test]
    fn test_timed_zero_duration_finishes_in_one_tick() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut body = {
            let seen = seen.clone();
            timed(0.0, move |p| seen.borrow_mut().push(p))
        };
        assert_eq!(body.resume(0.016), Step::Done);
        assert_eq!(*seen.borrow(), vec![1.0]);
    }

    #[test]
    fn test_timed_from_midway() {
        let last = Rc::new(Cell::new(0.0));
        let mut body = {
            let last = last.clone();
            timed_from(0.5, 1.0, move |p| last.set(p))
        };
        assert_eq!(body.resume(0.25), Step::next_tick());
        assert!((last.get() - 0.75).abs() < 1e-5);
        assert_eq!(body.resume(0.25), Step::Done);
        assert_eq!(last.get(), 1.0);
    }
}
