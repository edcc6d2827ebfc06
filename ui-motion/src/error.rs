//! # Error 模块
//!
//! 定义 ui-motion 中使用的错误类型。
//!
//! 核心层的错误只用于"报告"：调用方记录日志后按 no-op 处理，
//! 不会继续向上层传播。

use thiserror::Error;

use crate::task::{OwnerId, TaskId};

/// 任务调度错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// 重复启动正在运行的任务
    #[error("任务 {task} 已在运行")]
    AlreadyRunning { task: TaskId },

    /// 任务已经结束（完成或被取消），不能复用
    #[error("任务 {task} 已结束，需要重新创建")]
    Finished { task: TaskId },

    /// 所有者已经被销毁
    #[error("任务 {task} 的所有者 {owner} 已销毁")]
    OwnerDestroyed { task: TaskId, owner: OwnerId },

    /// 所有者从未在调度器中注册
    #[error("任务 {task} 的所有者 {owner} 未注册")]
    UnknownOwner { task: TaskId, owner: OwnerId },
}

/// Result 类型别名
pub type TaskResult<T> = Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskError::AlreadyRunning { task: TaskId(3) };
        assert_eq!(err.to_string(), "任务 Task(3) 已在运行");

        let err = TaskError::OwnerDestroyed {
            task: TaskId(1),
            owner: OwnerId(7),
        };
        assert!(err.to_string().contains("Owner(7)"));
    }
}
