//! 宿主组件接口。

use crate::state::UiState;
use crate::task::OwnerId;

/// 宿主侧的组件
///
/// 核心层只读取它的状态；组件本身的生命周期由宿主管理，
/// 销毁时宿主负责调用 [`Scheduler::destroy_owner`](crate::task::Scheduler::destroy_owner)。
pub trait Component {
    /// 组件在调度器中的所有者 ID
    fn owner(&self) -> OwnerId;

    /// 当前状态位
    fn state(&self) -> UiState;

    /// 渲染可见性（由宿主根据层级计算，不是状态位）
    fn should_render(&self) -> bool;

    /// 组件是否处于活动层级中；不活动时跳过所有视觉过渡
    fn is_live(&self) -> bool {
        true
    }
}
