//! 效果表面接口（由宿主实现）。

use std::rc::Rc;

use crate::config::{EffectMode, EffectStyle};
use crate::task::OwnerId;

/// 效果的可视表面（遮罩图、模糊层、阴影）
///
/// 表面由宿主按需创建，创建后一直复用。
pub trait EffectSurface {
    /// 重置并应用样式
    fn configure(&self, style: &EffectStyle);

    /// 挂到组件下并置于最上层
    fn attach(&self, owner: OwnerId);

    fn set_enabled(&self, enabled: bool);

    /// 写入效果通道：遮罩/阴影的透明度或模糊强度
    fn set_channel(&self, value: f32);
}

/// 表面工厂
pub trait SurfaceFactory {
    /// 创建一个处于禁用状态的表面
    fn create_surface(&self, mode: EffectMode) -> Rc<dyn EffectSurface>;
}
