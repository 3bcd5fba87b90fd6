/*!
 * 宿主桥接
 *
 * 聊天平台 SDK 暴露给小程序的能力：主按钮控制、确认事件订阅、
 * 平台内消息发送、关闭视图与阻塞式提示框。
 */

pub mod console;
pub mod recording;

pub use console::ConsoleBridge;
pub use recording::{BridgeCall, ButtonState, RecordingBridge};

use std::sync::Arc;

/// 确认事件回调
///
/// 平台保证串行投递：同一个回调不会与自身并发执行。
pub type ConfirmHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// 宿主桥接能力
pub trait HostBridge: Send + Sync {
    fn set_button_text(&self, text: &str);
    fn enable_button(&self);
    fn disable_button(&self);
    fn show_button(&self);
    fn hide_button(&self);

    /// 订阅用户确认手势，后注册的回调替换先前的
    fn on_confirm(&self, handler: ConfirmHandler);

    /// 把字符串带外投递给宿主应用
    fn send_message(&self, json: &str);

    /// 结束小程序视图
    fn close_view(&self);

    /// 阻塞式提示框
    fn show_alert(&self, text: &str);
}
