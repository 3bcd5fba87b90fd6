/*!
 * 小程序运行时模块
 *
 * - event: 外部事件、退出原因与句柄
 * - runtime: 事件循环
 */

pub mod event;
pub mod runtime;

pub use event::{AppEvent, AppExit, AppHandle};
pub use runtime::{MiniApp, MiniAppOptions};
