//! 聊天平台小程序后端
//!
//! 把页面表单规范化为扁平的出站消息，并按小程序类型投递：
//! - 认证表单：经宿主桥接发回机器人
//! - 下载表单：POST 到后端的 `download/setup`

// 模块声明
pub mod app; // 小程序事件循环
pub mod bridge; // 宿主桥接能力
pub mod builder; // 出站消息构建
pub mod cli; // 命令行入口
pub mod config; // TOML 配置
pub mod context; // 页面注入的上下文
pub mod dispatch; // 消息投递
pub mod form; // 表单状态、闸门与布局
pub mod message; // 出站消息模型
pub mod utils; // 工具和错误处理模块

pub use app::{AppExit, MiniApp, MiniAppOptions};
pub use builder::MiniAppKind;
pub use context::PageContext;
pub use message::OutboundMessage;
