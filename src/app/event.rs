/*!
 * 小程序事件
 *
 * 页面上的字段变化、主按钮确认与关闭请求都被串行化为 `AppEvent`，
 * 通过 `AppHandle` 投递给运行中的事件循环。
 */

use serde::Serialize;
use tokio::sync::mpsc;

use crate::utils::{error::app_error, AppResult};

/// 外部事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// 字段变化；`None` 表示字段从表单数据中消失（如取消勾选的复选框）
    FieldChanged {
        name: String,
        value: Option<String>,
    },
    /// 主按钮确认
    Confirm,
    Shutdown,
}

/// 事件循环的退出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "exit", rename_all = "snake_case")]
pub enum AppExit {
    /// 下载配置被后端接受，视图已关闭
    Closed,
    /// 认证消息已交给宿主
    MessageSent,
    /// 单次尝试模式下投递失败；状态码 0 表示传输层失败
    Failed { status: u16 },
    Shutdown,
}

impl AppExit {
    pub fn is_success(&self) -> bool {
        matches!(self, AppExit::Closed | AppExit::MessageSent)
    }
}

/// 运行中小程序的句柄，可克隆
#[derive(Debug, Clone)]
pub struct AppHandle {
    sender: mpsc::UnboundedSender<AppEvent>,
}

impl AppHandle {
    pub(crate) fn new(sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { sender }
    }

    pub fn field_changed(&self, name: impl Into<String>, value: impl Into<String>) -> AppResult<()> {
        self.send(AppEvent::FieldChanged {
            name: name.into(),
            value: Some(value.into()),
        })
    }

    pub fn remove_field(&self, name: impl Into<String>) -> AppResult<()> {
        self.send(AppEvent::FieldChanged {
            name: name.into(),
            value: None,
        })
    }

    pub fn confirm(&self) -> AppResult<()> {
        self.send(AppEvent::Confirm)
    }

    pub fn shutdown(&self) -> AppResult<()> {
        self.send(AppEvent::Shutdown)
    }

    pub fn send(&self, event: AppEvent) -> AppResult<()> {
        self.sender
            .send(event)
            .map_err(|_| app_error("mini app event loop has stopped"))
    }
}
