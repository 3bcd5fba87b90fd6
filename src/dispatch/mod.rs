/*!
 * 消息投递
 *
 * - bridge: 通过宿主桥接的原生发送通道投递（认证表单）
 * - http: 直接 POST 到后端 `download/setup`（下载表单）
 */

pub mod bridge;
pub mod error;
pub mod http;

pub use bridge::BridgeDispatcher;
pub use error::{DispatchError, DispatchResult};
pub use http::{HttpDispatcher, HttpOptions, JSON_CONTENT_TYPE, SETUP_PATH};

use async_trait::async_trait;
use serde_json::Value;

use crate::message::OutboundMessage;

/// 一次投递的结果
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// 已交给宿主桥接，不等待回应
    Delivered,
    /// 后端返回 200；响应体只用于日志
    Accepted { body: Option<Value> },
    /// 后端返回非 200 状态
    Rejected { status: u16 },
    /// 传输层失败（连接、DNS 等），对应页面请求对象的状态 0
    TransportFailed { message: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Delivered | DispatchOutcome::Accepted { .. }
        )
    }

    /// 展示给用户的状态码；桥接投递没有状态码
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DispatchOutcome::Delivered => None,
            DispatchOutcome::Accepted { .. } => Some(200),
            DispatchOutcome::Rejected { status } => Some(*status),
            DispatchOutcome::TransportFailed { .. } => Some(0),
        }
    }
}

/// 消息投递器
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// 投递一次，不重试
    async fn dispatch(&self, message: &OutboundMessage) -> DispatchResult<DispatchOutcome>;

    /// 是否需要等待远端回应；只有需要等待的投递才会启用提交保护
    fn awaits_response(&self) -> bool;
}
