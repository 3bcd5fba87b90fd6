use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{DispatchOutcome, DispatchResult, Dispatcher};
use crate::bridge::HostBridge;
use crate::message::OutboundMessage;

/// 经宿主桥接投递
///
/// 发出即完成：投递由平台负责，本地观察不到失败。
pub struct BridgeDispatcher {
    bridge: Arc<dyn HostBridge>,
}

impl BridgeDispatcher {
    pub fn new(bridge: Arc<dyn HostBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Dispatcher for BridgeDispatcher {
    async fn dispatch(&self, message: &OutboundMessage) -> DispatchResult<DispatchOutcome> {
        let json = message.to_json()?;
        debug!("sending {} message through host bridge", message.action());
        self.bridge.send_message(&json);
        Ok(DispatchOutcome::Delivered)
    }

    fn awaits_response(&self) -> bool {
        false
    }
}
