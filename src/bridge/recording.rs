//! 内存中的桥接实现，记录所有调用

use parking_lot::Mutex;

use super::{ConfirmHandler, HostBridge};

/// 一次桥接调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    SetButtonText(String),
    EnableButton,
    DisableButton,
    ShowButton,
    HideButton,
    OnConfirm,
    SendMessage(String),
    CloseView,
    ShowAlert(String),
}

/// 主按钮当前状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub text: String,
    pub enabled: bool,
    pub visible: bool,
}

#[derive(Default)]
struct Inner {
    calls: Vec<BridgeCall>,
    button: ButtonState,
    handler: Option<ConfirmHandler>,
}

/// 记录型桥接
#[derive(Default)]
pub struct RecordingBridge {
    inner: Mutex<Inner>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: BridgeCall) {
        let mut inner = self.inner.lock();
        match &call {
            BridgeCall::SetButtonText(text) => inner.button.text = text.clone(),
            BridgeCall::EnableButton => inner.button.enabled = true,
            BridgeCall::DisableButton => inner.button.enabled = false,
            BridgeCall::ShowButton => inner.button.visible = true,
            BridgeCall::HideButton => inner.button.visible = false,
            _ => {}
        }
        inner.calls.push(call);
    }

    /// 模拟用户点击主按钮；按钮不可用或没有订阅者时返回 false
    pub fn press_confirm(&self) -> bool {
        let handler = {
            let inner = self.inner.lock();
            if !(inner.button.enabled && inner.button.visible) {
                return false;
            }
            inner.handler.clone()
        };

        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.inner.lock().calls.clone()
    }

    pub fn button(&self) -> ButtonState {
        self.inner.lock().button.clone()
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::SendMessage(json) => Some(json.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::ShowAlert(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().calls.contains(&BridgeCall::CloseView)
    }
}

impl HostBridge for RecordingBridge {
    fn set_button_text(&self, text: &str) {
        self.record(BridgeCall::SetButtonText(text.to_string()));
    }

    fn enable_button(&self) {
        self.record(BridgeCall::EnableButton);
    }

    fn disable_button(&self) {
        self.record(BridgeCall::DisableButton);
    }

    fn show_button(&self) {
        self.record(BridgeCall::ShowButton);
    }

    fn hide_button(&self) {
        self.record(BridgeCall::HideButton);
    }

    fn on_confirm(&self, handler: ConfirmHandler) {
        let mut inner = self.inner.lock();
        inner.handler = Some(handler);
        inner.calls.push(BridgeCall::OnConfirm);
    }

    fn send_message(&self, json: &str) {
        self.record(BridgeCall::SendMessage(json.to_string()));
    }

    fn close_view(&self) {
        self.record(BridgeCall::CloseView);
    }

    fn show_alert(&self, text: &str) {
        self.record(BridgeCall::ShowAlert(text.to_string()));
    }
}
