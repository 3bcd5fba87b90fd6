//! 命令行桥接：消息写到 stdout，提示框写到 stderr

use parking_lot::Mutex;
use std::io::Write;
use tracing::{debug, info, warn};

use super::{ConfirmHandler, HostBridge};

#[derive(Default)]
pub struct ConsoleBridge {
    handler: Mutex<Option<ConfirmHandler>>,
}

impl ConsoleBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发确认回调，相当于用户点击主按钮
    pub fn confirm(&self) -> bool {
        let handler = self.handler.lock().clone();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => {
                warn!("confirm requested but no handler is registered");
                false
            }
        }
    }
}

impl HostBridge for ConsoleBridge {
    fn set_button_text(&self, text: &str) {
        debug!("main button text: {}", text);
    }

    fn enable_button(&self) {
        debug!("main button enabled");
    }

    fn disable_button(&self) {
        debug!("main button disabled");
    }

    fn show_button(&self) {
        debug!("main button shown");
    }

    fn hide_button(&self) {
        debug!("main button hidden");
    }

    fn on_confirm(&self, handler: ConfirmHandler) {
        *self.handler.lock() = Some(handler);
    }

    fn send_message(&self, json: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            warn!("failed to write message to stdout: {}", e);
        }
    }

    fn close_view(&self) {
        info!("mini app view closed");
    }

    fn show_alert(&self, text: &str) {
        eprintln!("{}", text);
    }
}
