/*!
 * 消息构建
 *
 * 把表单快照和页面上下文规范化为一条扁平的出站消息。
 * 两个构建函数都是纯函数，不会失败。
 */

pub mod auth;
pub mod download;

pub use auth::build_auth_message;
pub use download::{build_download_message, parse_int};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::PageContext;
use crate::form::{FormSnapshot, AUTH_FORM_ID, DOWNLOAD_FORM_ID};
use crate::message::OutboundMessage;

/// 小程序类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiniAppKind {
    Auth,
    Download,
}

impl MiniAppKind {
    /// 构建该类型的出站消息
    pub fn build(&self, form: &FormSnapshot, ctx: &PageContext) -> OutboundMessage {
        match self {
            MiniAppKind::Auth => build_auth_message(form, ctx),
            MiniAppKind::Download => build_download_message(form, ctx),
        }
    }

    /// 页面表单元素 id
    pub fn form_id(&self) -> &'static str {
        match self {
            MiniAppKind::Auth => AUTH_FORM_ID,
            MiniAppKind::Download => DOWNLOAD_FORM_ID,
        }
    }

    /// 按钮文案的 i18n 键
    pub fn button_text_key(&self) -> &'static str {
        match self {
            MiniAppKind::Auth => "button.auth",
            MiniAppKind::Download => "button.download",
        }
    }
}

impl fmt::Display for MiniAppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiniAppKind::Auth => f.write_str("auth"),
            MiniAppKind::Download => f.write_str("download"),
        }
    }
}
