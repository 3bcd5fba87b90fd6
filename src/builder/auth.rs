use tracing::warn;

use crate::context::PageContext;
use crate::form::FormSnapshot;
use crate::message::{MessageAction, MessageValue, OutboundMessage, ACTION_KEY, SITE_KEY};

/// 构建认证消息
///
/// `action` 与 `site` 之后按表单顺序原样并入所有字段（字符串值，不做转换）。
/// 上下文缺少 `site` 时该键被省略。同名字段以最后一个值为准。
pub fn build_auth_message(form: &FormSnapshot, ctx: &PageContext) -> OutboundMessage {
    let mut message = OutboundMessage::new(MessageAction::WebAppAuth);

    if let Some(site) = ctx.get(SITE_KEY).and_then(MessageValue::from_context) {
        message.insert(SITE_KEY, site);
    }

    for (name, value) in form.iter() {
        // 信封字段不被表单覆盖
        if name == ACTION_KEY || name == SITE_KEY {
            warn!("auth form field `{}` ignored: reserved message key", name);
            continue;
        }
        message.insert(name, value);
    }

    message
}
