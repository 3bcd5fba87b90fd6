use tracing::warn;

use crate::context::PageContext;
use crate::form::FormSnapshot;
use crate::message::{MessageAction, MessageValue, OutboundMessage};

/// 从上下文原样复制的键，按输出顺序排列
pub const CONTEXT_KEYS: [&str; 6] = ["link", "site", "user_id", "chat_id", "message_id", "host"];

/// 上下文中强制开启图片的键（只看是否存在）
pub const FORCE_IMAGES_KEY: &str = "force_images";

/// 构建下载消息
///
/// 规则按顺序执行：
/// 1. `start` / `end` 按十进制解析为整数，失败时透传 NaN 哨兵；
/// 2. `format` / `auth` 原样复制；
/// 3. `images` / `cover` 只要字段存在（包括空串）即为 true；
/// 4. 上下文含 `force_images` 键时 `images = true`。
///
/// 未出现的字段直接省略。
pub fn build_download_message(form: &FormSnapshot, ctx: &PageContext) -> OutboundMessage {
    let mut message = OutboundMessage::new(MessageAction::WebAppDownload);

    for key in CONTEXT_KEYS {
        match ctx.get(key).and_then(MessageValue::from_context) {
            Some(value) => message.insert(key, value),
            None => warn!("download context key `{}` missing or not a primitive", key),
        }
    }

    for key in ["start", "end"] {
        if let Some(raw) = form.get(key) {
            let value = parse_int(raw);
            if value.is_not_a_number() {
                warn!("download field `{}` is not an integer: {:?}", key, raw);
            }
            message.insert(key, value);
        }
    }

    for key in ["format", "auth"] {
        if let Some(raw) = form.get(key) {
            message.insert(key, raw);
        }
    }

    for key in ["images", "cover"] {
        if form.contains(key) {
            message.insert(key, true);
        }
    }

    if ctx.contains_key(FORCE_IMAGES_KEY) {
        message.insert("images", true);
    }

    message
}

/// 按页面 `parseInt(value)` 的十进制语义解析
///
/// 跳过前导空白（含 U+FEFF），可选正负号，然后取最长的数字前缀；
/// 没有数字或超出 i64 范围时返回 NaN 哨兵。
pub fn parse_int(raw: &str) -> MessageValue {
    let trimmed = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return MessageValue::NotANumber;
    }

    let digits = &rest[..digits_len];
    let parsed = if negative {
        format!("-{}", digits).parse::<i64>()
    } else {
        digits.parse::<i64>()
    };

    parsed.map_or(MessageValue::NotANumber, MessageValue::Int)
}
