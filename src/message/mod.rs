/*!
 * 出站消息
 *
 * 发给机器人后端的扁平消息对象。键按插入顺序保存，
 * 相同输入总是序列化为逐字节相同的 JSON。
 */

pub mod value;

pub use value::MessageValue;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// 消息类型鉴别字段
pub const ACTION_KEY: &str = "action";
pub const SITE_KEY: &str = "site";

/// 消息动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    WebAppAuth,
    WebAppDownload,
}

impl MessageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageAction::WebAppAuth => "web_app_auth",
            MessageAction::WebAppDownload => "web_app_download",
        }
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 出站消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    action: MessageAction,
    entries: Vec<(String, MessageValue)>,
}

impl OutboundMessage {
    /// 创建只含 `action` 的消息
    pub fn new(action: MessageAction) -> Self {
        Self {
            action,
            entries: vec![(ACTION_KEY.to_string(), MessageValue::from(action.as_str()))],
        }
    }

    pub fn action(&self) -> MessageAction {
        self.action
    }

    /// 写入一个键；已存在时原位覆盖，保持首次出现的位置
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MessageValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MessageValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 序列化为紧凑 JSON 文本
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for OutboundMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
