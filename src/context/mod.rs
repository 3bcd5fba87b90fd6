/*!
 * 页面注入的上下文
 *
 * 机器人打开小程序页面时注入的只读配置对象（`payload`）。
 * 这里把它建模为显式构造的值，由入口传入运行时，而不是全局状态。
 */

pub mod error;

pub use error::{ContextError, ContextResult};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// 页面 URL 上携带上下文的查询参数名
pub const PAYLOAD_QUERY_PARAM: &str = "payload";

/// 页面上下文
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageContext {
    values: Map<String, Value>,
}

impl PageContext {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// 从 JSON 文本解析，顶层必须是对象
    pub fn from_json(text: &str) -> ContextResult<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ContextError::NotAnObject(json_kind(&other))),
        }
    }

    /// 从页面 URL 的 `payload` 查询参数解析（已做百分号解码）
    pub fn from_page_url(page_url: &str) -> ContextResult<Self> {
        let url = Url::parse(page_url)?;
        let payload = url
            .query_pairs()
            .find(|(key, _)| key == PAYLOAD_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .ok_or(ContextError::MissingPayload)?;

        Self::from_json(&payload)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// 按键存在与否判断，不看取值
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn i64_value(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for PageContext {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
