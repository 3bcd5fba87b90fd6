use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// 出站消息中的单个取值
///
/// 只允许扁平的原始值。`NotANumber` 是整数解析失败时透传的哨兵值，
/// 序列化为 JSON `null`，与页面 JSON 编码器对 NaN 的处理一致。
/// `Number` 保存无法用 i64 表示的上下文数值（超出范围的无符号数、小数），原样输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValue {
    Str(String),
    Int(i64),
    Number(Number),
    Bool(bool),
    NotANumber,
}

impl MessageValue {
    /// 从上下文的 JSON 值转换，非原始值（数组、对象、null）返回 None
    ///
    /// 数值按页面 `JSON.parse` 的结果保留：`2.0`、`1e3` 这类整值小数归一为整数。
    pub fn from_context(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::from_number(n)),
            _ => None,
        }
    }

    fn from_number(n: &Number) -> Self {
        if let Some(int) = n.as_i64() {
            return Self::Int(int);
        }
        match n.as_f64() {
            // i64::MAX as f64 == 2^63，上界不含
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Self::Int(f as i64)
            }
            _ => Self::Number(n.clone()),
        }
    }

    pub fn is_not_a_number(&self) -> bool {
        matches!(self, Self::NotANumber)
    }
}

impl Serialize for MessageValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Number(n) => n.serialize(serializer),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::NotANumber => serializer.serialize_unit(),
        }
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MessageValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for MessageValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for MessageValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
