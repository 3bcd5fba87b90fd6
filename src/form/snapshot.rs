//! 表单快照与实时表单状态

use url::form_urlencoded;

/// 提交时刻从表单读取的字段序列
///
/// 字段名不受模式约束；同名字段允许重复，按名取值时以最后一个为准。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    fields: Vec<(String, String)>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 解析 `application/x-www-form-urlencoded` 编码的表单
    pub fn from_urlencoded(encoded: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(encoded.as_bytes()).into_owned())
    }

    /// 按名取值，同名时取最后一个
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// 运行时持有的实时表单
///
/// 对应页面上的 `<form>`：未勾选的复选框不出现在表单数据里，
/// 因此 `set(name, None)` 表示移除字段。
#[derive(Debug, Clone, Default)]
pub struct FormState {
    fields: Vec<(String, String)>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut state = Self::new();
        for (name, value) in fields {
            state.set(name, Some(value.into()));
        }
        state
    }

    /// 更新字段；None 移除字段，已有字段原位更新
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        let position = self.fields.iter().position(|(k, _)| *k == name);

        match (position, value) {
            (Some(index), Some(value)) => self.fields[index].1 = value,
            (Some(index), None) => {
                self.fields.remove(index);
            }
            (None, Some(value)) => self.fields.push((name, value)),
            (None, None) => {}
        }
    }

    /// 字段当前值，缺失字段视为空字符串
    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// 物化一次提交用的快照
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            fields: self.fields.clone(),
        }
    }
}
