use crate::utils::language::Language;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

type I18nMessages = HashMap<Language, HashMap<String, Value>>;

/// 语言包在首次访问时解析，解析失败的语言包记为空
static I18N_MESSAGES: LazyLock<I18nMessages> = LazyLock::new(|| {
    Language::all()
        .into_iter()
        .map(|lang| {
            let messages = I18nManager::load_language_pack(lang).unwrap_or_else(|e| {
                tracing::error!("{}", e);
                HashMap::new()
            });
            (lang, messages)
        })
        .collect()
});

/// 国际化管理器
pub struct I18nManager;

impl I18nManager {
    /// 解析指定语言包
    fn load_language_pack(language: Language) -> Result<HashMap<String, Value>, String> {
        let json_content = Self::language_file(language);
        serde_json::from_str(json_content)
            .map_err(|e| format!("Failed to parse language file {}: {}", language, e))
    }

    fn language_file(language: Language) -> &'static str {
        match language {
            Language::RuRU => include_str!("i18n/ru-RU.json"),
            Language::EnUS => include_str!("i18n/en-US.json"),
        }
    }

    /// 获取指定语言的文本
    ///
    /// # Arguments
    /// * `key` - 消息键，支持嵌套格式如 "button.download"
    /// * `params` - 可选的参数映射，用于 `{name}` 插值
    ///
    /// # Returns
    /// 找不到时先回退到默认语言，再回退到键本身
    pub fn get_text_in(
        language: Language,
        key: &str,
        params: Option<&HashMap<String, String>>,
    ) -> String {
        let text = Self::get_text_for_language(language, key)
            .or_else(|| Self::get_text_for_language(Language::default(), key));

        match text {
            Some(text) => Self::interpolate_params(&text, params),
            None => key.to_string(),
        }
    }

    fn get_text_for_language(language: Language, key: &str) -> Option<String> {
        let messages = I18N_MESSAGES.get(&language)?;
        Self::get_nested_value(messages, key)
    }

    /// 从嵌套结构中获取值
    fn get_nested_value(messages: &HashMap<String, Value>, key: &str) -> Option<String> {
        let mut parts = key.split('.');
        let mut current = messages.get(parts.next()?)?;

        for part in parts {
            current = current.as_object()?.get(part)?;
        }

        match current {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// 将 {param_name} 格式的占位符替换为实际参数值
    fn interpolate_params(text: &str, params: Option<&HashMap<String, String>>) -> String {
        match params {
            Some(params) => params.iter().fold(text.to_string(), |acc, (key, value)| {
                acc.replace(&format!("{{{}}}", key), value)
            }),
            None => text.to_string(),
        }
    }
}

/// 便捷的国际化宏
///
/// 语言总是显式传入，由调用方的运行时选项决定：
/// - `t!(in lang, "button.download")` - 简单文本
/// - `t!(in lang, "alert.dispatch_failed", "status" => 500)` - 带参数的文本
#[macro_export]
macro_rules! t {
    (in $lang:expr, $key:expr) => {
        $crate::utils::i18n::I18nManager::get_text_in($lang, $key, None)
    };

    (in $lang:expr, $key:expr, $($param_key:expr => $param_value:expr),+ $(,)?) => {{
        let mut params = std::collections::HashMap::new();
        $(
            params.insert($param_key.to_string(), $param_value.to_string());
        )+
        $crate::utils::i18n::I18nManager::get_text_in($lang, $key, Some(&params))
    }};
}
