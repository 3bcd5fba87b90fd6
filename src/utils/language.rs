/*!
 * 语言管理模块
 *
 * 小程序界面文案的语言设置。机器人面向俄语用户，默认语言为 ru-RU。
 */

use serde::{Deserialize, Serialize};

/// 支持的语言类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// 俄语
    #[default]
    RuRU,
    /// 美式英文
    EnUS,
}

impl Language {
    /// 从字符串解析语言类型，无法识别时回退到默认语言
    ///
    /// # Arguments
    /// * `s` - 语言字符串，如 "ru-RU", "en"
    pub fn from_tag_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ru-ru" | "ru" | "russian" => Language::RuRU,
            "en-us" | "en" | "english" => Language::EnUS,
            _ => Language::default(),
        }
    }

    /// 获取语言标识（BCP-47 tag）
    pub fn tag(&self) -> &'static str {
        match self {
            Language::RuRU => "ru-RU",
            Language::EnUS => "en-US",
        }
    }

    /// 获取所有支持的语言
    pub fn all() -> Vec<Language> {
        vec![Language::RuRU, Language::EnUS]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
