/*!
 * 配置类型定义
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::dispatch::HttpOptions;
use crate::utils::Language;

/// 小程序配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniAppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub runtime: RuntimeSection,
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// 界面语言，如 "ru-RU"、"en-US"
    pub language: String,
}

/// HTTP 投递配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// 请求超时（毫秒），缺省不设超时
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    pub user_agent: String,
}

/// 运行时配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    /// 请求进行中禁用确认按钮
    pub submit_guard: bool,
}

fn default_version() -> String {
    crate::config::CONFIG_VERSION.to_string()
}

impl MiniAppConfig {
    pub fn language(&self) -> Language {
        Language::from_tag_lossy(&self.app.language)
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            timeout: self.http.timeout_ms.map(Duration::from_millis),
            user_agent: Some(self.http.user_agent.clone()),
        }
    }
}
