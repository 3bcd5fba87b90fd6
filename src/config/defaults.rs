/*!
 * 配置系统默认值
 */

use crate::config::types::*;
use crate::config::CONFIG_VERSION;

/// 创建默认配置
pub fn create_default_config() -> MiniAppConfig {
    MiniAppConfig {
        version: CONFIG_VERSION.to_string(),
        app: AppSection::default(),
        http: HttpSection::default(),
        runtime: RuntimeSection::default(),
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            language: "ru-RU".to_string(),
        }
    }
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            user_agent: format!("miniapp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self { submit_guard: true }
    }
}

impl Default for MiniAppConfig {
    fn default() -> Self {
        create_default_config()
    }
}
