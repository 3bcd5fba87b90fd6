/*!
 * 配置系统模块
 *
 * 基于 TOML 的小程序配置：界面语言、HTTP 投递选项与运行时开关。
 */

pub mod defaults;
pub mod error;
pub mod reader;
pub mod types;

pub use defaults::create_default_config;
pub use error::{ConfigError, ConfigResult};
pub use reader::ConfigReader;
pub use types::*;

/// 配置系统版本
pub const CONFIG_VERSION: &str = "1.0.0";

/// 应用配置目录名
pub const APP_DIR_NAME: &str = "miniapp";

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.toml";
