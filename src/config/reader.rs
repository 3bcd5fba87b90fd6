/*!
 * TOML配置读取器
 *
 * 负责从文件系统读取和解析TOML配置文件
 */

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::config::{
    create_default_config, ConfigError, ConfigResult, MiniAppConfig, APP_DIR_NAME,
    CONFIG_FILE_NAME,
};

/// TOML配置读取器
#[derive(Debug, Clone)]
pub struct ConfigReader {
    config_path: PathBuf,
}

impl ConfigReader {
    /// 使用平台默认路径：`<config_dir>/miniapp/config.toml`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_path(
            config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME),
        ))
    }

    /// 使用指定的配置文件路径
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// 加载配置；文件不存在时返回默认配置
    pub async fn load_config(&self) -> ConfigResult<MiniAppConfig> {
        debug!("开始加载TOML配置: {:?}", self.config_path);

        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            info!("配置文件不存在，使用默认配置");
            return Ok(create_default_config());
        }

        let content =
            fs::read_to_string(&self.config_path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: self.config_path.clone(),
                    source,
                })?;

        let config = self.parse_toml_content(&content)?;
        info!("配置文件解析成功");
        Ok(config)
    }

    /// 解析TOML内容为配置结构
    pub fn parse_toml_content(&self, content: &str) -> ConfigResult<MiniAppConfig> {
        toml::from_str::<MiniAppConfig>(content).map_err(|source| ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        })
    }

    /// 获取配置文件路径
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}
