/*!
 * TOML 配置读取测试
 */

use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;

use miniapp_lib::config::{create_default_config, ConfigError, ConfigReader, CONFIG_FILE_NAME};
use miniapp_lib::utils::Language;

#[tokio::test]
async fn test_missing_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let reader = ConfigReader::with_path(temp_dir.path().join(CONFIG_FILE_NAME));

    let config = reader.load_config().await.unwrap();
    assert_eq!(config, create_default_config());
}

#[tokio::test]
async fn test_load_full_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        r#"
version = "1.0.0"

[app]
language = "en-US"

[http]
timeout_ms = 1500
user_agent = "download-bot/2"

[runtime]
submit_guard = false
"#,
    )
    .await
    .unwrap();

    let config = ConfigReader::with_path(&path).load_config().await.unwrap();
    assert_eq!(config.language(), Language::EnUS);
    assert!(!config.runtime.submit_guard);

    let http = config.http_options();
    assert_eq!(http.timeout, Some(Duration::from_millis(1500)));
    assert_eq!(http.user_agent.as_deref(), Some("download-bot/2"));
}

#[tokio::test]
async fn test_sections_are_optional() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[app]\nlanguage = \"fr-FR\"\n").await.unwrap();

    let config = ConfigReader::with_path(&path).load_config().await.unwrap();
    assert_eq!(config.version, "1.0.0");
    // 不支持的语言回退到默认语言
    assert_eq!(config.language(), Language::RuRU);
    assert!(config.runtime.submit_guard);
    assert_eq!(config.http.timeout_ms, None);
}

#[tokio::test]
async fn test_invalid_toml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[http\ntimeout_ms = ").await.unwrap();

    let err = ConfigReader::with_path(&path).load_config().await.unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[tokio::test]
async fn test_default_config_round_trips_through_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&create_default_config()).unwrap();
    fs::write(&path, content).await.unwrap();

    let config = ConfigReader::with_path(&path).load_config().await.unwrap();
    assert_eq!(config, create_default_config());
}
