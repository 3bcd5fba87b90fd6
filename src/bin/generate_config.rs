//! 配置文件生成工具

use miniapp_lib::config::{create_default_config, APP_DIR_NAME, CONFIG_FILE_NAME};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default_config = create_default_config();

    // 序列化为TOML
    let toml_content = toml::to_string_pretty(&default_config)?;

    println!("=== 默认配置文件内容 ===");
    println!("{}", toml_content);

    let config_dir = dirs::config_dir()
        .ok_or("无法获取配置目录")?
        .join(APP_DIR_NAME);
    tokio::fs::create_dir_all(&config_dir).await?;

    let config_path = config_dir.join(CONFIG_FILE_NAME);
    if tokio::fs::try_exists(&config_path).await? {
        println!("\n=== 配置文件已存在，未覆盖: {:?} ===", config_path);
        return Ok(());
    }

    tokio::fs::write(&config_path, toml_content).await?;
    println!("\n=== 配置文件已保存到: {:?} ===", config_path);

    Ok(())
}
