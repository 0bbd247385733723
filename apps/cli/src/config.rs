//! CLI 配置管理
//!
//! 配置存放在 `~/.config/ccpro/config.toml`，目前只有两项：
//! 默认设备序列号（多设备机器上区分目标）和默认日志指令。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

fn config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Cannot determine the user config directory")?;
    path.push("ccpro");
    fs::create_dir_all(&path).context("Failed to create the config directory")?;
    path.push("config.toml");
    Ok(path)
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CliConfig {
    /// 默认设备序列号（未设置时打开第一台匹配设备）
    pub serial: Option<String>,

    /// 默认日志指令（RUST_LOG 为空时使用）
    pub log: Option<String>,
}

impl CliConfig {
    /// 从默认路径加载；文件不存在时返回默认配置
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read the config file")?;
        toml::from_str(&content).context("Failed to parse the config file")
    }

    /// 保存到默认路径
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize the config")?;
        fs::write(path, content).context("Failed to write the config file")?;
        Ok(())
    }
}
