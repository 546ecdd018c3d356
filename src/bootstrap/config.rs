//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into AppConfig DTO / 将 TOML 解析为 AppConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No policy validation / 禁止策略验证**: range checks belong to
//! `AttendanceGeofenceRule::try_from`, which runs during wiring.

use anyhow::Context;
use std::path::{Path, PathBuf};

use ch_core::config::AppConfig;
use ch_infra::fs::app_data_dir::app_data_dir;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read, is not valid TOML, or holds a
/// value of the wrong type.
/// 文件无法读取、不是有效 TOML 或值类型错误时返回错误。
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid config file: {}", config_path.display()))
}

/// Where a loaded [`AppConfig`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

/// Like [`load_config`], but a missing file yields the default policy.
/// 配置文件不存在时使用默认策略。
///
/// Nothing is logged here since this runs before the tracing subscriber
/// exists; callers log the returned [`ConfigSource`] once it does.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<(AppConfig, ConfigSource)> {
    if !config_path.exists() {
        return Ok((AppConfig::with_data_dir(PathBuf::new()), ConfigSource::Defaults));
    }
    Ok((load_config(config_path)?, ConfigSource::File))
}

/// `<app data dir>/config.toml`
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(app_data_dir()?.join(CONFIG_FILE_NAME))
}
