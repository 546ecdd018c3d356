use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use ch_core::config::defaults::DATA_DIR_NAME;

/// Get the CommunityHub application data root directory.
///
/// 获取 CommunityHub 应用数据根目录。
///
/// # Platform-specific Paths / 平台特定路径
/// - macOS: ~/Library/Application Support/communityhub
/// - Windows: %APPDATA%\communityhub
/// - Linux: $XDG_DATA_HOME/communityhub or ~/.local/share/communityhub
///
/// This function does not create the directory.
/// 此函数不自动创建目录。
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir =
        get_platform_data_dir().context("Failed to get platform-specific data directory")?;

    Ok(base_dir.join(DATA_DIR_NAME))
}

/// Use `configured` unless it is empty, otherwise the platform default.
pub fn resolve_data_dir(configured: &Path) -> Result<PathBuf> {
    if configured.as_os_str().is_empty() {
        app_data_dir()
    } else {
        Ok(configured.to_path_buf())
    }
}

fn get_platform_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        // 优先使用 XDG_DATA_HOME
        if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg_data_home));
        }
    }

    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Unable to get platform data directory"))
}
