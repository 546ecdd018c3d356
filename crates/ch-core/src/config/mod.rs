//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business rules / 禁止业务规则**: range checks on the attendance
//! policy happen when it is turned into an
//! [`AttendanceGeofenceRule`](crate::attendance::AttendanceGeofenceRule).

pub mod defaults;

use std::path::PathBuf;

/// `[attendance]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceConfig {
    pub max_distance_km: f64,
    pub early_window_minutes: i64,
    pub late_threshold_minutes: i64,
    pub max_reading_age_minutes: i64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            max_distance_km: defaults::MAX_DISTANCE_KM,
            early_window_minutes: defaults::EARLY_WINDOW_MINUTES,
            late_threshold_minutes: defaults::LATE_THRESHOLD_MINUTES,
            max_reading_age_minutes: defaults::MAX_READING_AGE_MINUTES,
        }
    }
}

/// `[registration]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationConfig {
    pub resend_cooldown_secs: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_secs: defaults::RESEND_COOLDOWN_SECS,
        }
    }
}

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub attendance: AttendanceConfig,
    pub registration: RegistrationConfig,

    /// Directory holding the JSON stores. Empty means "let the caller decide".
    /// 数据目录；为空表示由调用方决定。
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// Missing keys fall back to [`defaults`]. Values of the wrong TOML type
    /// are reported as errors rather than silently replaced.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let attendance = toml_value.get("attendance");
        let registration = toml_value.get("registration");
        let storage = toml_value.get("storage");

        let resend_cooldown_secs = integer(registration, "resend_cooldown_secs")?
            .map(u32::try_from)
            .transpose()
            .map_err(|_| anyhow::anyhow!("registration.resend_cooldown_secs out of range"))?
            .unwrap_or(defaults::RESEND_COOLDOWN_SECS);

        Ok(Self {
            attendance: AttendanceConfig {
                max_distance_km: float(attendance, "max_distance_km")?
                    .unwrap_or(defaults::MAX_DISTANCE_KM),
                early_window_minutes: integer(attendance, "early_window_minutes")?
                    .unwrap_or(defaults::EARLY_WINDOW_MINUTES),
                late_threshold_minutes: integer(attendance, "late_threshold_minutes")?
                    .unwrap_or(defaults::LATE_THRESHOLD_MINUTES),
                max_reading_age_minutes: integer(attendance, "max_reading_age_minutes")?
                    .unwrap_or(defaults::MAX_READING_AGE_MINUTES),
            },
            registration: RegistrationConfig {
                resend_cooldown_secs,
            },
            data_dir: PathBuf::from(
                storage
                    .and_then(|s| s.get("data_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
        })
    }

    /// Create AppConfig with default policy and data under `data_dir`
    /// 使用默认策略并将数据放在 `data_dir` 下
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            attendance: AttendanceConfig::default(),
            registration: RegistrationConfig::default(),
            data_dir,
        }
    }
}

fn float(section: Option<&toml::Value>, key: &str) -> anyhow::Result<Option<f64>> {
    match section.and_then(|s| s.get(key)) {
        None => Ok(None),
        Some(toml::Value::Float(f)) => Ok(Some(*f)),
        Some(toml::Value::Integer(i)) => Ok(Some(*i as f64)),
        Some(other) => anyhow::bail!("{key}: expected a number, got {}", other.type_str()),
    }
}

fn integer(section: Option<&toml::Value>, key: &str) -> anyhow::Result<Option<i64>> {
    match section.and_then(|s| s.get(key)) {
        None => Ok(None),
        Some(toml::Value::Integer(i)) => Ok(Some(*i)),
        Some(other) => anyhow::bail!("{key}: expected an integer, got {}", other.type_str()),
    }
}
