//! Default policy values used when the configuration file omits a key.
//! 配置文件缺省时使用的默认策略值。

/// Maximum distance from the meeting venue, in kilometres.
pub const MAX_DISTANCE_KM: f64 = 0.5;

/// How long before the start a member may already check in.
pub const EARLY_WINDOW_MINUTES: i64 = 15;

/// Minutes after the start that still count as on time.
pub const LATE_THRESHOLD_MINUTES: i64 = 15;

/// Oldest location fix accepted for an attendance attempt.
pub const MAX_READING_AGE_MINUTES: i64 = 5;

/// Upper bound for any attendance window or reading age (one year).
pub const MAX_WINDOW_MINUTES: i64 = 365 * 24 * 60;

/// OTP resend cooldown.
pub const RESEND_COOLDOWN_SECS: u32 = 30;

/// Default data directory name under the platform data dir.
pub const DATA_DIR_NAME: &str = "communityhub";
