use thiserror::Error;

/// Errors raised by the attendance evaluator.
///
/// Rejections such as "too far" or "stale location" are not errors; they are
/// carried by [`super::AttendanceDecision`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttendanceError {
    #[error("invalid input: {field} = {value} is outside [{min}, {max}]")]
    InvalidInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors raised when building an [`super::AttendanceGeofenceRule`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("max_distance_km must be a positive finite number, got {0}")]
    NonPositiveDistance(f64),

    #[error("{field} must not be negative, got {value}")]
    NegativeMinutes { field: &'static str, value: i64 },

    #[error("max_reading_age_minutes must be positive, got {0}")]
    NonPositiveReadingAge(i64),

    #[error("{field} must be at most {max} minutes, got {value}")]
    WindowTooLong {
        field: &'static str,
        value: i64,
        max: i64,
    },
}
