//! Geofence policy.

use chrono::Duration;
use serde::Serialize;

use super::error::RuleError;
use crate::config::{defaults, AttendanceConfig};

/// Thresholds an attendance attempt is judged against.
///
/// Constructed through [`AttendanceGeofenceRule::new`] so the invariants
/// (positive distance, non-negative windows, positive reading age, nothing
/// longer than [`defaults::MAX_WINDOW_MINUTES`]) always hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttendanceGeofenceRule {
    max_distance_km: f64,
    early_window_minutes: i64,
    late_threshold_minutes: i64,
    max_reading_age_minutes: i64,
}

impl AttendanceGeofenceRule {
    pub fn new(
        max_distance_km: f64,
        early_window_minutes: i64,
        late_threshold_minutes: i64,
    ) -> Result<Self, RuleError> {
        Self::with_reading_age(
            max_distance_km,
            early_window_minutes,
            late_threshold_minutes,
            defaults::MAX_READING_AGE_MINUTES,
        )
    }

    pub fn with_reading_age(
        max_distance_km: f64,
        early_window_minutes: i64,
        late_threshold_minutes: i64,
        max_reading_age_minutes: i64,
    ) -> Result<Self, RuleError> {
        if !(max_distance_km.is_finite() && max_distance_km > 0.0) {
            return Err(RuleError::NonPositiveDistance(max_distance_km));
        }
        if early_window_minutes < 0 {
            return Err(RuleError::NegativeMinutes {
                field: "early_window_minutes",
                value: early_window_minutes,
            });
        }
        if late_threshold_minutes < 0 {
            return Err(RuleError::NegativeMinutes {
                field: "late_threshold_minutes",
                value: late_threshold_minutes,
            });
        }
        if max_reading_age_minutes <= 0 {
            return Err(RuleError::NonPositiveReadingAge(max_reading_age_minutes));
        }
        for (field, value) in [
            ("early_window_minutes", early_window_minutes),
            ("late_threshold_minutes", late_threshold_minutes),
            ("max_reading_age_minutes", max_reading_age_minutes),
        ] {
            if value > defaults::MAX_WINDOW_MINUTES {
                return Err(RuleError::WindowTooLong {
                    field,
                    value,
                    max: defaults::MAX_WINDOW_MINUTES,
                });
            }
        }
        Ok(Self {
            max_distance_km,
            early_window_minutes,
            late_threshold_minutes,
            max_reading_age_minutes,
        })
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    pub fn early_window_minutes(&self) -> i64 {
        self.early_window_minutes
    }

    pub fn late_threshold_minutes(&self) -> i64 {
        self.late_threshold_minutes
    }

    pub fn max_reading_age_minutes(&self) -> i64 {
        self.max_reading_age_minutes
    }

    pub fn early_window(&self) -> Duration {
        Duration::minutes(self.early_window_minutes)
    }

    pub fn late_threshold(&self) -> Duration {
        Duration::minutes(self.late_threshold_minutes)
    }

    pub fn max_reading_age(&self) -> Duration {
        Duration::minutes(self.max_reading_age_minutes)
    }
}

impl Default for AttendanceGeofenceRule {
    fn default() -> Self {
        Self {
            max_distance_km: defaults::MAX_DISTANCE_KM,
            early_window_minutes: defaults::EARLY_WINDOW_MINUTES,
            late_threshold_minutes: defaults::LATE_THRESHOLD_MINUTES,
            max_reading_age_minutes: defaults::MAX_READING_AGE_MINUTES,
        }
    }
}

impl TryFrom<&AttendanceConfig> for AttendanceGeofenceRule {
    type Error = RuleError;

    fn try_from(config: &AttendanceConfig) -> Result<Self, Self::Error> {
        Self::with_reading_age(
            config.max_distance_km,
            config.early_window_minutes,
            config.late_threshold_minutes,
            config.max_reading_age_minutes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative_distance() {
        assert_eq!(
            AttendanceGeofenceRule::new(0.0, 0, 0),
            Err(RuleError::NonPositiveDistance(0.0))
        );
        assert!(AttendanceGeofenceRule::new(-1.0, 0, 0).is_err());
        assert!(AttendanceGeofenceRule::new(f64::INFINITY, 0, 0).is_err());
    }

    #[test]
    fn rejects_negative_windows() {
        assert!(matches!(
            AttendanceGeofenceRule::new(0.5, -1, 15),
            Err(RuleError::NegativeMinutes {
                field: "early_window_minutes",
                ..
            })
        ));
        assert!(matches!(
            AttendanceGeofenceRule::new(0.5, 10, -1),
            Err(RuleError::NegativeMinutes {
                field: "late_threshold_minutes",
                ..
            })
        ));
    }

    #[test]
    fn zero_windows_are_allowed() {
        let rule = AttendanceGeofenceRule::new(0.5, 0, 0).unwrap();
        assert_eq!(rule.early_window(), Duration::zero());
        assert_eq!(rule.late_threshold(), Duration::zero());
    }

    #[test]
    fn rejects_non_positive_reading_age() {
        assert_eq!(
            AttendanceGeofenceRule::with_reading_age(0.5, 0, 0, 0),
            Err(RuleError::NonPositiveReadingAge(0))
        );
    }

    #[test]
    fn rejects_windows_longer_than_a_year() {
        assert!(matches!(
            AttendanceGeofenceRule::new(0.5, 0, i64::MAX),
            Err(RuleError::WindowTooLong {
                field: "late_threshold_minutes",
                ..
            })
        ));
        assert!(matches!(
            AttendanceGeofenceRule::new(0.5, defaults::MAX_WINDOW_MINUTES + 1, 15),
            Err(RuleError::WindowTooLong {
                field: "early_window_minutes",
                ..
            })
        ));
        assert!(matches!(
            AttendanceGeofenceRule::with_reading_age(0.5, 15, 15, i64::MAX / 2),
            Err(RuleError::WindowTooLong {
                field: "max_reading_age_minutes",
                ..
            })
        ));
    }

    #[test]
    fn one_year_windows_are_usable() {
        let max = defaults::MAX_WINDOW_MINUTES;
        let rule = AttendanceGeofenceRule::with_reading_age(0.5, max, max, max).unwrap();
        assert_eq!(rule.late_threshold(), Duration::days(365));
        assert_eq!(rule.early_window(), Duration::days(365));
        assert_eq!(rule.max_reading_age(), Duration::days(365));
    }

    #[test]
    fn converts_from_config_section() {
        let config = AttendanceConfig {
            max_distance_km: 1.2,
            early_window_minutes: 20,
            late_threshold_minutes: 10,
            max_reading_age_minutes: 3,
        };
        let rule = AttendanceGeofenceRule::try_from(&config).unwrap();
        assert_eq!(rule.max_distance_km(), 1.2);
        assert_eq!(rule.early_window_minutes(), 20);
        assert_eq!(rule.late_threshold_minutes(), 10);
        assert_eq!(rule.max_reading_age(), Duration::minutes(3));
    }
}
