//! Geofence attendance evaluator.
//!
//! Pure decision function: the caller resolves the clock and the location fix
//! beforehand and passes them in.

use chrono::{DateTime, Duration, Utc};

use super::decision::{AttendanceClassification, AttendanceDecision, RejectReason};
use super::error::AttendanceError;
use super::geo::{haversine_km, round_km};
use super::meeting::{MeetingLocation, UserLocationReading};
use super::rule::AttendanceGeofenceRule;

pub struct GeofenceAttendanceEvaluator;

impl GeofenceAttendanceEvaluator {
    /// Decide whether `reading` may mark attendance for `meeting` at `now`.
    ///
    /// Order of checks: coordinates, freshness of the fix, distance, then
    /// classification against the meeting start.
    pub fn evaluate(
        meeting: &MeetingLocation,
        reading: &UserLocationReading,
        rule: &AttendanceGeofenceRule,
        now: DateTime<Utc>,
    ) -> Result<AttendanceDecision, AttendanceError> {
        let meeting_point = meeting.point();
        let reading_point = reading.point();
        meeting_point.validate()?;
        reading_point.validate()?;

        let distance_km = round_km(haversine_km(meeting_point, reading_point));

        let age = (now - reading.captured_at).abs();
        if age > rule.max_reading_age() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                age_secs = age.num_seconds(),
                max_age_minutes = rule.max_reading_age_minutes(),
                "attendance rejected: stale location"
            );
            return Ok(AttendanceDecision::rejected(
                distance_km,
                RejectReason::StaleLocation,
            ));
        }

        if distance_km > rule.max_distance_km() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                distance_km,
                max_distance_km = rule.max_distance_km(),
                "attendance rejected: too far"
            );
            return Ok(AttendanceDecision::rejected(distance_km, RejectReason::TooFar));
        }

        let classification = Self::classify(now - meeting.start_time, rule);
        Ok(AttendanceDecision::allowed(distance_km, classification))
    }

    /// Classify `delta = now - start_time`.
    pub fn classify(delta: Duration, rule: &AttendanceGeofenceRule) -> AttendanceClassification {
        if delta < Duration::zero() {
            AttendanceClassification::Early
        } else if delta <= rule.late_threshold() {
            AttendanceClassification::OnTime
        } else {
            AttendanceClassification::Late
        }
    }
}
