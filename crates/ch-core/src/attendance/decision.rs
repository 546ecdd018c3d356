use serde::{Deserialize, Serialize};

/// How an allowed attendance relates to the meeting start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceClassification {
    Early,
    OnTime,
    Late,
}

/// Why an attendance attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooFar,
    StaleLocation,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooFar => "too_far",
            RejectReason::StaleLocation => "stale_location",
        }
    }
}

/// Outcome of a geofence evaluation, consumed read-only by the confirmation UI.
///
/// `classification` is set exactly when `allowed` is true; `reason` exactly
/// when it is false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDecision {
    pub allowed: bool,
    pub distance_km: f64,
    pub classification: Option<AttendanceClassification>,
    pub reason: Option<RejectReason>,
}

impl AttendanceDecision {
    pub(crate) fn allowed(distance_km: f64, classification: AttendanceClassification) -> Self {
        Self {
            allowed: true,
            distance_km,
            classification: Some(classification),
            reason: None,
        }
    }

    pub(crate) fn rejected(distance_km: f64, reason: RejectReason) -> Self {
        Self {
            allowed: false,
            distance_km,
            classification: None,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_names() {
        let decision = AttendanceDecision::allowed(0.25, AttendanceClassification::OnTime);
        let json = serde_json::to_value(decision).unwrap();
        assert_eq!(json["classification"], "on_time");
        assert!(json["reason"].is_null());

        let decision = AttendanceDecision::rejected(3.0, RejectReason::StaleLocation);
        let json = serde_json::to_value(decision).unwrap();
        assert_eq!(json["reason"], "stale_location");
        assert!(json["classification"].is_null());
    }
}
