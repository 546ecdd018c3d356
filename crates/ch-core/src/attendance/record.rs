use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::AttendanceClassification;
use crate::ids::{MeetingId, MemberId};

/// Reference to a confirmation selfie held by the camera/image pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfieRef {
    /// Opaque locator understood by the image store (path, URL or key).
    pub uri: String,
    pub captured_at: DateTime<Utc>,
}

/// A persisted, confirmed attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub meeting_id: MeetingId,
    pub member_id: MemberId,
    pub classification: AttendanceClassification,
    pub distance_km: f64,
    pub marked_at: DateTime<Utc>,
    pub selfie: SelfieRef,
}
