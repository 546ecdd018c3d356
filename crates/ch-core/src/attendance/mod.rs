//! Attendance domain module.
//!
//! Geofenced check-in: whether a member standing at a given spot, at a given
//! moment, may mark attendance for a meeting, and how that attendance is
//! classified.

pub mod decision;
pub mod error;
pub mod evaluator;
pub mod geo;
pub mod meeting;
pub mod record;
pub mod rule;

pub use decision::{AttendanceClassification, AttendanceDecision, RejectReason};
pub use error::{AttendanceError, RuleError};
pub use evaluator::GeofenceAttendanceEvaluator;
pub use geo::{haversine_km, GeoPoint, EARTH_RADIUS_KM};
pub use meeting::{Meeting, MeetingLocation, UserLocationReading};
pub use record::{AttendanceRecord, SelfieRef};
pub use rule::AttendanceGeofenceRule;
