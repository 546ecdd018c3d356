//! Attendance use cases.

mod mark_attendance;

pub use mark_attendance::{MarkAttendance, MarkAttendanceError, MarkAttendanceOutcome};
