pub mod fs;
pub mod ticker;
pub mod time;

pub use fs::{FileApplicationRepository, FileAttendanceRepository};
pub use ticker::IntervalResendTicker;
pub use time::SystemClock;
