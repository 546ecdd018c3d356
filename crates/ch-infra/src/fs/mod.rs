pub mod app_data_dir;
pub mod application_repo;
pub mod attendance_repo;
pub mod json_store;

pub use application_repo::FileApplicationRepository;
pub use attendance_repo::FileAttendanceRepository;
