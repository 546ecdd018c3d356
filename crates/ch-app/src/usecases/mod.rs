//! Business use cases
//!
//! [Sign-up screen]            [Check-in button]          [Admin console]
//!        ↓                           ↓                          ↓
//! RegistrationOrchestrator     MarkAttendance            ReviewApplication
//!        ↓
//! SubmitApplication

pub mod applications;
pub mod attendance;
pub mod registration;

pub use applications::{
    ReviewApplication, ReviewApplicationError, SubmitApplication, SubmitApplicationError,
};
pub use attendance::{MarkAttendance, MarkAttendanceError, MarkAttendanceOutcome};
pub use registration::{RegistrationFlowError, RegistrationOrchestrator, RegistrationView};
