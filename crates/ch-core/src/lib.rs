//! # ch-core
//!
//! Core domain models and business rules for CommunityHub.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the attendance geofence decision, the registration wizard state machine,
//! membership applications and the ports the outer layers implement.

// Public module exports
pub mod attendance;
pub mod config;
pub mod ids;
pub mod ports;
pub mod registration;

// Re-export commonly used types at the crate root
pub use attendance::{
    AttendanceClassification, AttendanceDecision, AttendanceGeofenceRule,
    GeofenceAttendanceEvaluator, MeetingLocation, UserLocationReading,
};
pub use config::AppConfig;
pub use ids::{ApplicationId, MeetingId, MemberId};
pub use registration::{
    RegistrationWizardController, RegistrationWizardState, WizardAction, WizardEvent, WizardStep,
};
