//! CommunityHub Application Orchestration Layer
//!
//! This crate contains the use cases that drive the core state machines and
//! run their side effects through ports.

pub mod deps;
pub mod usecases;

pub use deps::AppDeps;
pub use usecases::{
    MarkAttendance, MarkAttendanceError, MarkAttendanceOutcome, RegistrationOrchestrator,
    RegistrationFlowError, RegistrationView, ReviewApplication, ReviewApplicationError, SubmitApplication,
    SubmitApplicationError,
};
