//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! device services, the OTP provider and storage.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port to `ch-core/ports`, ask yourself three questions:
//!
//! 1. **Does this port represent a business capability?**
//! 2. **Will it be depended upon by multiple use cases or domains?**
//! 3. **Is it implemented by the infrastructure or platform layer?**
//!
//! If all three answers are **yes**, place it in `ch-core/ports`.
//! Otherwise, place it in the relevant `domain` submodule.

mod application_repository;
mod attendance_repository;
mod clock;
mod location;
mod otp;
mod selfie;
mod ticker;

pub use application_repository::ApplicationRepositoryPort;
pub use attendance_repository::AttendanceRepositoryPort;
pub use clock::ClockPort;
pub use location::LocationPort;
pub use otp::OtpServicePort;
pub use selfie::SelfieCapturePort;
pub use ticker::{ResendTick, ResendTickerPort};
