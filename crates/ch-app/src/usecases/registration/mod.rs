//! Registration flow use cases.

mod orchestrator;

pub use orchestrator::{RegistrationFlowError, RegistrationOrchestrator, RegistrationView};
