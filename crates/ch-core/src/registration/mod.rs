//! Registration domain module.
//!
//! The four-step sign-up wizard (personal info, business info, OTP,
//! pending approval) and the membership application it produces.

pub mod action;
pub mod application;
pub mod error;
pub mod event;
pub mod form;
pub mod otp;
pub mod phone;
pub mod state;
pub mod state_machine;
pub mod step;
pub mod validation;

pub use action::WizardAction;
pub use application::{ApplicationError, ApplicationStatus, MembershipApplication};
pub use error::{WizardContractError, WizardRejection};
pub use event::{StepPayload, WizardEvent};
pub use form::{BusinessInfo, PersonalInfo, RegisterFormData};
pub use otp::{OtpDigits, OTP_LENGTH};
pub use phone::PhoneNumber;
pub use state::RegistrationWizardState;
pub use state_machine::{RegistrationWizardController, Transition};
pub use step::WizardStep;
pub use validation::{FieldError, FieldErrors, FormField};
