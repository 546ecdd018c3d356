use serde::Serialize;
use thiserror::Error;

use super::step::WizardStep;
use super::validation::FieldErrors;

/// Caller contract violations.
///
/// These indicate a bug in the code driving the wizard, not bad user input,
/// and are surfaced as hard errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardContractError {
    #[error("wizard step {0} is outside [0, 3]")]
    StepOutOfRange(u8),

    #[error("OTP index {0} is outside [0, 5]")]
    OtpIndexOutOfRange(usize),

    #[error("OTP array must have 6 entries, got {0}")]
    OtpLengthMismatch(usize),

    #[error("OTP entry {index} holds more than one character")]
    OtpEntryTooLong { index: usize },

    #[error("OTP entry must be a digit, got {0:?}")]
    NonDigitOtp(char),

    #[error("{payload} payload submitted while on step {step:?}")]
    PayloadMismatch {
        step: WizardStep,
        payload: &'static str,
    },

    #[error("{operation} is not available on step {step:?}")]
    OperationNotAllowed {
        operation: &'static str,
        step: WizardStep,
    },

    #[error("form has no valid phone number on step {0:?}")]
    MissingPhoneNumber(WizardStep),
}

/// Expected, recoverable refusals. The wizard stays where it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardRejection {
    /// Current step has missing or malformed fields.
    Validation { errors: FieldErrors },
    /// Resend requested while the cooldown is still running.
    ResendCooldownActive { remaining_secs: u32 },
    /// The OTP service did not accept the code.
    VerificationFailed,
}
