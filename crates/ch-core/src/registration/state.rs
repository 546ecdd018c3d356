use serde::Serialize;

use super::error::WizardContractError;
use super::form::RegisterFormData;
use super::otp::OtpDigits;
use super::step::WizardStep;
use super::validation::FieldErrors;

/// Render-ready wizard state.
///
/// Fields are private so that only the controller can move the wizard, and so
/// that `is_resend_disabled` can never disagree with `resend_timer_seconds`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrationWizardState {
    step: WizardStep,
    form_data: RegisterFormData,
    otp_digits: OtpDigits,
    resend_timer_seconds: u32,
    is_resend_disabled: bool,
    errors: FieldErrors,
}

impl RegistrationWizardState {
    /// Fresh wizard, as mounted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a wizard from raw saved values, e.g. after the app was
    /// backgrounded. The step and OTP array are checked strictly.
    pub fn restore(
        step_index: u8,
        form_data: RegisterFormData,
        otp_digits: Vec<String>,
    ) -> Result<Self, WizardContractError> {
        Ok(Self {
            step: WizardStep::try_from(step_index)?,
            form_data,
            otp_digits: OtpDigits::try_from(otp_digits)?,
            ..Self::default()
        })
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form_data(&self) -> &RegisterFormData {
        &self.form_data
    }

    pub fn otp_digits(&self) -> &OtpDigits {
        &self.otp_digits
    }

    pub fn resend_timer_seconds(&self) -> u32 {
        self.resend_timer_seconds
    }

    pub fn is_resend_disabled(&self) -> bool {
        self.is_resend_disabled
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub(crate) fn set_step(&mut self, step: WizardStep) {
        self.step = step;
    }

    pub(crate) fn form_data_mut(&mut self) -> &mut RegisterFormData {
        &mut self.form_data
    }

    pub(crate) fn otp_digits_mut(&mut self) -> &mut OtpDigits {
        &mut self.otp_digits
    }

    pub(crate) fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    pub(crate) fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub(crate) fn set_resend_timer(&mut self, seconds: u32) {
        self.resend_timer_seconds = seconds;
        self.is_resend_disabled = seconds > 0;
    }
}
