//! Registration wizard state machine.
//!
//! Pure transition functions: every operation takes the current state and
//! returns the next one together with the side-effects the caller must run.
//! No clocks, timers or network live here.

use super::action::WizardAction;
use super::error::{WizardContractError, WizardRejection};
use super::event::{StepPayload, WizardEvent};
use super::otp::OTP_LENGTH;
use super::state::RegistrationWizardState;
use super::step::WizardStep;
use super::validation::{
    validate_business, validate_otp, validate_personal, FieldError, FieldErrors, FormField,
};
use crate::config::{defaults, RegistrationConfig};

/// Result of one wizard operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: RegistrationWizardState,
    pub actions: Vec<WizardAction>,
    /// Set when the operation was refused for an expected reason.
    pub rejection: Option<WizardRejection>,
}

impl Transition {
    fn applied(state: RegistrationWizardState, actions: Vec<WizardAction>) -> Self {
        Self {
            state,
            actions,
            rejection: None,
        }
    }

    fn unchanged(state: &RegistrationWizardState) -> Self {
        Self::applied(state.clone(), Vec::new())
    }

    fn rejected(
        state: RegistrationWizardState,
        actions: Vec<WizardAction>,
        rejection: WizardRejection,
    ) -> Self {
        Self {
            state,
            actions,
            rejection: Some(rejection),
        }
    }

    fn invalid(mut state: RegistrationWizardState, errors: FieldErrors) -> Self {
        state.set_errors(errors.clone());
        Self::rejected(state, Vec::new(), WizardRejection::Validation { errors })
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Drives the four-step registration flow.
///
/// 注册向导控制器：纯状态机，不包含副作用。
#[derive(Debug, Clone)]
pub struct RegistrationWizardController {
    resend_cooldown_secs: u32,
}

impl Default for RegistrationWizardController {
    fn default() -> Self {
        Self::new(defaults::RESEND_COOLDOWN_SECS)
    }
}

impl RegistrationWizardController {
    pub fn new(resend_cooldown_secs: u32) -> Self {
        Self {
            resend_cooldown_secs,
        }
    }

    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self::new(config.resend_cooldown_secs)
    }

    pub fn resend_cooldown_secs(&self) -> u32 {
        self.resend_cooldown_secs
    }

    /// Route an event to the matching operation.
    pub fn transition(
        &self,
        state: &RegistrationWizardState,
        event: WizardEvent,
    ) -> Result<Transition, WizardContractError> {
        match event {
            WizardEvent::Advance { payload } => self.advance(state, payload),
            WizardEvent::Back => Ok(Self::go_back(state)),
            WizardEvent::OtpDigitChanged { index, value } => {
                Self::on_otp_digit_change(state, index, &value)
            }
            WizardEvent::ResendTick => Ok(Self::tick_resend_timer(state)),
            WizardEvent::ResendRequested => self.resend_otp(state),
            WizardEvent::VerificationResolved { verified } => Self::complete(state, verified),
        }
    }

    /// Validate the current step and move forward.
    ///
    /// On the OTP step a valid entry only requests verification; the step
    /// changes in [`Self::complete`].
    pub fn advance(
        &self,
        state: &RegistrationWizardState,
        payload: StepPayload,
    ) -> Result<Transition, WizardContractError> {
        let mut next = state.clone();
        match (state.step(), payload) {
            (WizardStep::PersonalInfo, StepPayload::PersonalInfo(info)) => {
                let errors = validate_personal(&info);
                next.form_data_mut().personal = info;
                if !errors.is_empty() {
                    return Ok(Transition::invalid(next, errors));
                }
                next.set_errors(FieldErrors::new());
                next.set_step(WizardStep::BusinessInfo);
                Ok(Transition::applied(next, Vec::new()))
            }
            (WizardStep::BusinessInfo, StepPayload::BusinessInfo(info)) => {
                let errors = validate_business(&info);
                next.form_data_mut().business = info;
                if !errors.is_empty() {
                    return Ok(Transition::invalid(next, errors));
                }
                let phone = next
                    .form_data()
                    .phone()
                    .ok_or(WizardContractError::MissingPhoneNumber(WizardStep::BusinessInfo))?;

                next.set_errors(FieldErrors::new());
                next.set_step(WizardStep::OtpVerification);
                next.otp_digits_mut().clear();
                let next = Self::start_resend_cooldown(&next, self.resend_cooldown_secs);

                let mut actions = vec![WizardAction::SendOtp { phone }];
                actions.extend(self.ticker_start());
                actions.push(WizardAction::FocusOtpInput { index: 0 });
                Ok(Transition::applied(next, actions))
            }
            (WizardStep::OtpVerification, StepPayload::Otp) => {
                let Some(code) = next.otp_digits().code() else {
                    let errors = validate_otp(next.otp_digits());
                    return Ok(Transition::invalid(next, errors));
                };
                let phone = next
                    .form_data()
                    .phone()
                    .ok_or(WizardContractError::MissingPhoneNumber(WizardStep::OtpVerification))?;

                next.set_errors(FieldErrors::new());
                Ok(Transition::applied(
                    next,
                    vec![WizardAction::VerifyOtp { phone, code }],
                ))
            }
            (WizardStep::PendingApproval, _) => Err(WizardContractError::OperationNotAllowed {
                operation: "advance",
                step: WizardStep::PendingApproval,
            }),
            (step, payload) => Err(WizardContractError::PayloadMismatch {
                step,
                payload: payload.name(),
            }),
        }
    }

    /// Step back without validation. Leaving the OTP step cancels the
    /// resend countdown. The first and the terminal step stay put.
    pub fn go_back(state: &RegistrationWizardState) -> Transition {
        let step = state.step();
        let Some(previous) = step.previous().filter(|_| !step.is_terminal()) else {
            return Transition::unchanged(state);
        };

        let mut next = state.clone();
        next.set_step(previous);
        next.set_errors(FieldErrors::new());

        let mut actions = Vec::new();
        if step == WizardStep::OtpVerification {
            if state.resend_timer_seconds() > 0 {
                actions.push(WizardAction::StopResendTicker);
            }
            next.set_resend_timer(0);
        }
        Transition::applied(next, actions)
    }

    /// Update one OTP box.
    ///
    /// A multi-digit value (paste) fills boxes from `index` onward. Input that
    /// is not made of digits is ignored.
    pub fn on_otp_digit_change(
        state: &RegistrationWizardState,
        index: usize,
        value: &str,
    ) -> Result<Transition, WizardContractError> {
        Self::require_step(state, WizardStep::OtpVerification, "on_otp_digit_change")?;
        if index >= OTP_LENGTH {
            return Err(WizardContractError::OtpIndexOutOfRange(index));
        }

        let mut next = state.clone();

        if value.is_empty() {
            let was_empty = state.otp_digits().is_empty_at(index);
            next.otp_digits_mut().set(index, None)?;
            next.errors_mut().remove(&FormField::Otp);
            let actions = if was_empty && index > 0 {
                vec![WizardAction::FocusOtpInput { index: index - 1 }]
            } else {
                Vec::new()
            };
            return Ok(Transition::applied(next, actions));
        }

        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Transition::unchanged(state));
        }

        let mut last = index;
        for (offset, digit) in value.chars().take(OTP_LENGTH - index).enumerate() {
            last = index + offset;
            next.otp_digits_mut().set(last, Some(digit))?;
        }
        next.errors_mut().remove(&FormField::Otp);

        let actions = if last + 1 < OTP_LENGTH {
            vec![WizardAction::FocusOtpInput { index: last + 1 }]
        } else {
            Vec::new()
        };
        Ok(Transition::applied(next, actions))
    }

    /// Arm the resend countdown. The ticker itself is the caller's business.
    pub fn start_resend_cooldown(
        state: &RegistrationWizardState,
        seconds: u32,
    ) -> RegistrationWizardState {
        let mut next = state.clone();
        next.set_resend_timer(seconds);
        next
    }

    /// One second elapsed. Reaching zero asks for the ticker to stop.
    pub fn tick_resend_timer(state: &RegistrationWizardState) -> Transition {
        let remaining = state.resend_timer_seconds();
        if remaining == 0 {
            return Transition::unchanged(state);
        }

        let mut next = state.clone();
        next.set_resend_timer(remaining - 1);
        let actions = if next.resend_timer_seconds() == 0 {
            vec![WizardAction::StopResendTicker]
        } else {
            Vec::new()
        };
        Transition::applied(next, actions)
    }

    /// Send a fresh code unless the cooldown is still running.
    pub fn resend_otp(
        &self,
        state: &RegistrationWizardState,
    ) -> Result<Transition, WizardContractError> {
        Self::require_step(state, WizardStep::OtpVerification, "resend_otp")?;

        if state.is_resend_disabled() {
            return Ok(Transition::rejected(
                state.clone(),
                Vec::new(),
                WizardRejection::ResendCooldownActive {
                    remaining_secs: state.resend_timer_seconds(),
                },
            ));
        }

        let phone = state
            .form_data()
            .phone()
            .ok_or(WizardContractError::MissingPhoneNumber(WizardStep::OtpVerification))?;

        let mut next = Self::start_resend_cooldown(state, self.resend_cooldown_secs);
        next.otp_digits_mut().clear();
        next.errors_mut().remove(&FormField::Otp);

        let mut actions = vec![WizardAction::SendOtp { phone }];
        actions.extend(self.ticker_start());
        actions.push(WizardAction::FocusOtpInput { index: 0 });
        Ok(Transition::applied(next, actions))
    }

    /// Apply the OTP service's verdict.
    ///
    /// Success moves to the terminal step and hands the form off; failure
    /// stays on the OTP step with an inline error and empty boxes.
    pub fn complete(
        state: &RegistrationWizardState,
        verified: bool,
    ) -> Result<Transition, WizardContractError> {
        Self::require_step(state, WizardStep::OtpVerification, "complete")?;

        let mut next = state.clone();
        if !verified {
            next.otp_digits_mut().clear();
            next.errors_mut().insert(FormField::Otp, FieldError::OtpRejected);
            return Ok(Transition::rejected(
                next,
                vec![WizardAction::FocusOtpInput { index: 0 }],
                WizardRejection::VerificationFailed,
            ));
        }

        // Submission goes first so a failed hand-off leaves the countdown running.
        let mut actions = vec![WizardAction::SubmitRegistration {
            form: next.form_data().clone(),
        }];
        if state.resend_timer_seconds() > 0 {
            actions.push(WizardAction::StopResendTicker);
        }
        next.set_resend_timer(0);
        next.set_errors(FieldErrors::new());
        next.set_step(WizardStep::PendingApproval);
        Ok(Transition::applied(next, actions))
    }

    fn ticker_start(&self) -> Option<WizardAction> {
        (self.resend_cooldown_secs > 0).then_some(WizardAction::StartResendTicker {
            seconds: self.resend_cooldown_secs,
        })
    }

    fn require_step(
        state: &RegistrationWizardState,
        expected: WizardStep,
        operation: &'static str,
    ) -> Result<(), WizardContractError> {
        if state.step() == expected {
            Ok(())
        } else {
            Err(WizardContractError::OperationNotAllowed {
                operation,
                step: state.step(),
            })
        }
    }
}
