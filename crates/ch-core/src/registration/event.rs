use serde::{Deserialize, Serialize};

use super::form::{BusinessInfo, PersonalInfo};

/// Data submitted with "Next" on the current step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum StepPayload {
    PersonalInfo(PersonalInfo),
    BusinessInfo(BusinessInfo),
    /// The digits are already on the state; nothing else is submitted.
    Otp,
}

impl StepPayload {
    pub fn name(&self) -> &'static str {
        match self {
            StepPayload::PersonalInfo(_) => "personal_info",
            StepPayload::BusinessInfo(_) => "business_info",
            StepPayload::Otp => "otp",
        }
    }
}

/// Events that drive the registration wizard.
///
/// 驱动注册向导的事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardEvent {
    /// User pressed "Next" / "Verify".
    ///
    /// 用户点击下一步。
    Advance { payload: StepPayload },
    /// Navigate back.
    ///
    /// 返回。
    Back,
    /// One OTP box changed (typed, pasted or backspaced).
    ///
    /// 验证码输入框变化。
    OtpDigitChanged { index: usize, value: String },
    /// External one-second clock.
    ///
    /// 外部每秒时钟。
    ResendTick,
    /// User pressed "Resend code".
    ///
    /// 用户请求重发验证码。
    ResendRequested,
    /// OTP service answered a verification request (network).
    ///
    /// 验证结果（网络回调）。
    VerificationResolved { verified: bool },
}
