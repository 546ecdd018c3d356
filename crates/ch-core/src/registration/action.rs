use serde::Serialize;

use super::form::RegisterFormData;
use super::phone::PhoneNumber;

/// Side-effects requested by wizard transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardAction {
    /// Ask the OTP service to send a code.
    ///
    /// 发送验证码。
    SendOtp { phone: PhoneNumber },
    /// Ask the OTP service to check the entered code.
    ///
    /// 校验验证码。
    VerifyOtp { phone: PhoneNumber, code: String },
    /// Begin delivering one tick per second for `seconds` ticks.
    ///
    /// 启动重发倒计时时钟。
    StartResendTicker { seconds: u32 },
    /// Stop delivering ticks.
    ///
    /// 停止重发倒计时时钟。
    StopResendTicker,
    /// Move keyboard focus to an OTP box. One-shot UI intent.
    ///
    /// 将焦点移动到指定验证码输入框。
    FocusOtpInput { index: usize },
    /// Hand the collected form to the membership backend.
    ///
    /// 提交注册信息。
    SubmitRegistration { form: RegisterFormData },
}
