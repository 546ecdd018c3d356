use serde::Serialize;

use super::error::WizardContractError;

/// Registration wizard step.
///
/// 注册向导步骤。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Name, phone and group.
    ///
    /// 个人信息。
    #[default]
    PersonalInfo = 0,
    /// Business name, category and location.
    ///
    /// 企业信息。
    BusinessInfo = 1,
    /// Six-digit code sent to the phone.
    ///
    /// 短信验证码。
    OtpVerification = 2,
    /// Submitted, waiting for an admin. Terminal.
    ///
    /// 等待审核（终态）。
    PendingApproval = 3,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::PersonalInfo => Some(WizardStep::BusinessInfo),
            WizardStep::BusinessInfo => Some(WizardStep::OtpVerification),
            WizardStep::OtpVerification => Some(WizardStep::PendingApproval),
            WizardStep::PendingApproval => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::PersonalInfo => None,
            WizardStep::BusinessInfo => Some(WizardStep::PersonalInfo),
            WizardStep::OtpVerification => Some(WizardStep::BusinessInfo),
            WizardStep::PendingApproval => Some(WizardStep::OtpVerification),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::PendingApproval
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = WizardContractError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(WizardStep::PersonalInfo),
            1 => Ok(WizardStep::BusinessInfo),
            2 => Ok(WizardStep::OtpVerification),
            3 => Ok(WizardStep::PendingApproval),
            other => Err(WizardContractError::StepOutOfRange(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_try_from() {
        for index in 0..=3u8 {
            assert_eq!(WizardStep::try_from(index).unwrap().index(), index);
        }
    }

    #[test]
    fn out_of_range_index_is_a_contract_error() {
        assert_eq!(
            WizardStep::try_from(4),
            Err(WizardContractError::StepOutOfRange(4))
        );
    }

    #[test]
    fn steps_are_linear() {
        assert_eq!(WizardStep::PersonalInfo.previous(), None);
        assert_eq!(WizardStep::PendingApproval.next(), None);
        assert_eq!(
            WizardStep::BusinessInfo.next().and_then(WizardStep::previous),
            Some(WizardStep::BusinessInfo)
        );
    }
}
