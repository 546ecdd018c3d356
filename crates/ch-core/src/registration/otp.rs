use serde::Serialize;

use super::error::WizardContractError;

/// Number of boxes in the OTP input.
pub const OTP_LENGTH: usize = 6;

/// The six OTP input boxes.
///
/// Every entry is either empty or exactly one ASCII digit; the only way to
/// change an entry is [`OtpDigits::set`], which enforces that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OtpDigits([String; OTP_LENGTH]);

impl OtpDigits {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index).map_or(true, str::is_empty)
    }

    /// Set or clear the box at `index`.
    pub(crate) fn set(&mut self, index: usize, digit: Option<char>) -> Result<(), WizardContractError> {
        let slot = self
            .0
            .get_mut(index)
            .ok_or(WizardContractError::OtpIndexOutOfRange(index))?;
        match digit {
            Some(d) if d.is_ascii_digit() => *slot = d.to_string(),
            Some(d) => return Err(WizardContractError::NonDigitOtp(d)),
            None => slot.clear(),
        }
        Ok(())
    }

    pub fn filled_count(&self) -> usize {
        self.0.iter().filter(|d| !d.is_empty()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count() == OTP_LENGTH
    }

    /// The entered code, once every box is filled.
    pub fn code(&self) -> Option<String> {
        self.is_complete().then(|| self.0.concat())
    }

    pub fn clear(&mut self) {
        self.0.iter_mut().for_each(String::clear);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for OtpDigits {
    type Error = WizardContractError;

    fn try_from(raw: Vec<String>) -> Result<Self, Self::Error> {
        if raw.len() != OTP_LENGTH {
            return Err(WizardContractError::OtpLengthMismatch(raw.len()));
        }
        let mut digits = OtpDigits::default();
        for (index, entry) in raw.iter().enumerate() {
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (None, _) => {}
                (Some(c), None) => digits.set(index, Some(c))?,
                (Some(_), Some(_)) => {
                    return Err(WizardContractError::OtpEntryTooLong { index })
                }
            }
        }
        Ok(digits)
    }
}
