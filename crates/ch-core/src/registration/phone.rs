use serde::{Deserialize, Serialize};

/// A phone number split into country calling code and national number.
///
/// Identifies a registration flow until the backend assigns a member id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    country_code: String,
    national_number: String,
}

impl PhoneNumber {
    /// Normalize and check raw user input.
    ///
    /// Spaces, dashes, dots and parentheses are dropped. The country code may
    /// be given with or without the leading `+`.
    pub fn parse(country_code: &str, national_number: &str) -> Option<Self> {
        let cc = strip_separators(country_code.trim().trim_start_matches('+'));
        let number = strip_separators(national_number);

        let cc_ok = (1..=4).contains(&cc.len()) && cc.bytes().all(|b| b.is_ascii_digit());
        let number_ok =
            (6..=14).contains(&number.len()) && number.bytes().all(|b| b.is_ascii_digit());
        if !(cc_ok && number_ok) {
            return None;
        }

        Some(Self {
            country_code: format!("+{cc}"),
            national_number: number,
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn national_number(&self) -> &str {
        &self.national_number
    }

    /// `+<country code><national number>`.
    pub fn e164(&self) -> String {
        format!("{}{}", self.country_code, self.national_number)
    }

    /// Number with all but the last four digits hidden, for logs.
    pub fn masked(&self) -> String {
        let visible = self.national_number.len().saturating_sub(4);
        format!(
            "{}{}{}",
            self.country_code,
            "*".repeat(visible),
            &self.national_number[visible..]
        )
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.country_code, self.national_number)
    }
}

fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}
