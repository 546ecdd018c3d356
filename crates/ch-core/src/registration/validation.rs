//! Per-step field validation.
//!
//! Validation misses are expected user input problems: they are collected into
//! a [`FieldErrors`] map for inline rendering, never raised as errors.

use std::collections::BTreeMap;

use serde::Serialize;

use super::form::{BusinessInfo, PersonalInfo};
use super::otp::{OtpDigits, OTP_LENGTH};
use super::phone::PhoneNumber;

/// Form fields that can carry an inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    CountryCode,
    PhoneNumber,
    Email,
    Group,
    BusinessName,
    BusinessCategory,
    BusinessPhone,
    BusinessEmail,
    BusinessLocation,
    Coordinates,
    Otp,
}

/// What is wrong with a field. The `Display` text is what the UI renders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(into = "String")]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Please enter a valid country code")]
    InvalidCountryCode,

    #[error("Please enter a valid phone number")]
    InvalidPhoneNumber,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Location coordinates are out of range")]
    InvalidCoordinates,

    #[error("Please enter all {expected} digits ({filled} entered)")]
    IncompleteOtp { filled: usize, expected: usize },

    #[error("The code you entered is incorrect")]
    OtpRejected,
}

impl From<FieldError> for String {
    fn from(error: FieldError) -> Self {
        error.to_string()
    }
}

pub type FieldErrors = BTreeMap<FormField, FieldError>;

pub fn validate_personal(info: &PersonalInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require(&mut errors, FormField::Name, &info.name);
    require(&mut errors, FormField::Group, &info.group);

    if info.country_code.trim().is_empty() {
        errors.insert(FormField::CountryCode, FieldError::Required);
    } else if PhoneNumber::parse(&info.country_code, "000000").is_none() {
        errors.insert(FormField::CountryCode, FieldError::InvalidCountryCode);
    }

    if info.phone_number.trim().is_empty() {
        errors.insert(FormField::PhoneNumber, FieldError::Required);
    } else if PhoneNumber::parse("+1", &info.phone_number).is_none() {
        errors.insert(FormField::PhoneNumber, FieldError::InvalidPhoneNumber);
    }

    check_optional_email(&mut errors, FormField::Email, info.email.as_deref());
    errors
}

pub fn validate_business(info: &BusinessInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require(&mut errors, FormField::BusinessName, &info.business_name);
    require(&mut errors, FormField::BusinessCategory, &info.business_category);
    require(&mut errors, FormField::BusinessLocation, &info.business_location);

    if let Some(phone) = non_blank(info.business_phone.as_deref()) {
        if PhoneNumber::parse("+1", phone).is_none() {
            errors.insert(FormField::BusinessPhone, FieldError::InvalidPhoneNumber);
        }
    }
    check_optional_email(&mut errors, FormField::BusinessEmail, info.business_email.as_deref());

    if let Some(point) = info.coordinates {
        if point.validate().is_err() {
            errors.insert(FormField::Coordinates, FieldError::InvalidCoordinates);
        }
    }
    errors
}

pub fn validate_otp(digits: &OtpDigits) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !digits.is_complete() {
        errors.insert(
            FormField::Otp,
            FieldError::IncompleteOtp {
                filled: digits.filled_count(),
                expected: OTP_LENGTH,
            },
        );
    }
    errors
}

fn require(errors: &mut FieldErrors, field: FormField, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field, FieldError::Required);
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_optional_email(errors: &mut FieldErrors, field: FormField, value: Option<&str>) {
    if let Some(email) = non_blank(value) {
        if !looks_like_email(email) {
            errors.insert(field, FieldError::InvalidEmail);
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}
