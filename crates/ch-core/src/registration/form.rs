use serde::{Deserialize, Serialize};

use super::phone::PhoneNumber;
use crate::attendance::GeoPoint;

/// Step 0 fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: Option<String>,
    /// Chapter or group the applicant wants to join.
    pub group: String,
}

/// Step 1 fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub business_name: String,
    pub business_category: String,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    /// Free-text address as typed or picked on the map.
    pub business_location: String,
    pub coordinates: Option<GeoPoint>,
}

/// Everything collected by the wizard, handed off wholesale on submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterFormData {
    pub personal: PersonalInfo,
    pub business: BusinessInfo,
}

impl RegisterFormData {
    /// The applicant's phone number, if the personal step holds a valid one.
    pub fn phone(&self) -> Option<PhoneNumber> {
        PhoneNumber::parse(&self.personal.country_code, &self.personal.phone_number)
    }
}
