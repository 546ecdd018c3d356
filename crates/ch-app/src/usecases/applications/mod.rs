//! Membership application use cases.

mod review;
mod submit;

pub use review::{ReviewApplication, ReviewApplicationError};
pub use submit::{SubmitApplication, SubmitApplicationError};
