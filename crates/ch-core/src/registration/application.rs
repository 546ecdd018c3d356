//! Membership applications produced by a completed wizard and reviewed by admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::form::RegisterFormData;
use super::phone::PhoneNumber;
use crate::ids::{ApplicationId, MemberId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    #[error("application {0} has already been reviewed")]
    NotPending(ApplicationId),

    #[error("a rejection needs a reason")]
    MissingReason,

    #[error("submitted form has no valid phone number")]
    MissingPhoneNumber,
}

/// Review status of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    PendingApproval,
    Approved {
        member_id: MemberId,
        reviewed_at: DateTime<Utc>,
    },
    Rejected {
        reason: String,
        reviewed_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipApplication {
    pub id: ApplicationId,
    pub phone: PhoneNumber,
    pub form: RegisterFormData,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}

impl MembershipApplication {
    /// Wrap a completed form. The phone number becomes the lookup key.
    pub fn submit(
        form: RegisterFormData,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ApplicationError> {
        let phone = form.phone().ok_or(ApplicationError::MissingPhoneNumber)?;
        Ok(Self {
            id: ApplicationId::new(),
            phone,
            form,
            submitted_at,
            status: ApplicationStatus::PendingApproval,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::PendingApproval
    }

    /// Admit the applicant and assign a member id.
    pub fn approve(&mut self, reviewed_at: DateTime<Utc>) -> Result<MemberId, ApplicationError> {
        self.ensure_pending()?;
        let member_id = MemberId::new();
        self.status = ApplicationStatus::Approved {
            member_id: member_id.clone(),
            reviewed_at,
        };
        Ok(member_id)
    }

    pub fn reject(
        &mut self,
        reason: impl Into<String>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<(), ApplicationError> {
        self.ensure_pending()?;
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ApplicationError::MissingReason);
        }
        self.status = ApplicationStatus::Rejected {
            reason,
            reviewed_at,
        };
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), ApplicationError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(ApplicationError::NotPending(self.id.clone()))
        }
    }
}
