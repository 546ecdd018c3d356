use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use ch_core::ports::{ApplicationRepositoryPort, ClockPort};
use ch_core::registration::{ApplicationError, MembershipApplication, RegisterFormData};

#[derive(Debug, thiserror::Error)]
pub enum SubmitApplicationError {
    #[error("invalid application: {0}")]
    Invalid(#[from] ApplicationError),
    #[error("an application for {0} is already awaiting review")]
    DuplicatePending(String),
    #[error("application storage failed: {0}")]
    Repository(#[source] anyhow::Error),
}

/// Use case for handing a completed registration form to the membership backend.
pub struct SubmitApplication {
    applications: Arc<dyn ApplicationRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl SubmitApplication {
    pub fn new(applications: Arc<dyn ApplicationRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            applications,
            clock,
        }
    }

    pub async fn execute(
        &self,
        form: RegisterFormData,
    ) -> Result<MembershipApplication, SubmitApplicationError> {
        let application = MembershipApplication::submit(form, self.clock.now())?;
        let span = info_span!(
            "usecase.submit_application.execute",
            phone = %application.phone.masked()
        );
        async {
            let existing = self
                .applications
                .find_by_phone(&application.phone)
                .await
                .map_err(SubmitApplicationError::Repository)?;
            if existing.iter().any(MembershipApplication::is_pending) {
                return Err(SubmitApplicationError::DuplicatePending(
                    application.phone.masked(),
                ));
            }

            self.applications
                .save(&application)
                .await
                .map_err(SubmitApplicationError::Repository)?;
            info!(application_id = %application.id, "membership application submitted");
            Ok(application)
        }
        .instrument(span)
        .await
    }
}
