use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use ch_core::ids::{ApplicationId, MemberId};
use ch_core::ports::{ApplicationRepositoryPort, ClockPort};
use ch_core::registration::{ApplicationError, MembershipApplication};

#[derive(Debug, thiserror::Error)]
pub enum ReviewApplicationError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Domain(#[from] ApplicationError),
    #[error("application storage failed: {0}")]
    Repository(#[source] anyhow::Error),
}

/// Admin console use case: list, approve and reject membership applications.
pub struct ReviewApplication {
    applications: Arc<dyn ApplicationRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl ReviewApplication {
    pub fn new(applications: Arc<dyn ApplicationRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            applications,
            clock,
        }
    }

    pub async fn list_pending(&self) -> Result<Vec<MembershipApplication>, ReviewApplicationError> {
        self.applications
            .list_pending()
            .await
            .map_err(ReviewApplicationError::Repository)
    }

    pub async fn approve(&self, id: &ApplicationId) -> Result<MemberId, ReviewApplicationError> {
        let span = info_span!("usecase.review_application.approve", application_id = %id);
        async {
            let mut application = self.load(id).await?;
            let member_id = application.approve(self.clock.now())?;
            self.store(&application).await?;
            info!(member_id = %member_id, "membership application approved");
            Ok(member_id)
        }
        .instrument(span)
        .await
    }

    pub async fn reject(
        &self,
        id: &ApplicationId,
        reason: &str,
    ) -> Result<(), ReviewApplicationError> {
        let span = info_span!("usecase.review_application.reject", application_id = %id);
        async {
            let mut application = self.load(id).await?;
            application.reject(reason, self.clock.now())?;
            self.store(&application).await?;
            info!("membership application rejected");
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn load(&self, id: &ApplicationId) -> Result<MembershipApplication, ReviewApplicationError> {
        self.applications
            .get(id)
            .await
            .map_err(ReviewApplicationError::Repository)?
            .ok_or_else(|| ReviewApplicationError::NotFound(id.clone()))
    }

    async fn store(&self, application: &MembershipApplication) -> Result<(), ReviewApplicationError> {
        self.applications
            .save(application)
            .await
            .map_err(ReviewApplicationError::Repository)
    }
}
