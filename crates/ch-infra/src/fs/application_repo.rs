//! File-based membership application repository.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use ch_core::ids::ApplicationId;
use ch_core::ports::ApplicationRepositoryPort;
use ch_core::registration::{MembershipApplication, PhoneNumber};

use super::json_store::JsonFileStore;

pub const DEFAULT_APPLICATIONS_FILE: &str = "applications.json";

pub struct FileApplicationRepository {
    store: JsonFileStore<Vec<MembershipApplication>>,
}

impl FileApplicationRepository {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            store: JsonFileStore::new(file_path),
        }
    }

    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_APPLICATIONS_FILE))
    }
}

#[async_trait]
impl ApplicationRepositoryPort for FileApplicationRepository {
    async fn save(&self, application: &MembershipApplication) -> anyhow::Result<()> {
        let replaced = self
            .store
            .update(|all| match all.iter_mut().find(|a| a.id == application.id) {
                Some(existing) => {
                    *existing = application.clone();
                    true
                }
                None => {
                    all.push(application.clone());
                    false
                }
            })
            .await?;
        debug!(application_id = %application.id, replaced, "application saved");
        Ok(())
    }

    async fn get(&self, id: &ApplicationId) -> anyhow::Result<Option<MembershipApplication>> {
        Ok(self.store.load().await?.into_iter().find(|a| &a.id == id))
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> anyhow::Result<Vec<MembershipApplication>> {
        Ok(self
            .store
            .load()
            .await?
            .into_iter()
            .filter(|a| &a.phone == phone)
            .collect())
    }

    async fn list_pending(&self) -> anyhow::Result<Vec<MembershipApplication>> {
        let mut pending: Vec<_> = self
            .store
            .load()
            .await?
            .into_iter()
            .filter(MembershipApplication::is_pending)
            .collect();
        pending.sort_by_key(|a| a.submitted_at);
        Ok(pending)
    }
}
