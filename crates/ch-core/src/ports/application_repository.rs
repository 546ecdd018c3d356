use async_trait::async_trait;

use crate::ids::ApplicationId;
use crate::registration::{MembershipApplication, PhoneNumber};

#[async_trait]
pub trait ApplicationRepositoryPort: Send + Sync {
    /// Insert or overwrite by id.
    async fn save(&self, application: &MembershipApplication) -> anyhow::Result<()>;

    async fn get(&self, id: &ApplicationId) -> anyhow::Result<Option<MembershipApplication>>;

    async fn find_by_phone(&self, phone: &PhoneNumber)
        -> anyhow::Result<Vec<MembershipApplication>>;

    /// Pending applications, oldest first.
    async fn list_pending(&self) -> anyhow::Result<Vec<MembershipApplication>>;
}
