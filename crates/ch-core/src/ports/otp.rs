use async_trait::async_trait;

use crate::registration::PhoneNumber;

/// Phone-auth provider.
#[async_trait]
pub trait OtpServicePort: Send + Sync {
    async fn send_otp(&self, phone: &PhoneNumber) -> anyhow::Result<()>;

    /// `Ok(false)` means the code was wrong; `Err` means the provider failed.
    async fn verify_otp(&self, phone: &PhoneNumber, code: &str) -> anyhow::Result<bool>;
}
