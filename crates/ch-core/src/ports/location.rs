use async_trait::async_trait;

use crate::attendance::UserLocationReading;

/// Device location service.
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Acquire a fresh fix. May prompt for permission or wait for GPS.
    async fn current_reading(&self) -> anyhow::Result<UserLocationReading>;
}
