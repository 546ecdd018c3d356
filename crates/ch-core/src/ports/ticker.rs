use async_trait::async_trait;

/// One elapsed second of the ticker run identified by `generation`.
///
/// A run's ticks may still be queued after it was stopped or replaced; the
/// owner compares `generation` with the run it started and drops the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResendTick {
    pub generation: u64,
}

/// One-second clock that drives the OTP resend countdown.
///
/// Implementations deliver [`ResendTick`]s back to whoever owns the wizard.
/// Starting while already running replaces the running ticker; every start
/// returns a fresh generation.
#[async_trait]
pub trait ResendTickerPort: Send + Sync {
    async fn start(&self, ticks: u32) -> anyhow::Result<u64>;
    async fn stop(&self) -> anyhow::Result<()>;
}
