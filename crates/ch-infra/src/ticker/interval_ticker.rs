//! One-second resend ticker backed by a tokio task.
//!
//! Each tick is delivered as a [`ResendTick`] tagged with the run's generation
//! on the channel the registration event pump reads from.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use ch_core::ports::{ResendTick, ResendTickerPort};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct IntervalResendTicker {
    events: mpsc::Sender<ResendTick>,
    period: Duration,
    generation: AtomicU64,
    running: Arc<Mutex<Option<AbortHandle>>>,
}

impl IntervalResendTicker {
    pub fn new(events: mpsc::Sender<ResendTick>) -> Self {
        Self::with_period(events, TICK_PERIOD)
    }

    pub fn with_period(events: mpsc::Sender<ResendTick>, period: Duration) -> Self {
        Self {
            events,
            period,
            generation: AtomicU64::new(0),
            running: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

#[async_trait::async_trait]
impl ResendTickerPort for IntervalResendTicker {
    async fn start(&self, ticks: u32) -> anyhow::Result<u64> {
        let mut running = self.running.lock().await;
        if let Some(existing) = running.take() {
            existing.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let events = self.events.clone();
        let period = self.period;
        let handle = tokio::spawn(async move {
            // First tick lands one period after start, not immediately. Missed
            // ticks burst so the countdown stays in step with wall time.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            for _ in 0..ticks {
                interval.tick().await;
                if events.send(ResendTick { generation }).await.is_err() {
                    warn!("resend tick receiver dropped, ticker exiting");
                    return;
                }
            }
            debug!(ticks, generation, "resend ticker finished");
        });

        *running = Some(handle.abort_handle());
        debug!(ticks, generation, "resend ticker started");
        Ok(generation)
    }

    async fn stop(&self) -> anyhow::Result<()> {
        if let Some(handle) = self.running.lock().await.take() {
            handle.abort();
            debug!("resend ticker stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn drain(rx: &mut mpsc::Receiver<ResendTick>) -> Vec<u64> {
        let mut generations = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            generations.push(tick.generation);
        }
        generations
    }

    #[tokio::test]
    async fn emits_one_tick_per_second_for_requested_count() -> anyhow::Result<()> {
        tokio::time::pause();
        let (tx, mut rx) = mpsc::channel(64);
        let ticker = IntervalResendTicker::new(tx);

        let generation = ticker.start(3).await?;
        settle().await;
        assert!(drain(&mut rx).is_empty());

        advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(drain(&mut rx), vec![generation]);

        advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(drain(&mut rx), vec![generation, generation]);
        assert!(!ticker.is_running().await);
        Ok(())
    }

    #[tokio::test]
    async fn stop_cancels_pending_ticks() -> anyhow::Result<()> {
        tokio::time::pause();
        let (tx, mut rx) = mpsc::channel(64);
        let ticker = IntervalResendTicker::new(tx);

        ticker.start(30).await?;
        advance(Duration::from_secs(2)).await;
        settle().await;
        ticker.stop().await?;
        let before = drain(&mut rx);

        advance(Duration::from_secs(10)).await;
        settle().await;

        assert_eq!(before.len(), 2);
        assert!(drain(&mut rx).is_empty());
        assert!(!ticker.is_running().await);
        Ok(())
    }

    #[tokio::test]
    async fn restart_tags_ticks_with_a_new_generation() -> anyhow::Result<()> {
        tokio::time::pause();
        let (tx, mut rx) = mpsc::channel(64);
        let ticker = IntervalResendTicker::new(tx);

        let first = ticker.start(30).await?;
        advance(Duration::from_secs(3)).await;
        settle().await;
        ticker.stop().await?;
        let second = ticker.start(2).await?;

        advance(Duration::from_secs(10)).await;
        settle().await;

        assert_ne!(first, second);
        // Ticks of the stopped run stay queued ahead of the new run's ticks.
        assert_eq!(drain(&mut rx), vec![first, first, first, second, second]);
        Ok(())
    }

    #[tokio::test]
    async fn stop_without_start_is_noop() -> anyhow::Result<()> {
        let (tx, _rx) = mpsc::channel(1);
        let ticker = IntervalResendTicker::new(tx);

        ticker.stop().await?;

        assert!(!ticker.is_running().await);
        Ok(())
    }
}
