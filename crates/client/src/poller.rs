//! Fixed-period background refresh.
//!
//! Every tick spawns the refresh as its own task, so a slow response never
//! delays the next tick and overlapping refreshes are possible; whichever
//! resolves last is what stays rendered. There is no backoff and no
//! deduplication.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A running refresh loop.
///
/// Dropping the poller does not stop it; call [`Poller::shutdown`].
#[derive(Debug)]
pub struct Poller {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Run `refresh` every `period`, first one `period` from now.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn spawn<F, Fut>(period: Duration, refresh: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shutdown = Arc::new(Notify::new());
        let signal = Arc::clone(&shutdown);

        let task = tokio::spawn(async move {
            tracing::info!(period_secs = period.as_secs_f64(), "Dashboard poller started");

            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = signal.notified() => {
                        tracing::info!("Dashboard poller received shutdown signal");
                        break;
                    }
                    _ = ticks.tick() => {
                        tracing::debug!("Dashboard poll tick");
                        tokio::spawn(refresh());
                    }
                }
            }
        });

        Self { shutdown, task }
    }

    /// Whether the loop has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop ticking and wait for the loop to exit. Refreshes already in
    /// flight are left to finish.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Dashboard poller task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_poller(period: Duration) -> (Poller, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let poller = Poller::spawn(period, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (poller, count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        let (poller, count) = counting_poller(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let (poller, count) = counting_poller(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        tokio::task::yield_now().await;
        let before = count.load(Ordering::SeqCst);
        assert_eq!(before, 2);

        poller.shutdown().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refreshes_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (flight, top) = (Arc::clone(&in_flight), Arc::clone(&peak));

        let poller = Poller::spawn(Duration::from_secs(1), move || {
            let (flight, top) = (Arc::clone(&flight), Arc::clone(&top));
            async move {
                let now = flight.fetch_add(1, Ordering::SeqCst) + 1;
                top.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(3)).await;
                flight.fetch_sub(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        tokio::task::yield_now().await;
        assert!(peak.load(Ordering::SeqCst) >= 2);

        poller.shutdown().await;
    }
}
