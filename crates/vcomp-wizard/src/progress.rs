//! Synthetic compose progress.
//!
//! The backend reports no progress while composing, so the wizard fakes
//! one: a fixed increment per tick, held at a ceiling until the response
//! lands. The value says nothing about real backend progress.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// Ticker parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSettings {
    pub tick: Duration,
    pub step: f64,
    pub cap: f64,
}

impl ProgressSettings {
    /// Estimated time left, assuming the ticker pace held until 100%.
    pub fn eta(&self, progress: f64) -> Duration {
        if self.step <= 0.0 {
            return Duration::ZERO;
        }
        let remaining = (100.0 - progress).max(0.0);
        self.tick.mul_f64((remaining / self.step).round())
    }
}

/// Handle to a running ticker task.
///
/// The task is aborted when the handle is completed, cancelled or dropped.
#[derive(Debug)]
pub struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
    progress: Arc<watch::Sender<f64>>,
}

impl ProgressTicker {
    /// Reset progress to zero and start ticking.
    pub fn start(progress: Arc<watch::Sender<f64>>, settings: ProgressSettings) -> Self {
        progress.send_replace(0.0);

        let sender = Arc::clone(&progress);
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + settings.tick, settings.tick);
            loop {
                ticks.tick().await;

                let mut capped = false;
                sender.send_modify(|value| {
                    *value = (*value + settings.step).min(settings.cap);
                    capped = *value >= settings.cap;
                });

                if capped {
                    debug!("Synthetic progress reached {}%", settings.cap);
                    break;
                }
            }
        });

        Self {
            handle: Some(handle),
            progress,
        }
    }

    /// Stop ticking and snap to 100%.
    pub fn complete(mut self) {
        self.stop();
        self.progress.send_replace(100.0);
    }

    /// Stop ticking and leave the value where it is.
    pub fn cancel(mut self) {
        self.stop();
    }

    /// Whether the ticker task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProgressSettings {
        ProgressSettings {
            tick: Duration::from_secs(1),
            step: 10.0,
            cap: 90.0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_interval() {
        let (tx, rx) = watch::channel(55.0);
        let ticker = ProgressTicker::start(Arc::new(tx), settings());

        assert_eq!(*rx.borrow(), 0.0);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(*rx.borrow(), 30.0);
        assert!(ticker.is_active());

        ticker.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(*rx.borrow(), 30.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_holds_at_cap_then_completes() {
        let (tx, rx) = watch::channel(0.0);
        let ticker = ProgressTicker::start(Arc::new(tx), settings());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(*rx.borrow(), 90.0);
        assert!(!ticker.is_active());

        ticker.complete();
        assert_eq!(*rx.borrow(), 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let (tx, rx) = watch::channel(0.0);
        {
            let _ticker = ProgressTicker::start(Arc::new(tx), settings());
            tokio::time::sleep(Duration::from_millis(1500)).await;
        }
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(*rx.borrow(), 10.0);
    }

    #[test]
    fn test_eta() {
        let s = settings();
        assert_eq!(s.eta(0.0), Duration::from_secs(10));
        assert_eq!(s.eta(42.0), Duration::from_secs(6));
        assert_eq!(s.eta(100.0), Duration::ZERO);
        assert_eq!(s.eta(120.0), Duration::ZERO);
    }
}
