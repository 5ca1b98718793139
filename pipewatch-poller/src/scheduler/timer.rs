//! Repeating task primitive
//!
//! Triggers a task on a fixed interval, starting immediately. A trigger that
//! fires while the previous run is still active is dropped, never queued, so
//! at most one run is in flight at any time.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::debug;

/// Fixed-interval, non-overlapping task trigger
pub struct RepeatingTask {
    name: &'static str,
    interval: Duration,
    in_flight: Arc<AtomicBool>,
    skipped: Arc<AtomicU64>,
}

/// Marks a run as active until dropped
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl RepeatingTask {
    pub fn new(name: &'static str, interval: Duration) -> Self {
        Self {
            name,
            interval,
            in_flight: Arc::new(AtomicBool::new(false)),
            skipped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of triggers dropped because a run was still active
    #[cfg(test)]
    pub fn skipped_triggers(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Triggers `task` forever
    ///
    /// Each run is spawned on its own tokio task so the trigger clock keeps
    /// ticking while it is active. The guard is released when the run ends,
    /// even if it panics.
    pub async fn run<F, Fut>(&self, mut task: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(guard) = InFlightGuard::try_acquire(&self.in_flight) else {
                let skipped = self.skipped.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(
                    "Previous {} run still active, skipping trigger ({} skipped so far)",
                    self.name, skipped
                );
                continue;
            };

            let run = task();
            tokio::spawn(async move {
                let _guard = guard;
                run.await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_first_run_is_immediate() {
        let runs = Arc::new(AtomicUsize::new(0));
        let timer = Arc::new(RepeatingTask::new("test", Duration::from_secs(3600)));

        let handle = {
            let runs = Arc::clone(&runs);
            let timer = Arc::clone(&timer);
            tokio::spawn(async move {
                timer
                    .run(move || {
                        let runs = Arc::clone(&runs);
                        async move {
                            runs.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                    .await
            })
        };

        time::sleep(Duration::from_millis(100)).await;
        handle.abort();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_runs_never_overlap() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));
        let timer = Arc::new(RepeatingTask::new("test", Duration::from_millis(10)));

        let handle = {
            let (active, max_active, runs) =
                (Arc::clone(&active), Arc::clone(&max_active), Arc::clone(&runs));
            let timer = Arc::clone(&timer);
            tokio::spawn(async move {
                timer
                    .run(move || {
                        let (active, max_active, runs) =
                            (Arc::clone(&active), Arc::clone(&max_active), Arc::clone(&runs));
                        async move {
                            let now_active = active.fetch_add(1, Ordering::SeqCst) + 1;
                            max_active.fetch_max(now_active, Ordering::SeqCst);
                            runs.fetch_add(1, Ordering::SeqCst);
                            time::sleep(Duration::from_millis(45)).await;
                            active.fetch_sub(1, Ordering::SeqCst);
                        }
                    })
                    .await
            })
        };

        time::sleep(Duration::from_millis(300)).await;
        handle.abort();

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        assert!(runs.load(Ordering::SeqCst) >= 2);
        assert!(timer.skipped_triggers() > 0);
    }

    #[tokio::test]
    async fn test_guard_is_released_after_panic() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = InFlightGuard::try_acquire(&flag).unwrap();
        assert!(InFlightGuard::try_acquire(&flag).is_none());

        let result = tokio::spawn(async move {
            let _guard = guard;
            panic!("cycle blew up");
        })
        .await;

        assert!(result.is_err());
        assert!(!flag.load(Ordering::SeqCst));
        assert!(InFlightGuard::try_acquire(&flag).is_some());
    }
}
