// src/checker.rs

//! Autonomous background update checker.
//!
//! Drives the provider's update cycle on a fixed cadence, independent of
//! read traffic. Cycles never overlap and every cycle error is logged and
//! swallowed, so a transient remote failure only skips one refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::provider::Provider;

/// Timer task around [`Provider::update`].
pub struct Checker {
    provider: Arc<Provider>,
    interval: Duration,
    stop_next: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl Checker {
    /// Create a checker ticking at the given interval.
    pub fn new(provider: Arc<Provider>, interval: Duration) -> Self {
        Self {
            provider,
            interval,
            stop_next: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Start the timer task.
    ///
    /// One update cycle runs immediately so freshness is never worse than
    /// "as of process start"; after that the loop sleeps between cycles.
    pub fn run(&mut self) {
        let provider = Arc::clone(&self.provider);
        let stop_next = Arc::clone(&self.stop_next);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            run_cycle(&provider).await;

            loop {
                tokio::time::sleep(interval).await;
                // The stop flag is observed only here, after the sleep.
                // Graceful shutdown therefore waits out the current tick.
                if stop_next.load(Ordering::Relaxed) {
                    break;
                }
                run_cycle(&provider).await;
            }
            log::debug!("Checker loop stopped");
        });
        self.task = Some(handle);
    }

    /// Gracefully stop the loop at the next tick boundary.
    pub fn stop(&self) {
        if let Some(task) = &self.task {
            if !task.is_finished() {
                self.stop_next.store(true, Ordering::Relaxed);
            }
        }
    }

    /// Abort the loop immediately, regardless of in-flight work.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Wait for the loop task to finish.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

async fn run_cycle(provider: &Provider) {
    match provider.update().await {
        Ok(outcome) => log::debug!("Update cycle finished: {outcome:?}"),
        Err(e) => log::error!("Update cycle failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;
    use crate::storage::LocalStore;
    use chrono::Utc;
    use tempfile::TempDir;

    /// Provider whose next check lies far in the future: every cycle is a
    /// throttled no-op that never touches the network.
    async fn throttled_provider(tmp: &TempDir) -> Arc<Provider> {
        let next_check = (Utc::now() + chrono::Duration::hours(1)).to_rfc3339();
        let meta = format!(
            "source = \"test\"\nurl = \"http://127.0.0.1:9/\"\nnext_check = \"{next_check}\"\n"
        );
        std::fs::write(tmp.path().join("meta.toml"), meta).unwrap();
        std::fs::write(tmp.path().join("sc.json"), r#"{"schedule":{}}"#).unwrap();

        let provider = Arc::new(Provider::new(
            Config::default(),
            Box::new(LocalStore::new(tmp.path())),
        ));
        provider.connect().await.unwrap();
        provider
    }

    #[tokio::test]
    async fn test_first_cycle_runs_immediately() {
        let tmp = TempDir::new().unwrap();
        let provider = throttled_provider(&tmp).await;
        let before = provider.status().await.unwrap().schedule.check_at;

        let mut checker = Checker::new(Arc::clone(&provider), Duration::from_secs(3600));
        checker.run();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let after = provider.status().await.unwrap().schedule.check_at;
        assert!(after > before);

        checker.cancel();
    }

    #[tokio::test]
    async fn test_stop_terminates_within_one_interval() {
        let tmp = TempDir::new().unwrap();
        let provider = throttled_provider(&tmp).await;

        let mut checker = Checker::new(provider, Duration::from_millis(50));
        checker.run();
        checker.stop();

        // Bound: one sleep interval plus one (no-op) cycle.
        tokio::time::timeout(Duration::from_millis(500), checker.join())
            .await
            .expect("checker did not stop within a tick");
    }

    #[tokio::test]
    async fn test_cancel_aborts_immediately() {
        let tmp = TempDir::new().unwrap();
        let provider = throttled_provider(&tmp).await;

        let mut checker = Checker::new(provider, Duration::from_secs(3600));
        checker.run();
        checker.cancel();

        tokio::time::timeout(Duration::from_millis(100), checker.join())
            .await
            .expect("aborted checker still running");
    }

    #[tokio::test]
    async fn test_loop_survives_failing_cycles() {
        // Unseeded store: connect never happened, so every update fails
        // with NotReady. The loop must keep ticking regardless.
        let tmp = TempDir::new().unwrap();
        let provider = Arc::new(Provider::new(
            Config::default(),
            Box::new(LocalStore::new(tmp.path())),
        ));

        let mut checker = Checker::new(provider, Duration::from_millis(20));
        checker.run();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let alive = checker.task.as_ref().map(|t| !t.is_finished());
        assert_eq!(alive, Some(true));

        checker.cancel();
    }
}
