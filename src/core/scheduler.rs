//! Timer and manual triggers for rate fetches.
//!
//! Every fetch, timed or manual, replaces the published [`RateState`]
//! when it resolves. Fetches are not sequenced: if two overlap, whichever
//! resolves last wins.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::rates::RateState;
use crate::providers::RateProvider;

async fn fetch_and_publish(provider: RateProvider, state: Arc<watch::Sender<RateState>>) {
    state.send_modify(|s| s.loading = true);
    let snapshot = provider.fetch_rates().await;
    state.send_modify(|s| {
        s.rates = snapshot.rates;
        s.sources = snapshot.sources;
        s.loading = false;
        s.last_update = Some(Utc::now());
    });
    debug!("Published fresh rates");
}

pub struct RefreshScheduler {
    provider: RateProvider,
    state: Arc<watch::Sender<RateState>>,
    timer: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new(provider: RateProvider) -> Self {
        let (state, _) = watch::channel(RateState::default());
        Self {
            provider,
            state: Arc::new(state),
            timer: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RateState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> RateState {
        self.state.borrow().clone()
    }

    /// Fetches right away, then again every `interval` until shut down.
    pub fn start(&mut self, interval: Duration) {
        self.shutdown();
        info!(?interval, "Starting rate refresh");

        let provider = self.provider.clone();
        let state = Arc::clone(&self.state);
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("Timed refresh");
                fetch_and_publish(provider.clone(), Arc::clone(&state)).await;
            }
        }));
    }

    /// Starts a fetch immediately, independent of the timer and of any
    /// fetch already in flight.
    pub fn refresh_now(&self) -> JoinHandle<()> {
        debug!("Manual refresh");
        tokio::spawn(fetch_and_publish(
            self.provider.clone(),
            Arc::clone(&self.state),
        ))
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the timer. Manual fetches already started run to completion.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("Stopped rate refresh");
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::{ExchangeRateTable, RateSnapshot, RateSource};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Call `n` waits `delays_ms[n]` and answers with EUR = n + 1.
    struct ScriptedSource {
        call_count: AtomicUsize,
        delays_ms: Vec<u64>,
    }

    impl ScriptedSource {
        fn new(delays_ms: Vec<u64>) -> Arc<Self> {
            Arc::new(Self {
                call_count: AtomicUsize::new(0),
                delays_ms,
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for ScriptedSource {
        async fn fetch_latest(&self) -> Result<RateSnapshot> {
            let n = self.call_count.fetch_add(1, Ordering::SeqCst);
            let delay = self.delays_ms.get(n).copied().unwrap_or(0);
            sleep(Duration::from_millis(delay)).await;
            Ok(RateSnapshot {
                rates: ExchangeRateTable::new(
                    "USD",
                    HashMap::from([("EUR".to_string(), (n + 1) as f64)]),
                ),
                sources: Vec::new(),
            })
        }
    }

    struct DownSource;

    #[async_trait]
    impl RateSource for DownSource {
        async fn fetch_latest(&self) -> Result<RateSnapshot> {
            Err(anyhow!("offline"))
        }
    }

    #[tokio::test]
    async fn test_start_fetches_immediately_with_loading_flag() {
        let source = ScriptedSource::new(vec![50]);
        let mut scheduler = RefreshScheduler::new(RateProvider::new(source.clone()));
        let mut rx = scheduler.subscribe();
        assert!(!scheduler.current().loading);

        scheduler.start(Duration::from_secs(60));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading);

        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert!(!state.loading);
        assert!(state.last_update.is_some());
        assert_eq!(state.rates.get("EUR"), Some(1.0));
        assert_eq!(source.calls(), 1);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_repeats_until_shutdown() {
        let source = ScriptedSource::new(Vec::new());
        let mut scheduler = RefreshScheduler::new(RateProvider::new(source.clone()));

        scheduler.start(Duration::from_secs(60));
        sleep(Duration::from_millis(1)).await;
        assert_eq!(source.calls(), 1);

        // Ticks at 60s and 120s
        sleep(Duration::from_secs(150)).await;
        assert_eq!(source.calls(), 3);

        scheduler.shutdown();
        assert!(!scheduler.is_running());
        sleep(Duration::from_secs(600)).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_manual_refresh_is_not_deduplicated() {
        let source = ScriptedSource::new(vec![40, 40]);
        let scheduler = RefreshScheduler::new(RateProvider::new(source.clone()));

        let first = scheduler.refresh_now();
        let second = scheduler.refresh_now();
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(source.calls(), 2);
        assert!(!scheduler.current().loading);
    }

    #[tokio::test]
    async fn test_last_resolved_fetch_wins() {
        // The first fetch is slow, the second fast: the slow one lands last
        let source = ScriptedSource::new(vec![80, 5]);
        let scheduler = RefreshScheduler::new(RateProvider::new(source.clone()));

        let slow = scheduler.refresh_now();
        sleep(Duration::from_millis(10)).await;
        let fast = scheduler.refresh_now();

        fast.await.unwrap();
        assert_eq!(scheduler.current().rates.get("EUR"), Some(2.0));

        slow.await.unwrap();
        assert_eq!(scheduler.current().rates.get("EUR"), Some(1.0));
    }

    #[tokio::test]
    async fn test_failed_fetch_publishes_fallback() {
        let scheduler = RefreshScheduler::new(RateProvider::new(Arc::new(DownSource)));

        scheduler.refresh_now().await.unwrap();
        let state = scheduler.current();
        assert_eq!(state.rates, ExchangeRateTable::fallback());
        assert!(state.sources.is_empty());
        assert!(!state.loading);
    }
}
