use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use crate::{
    application::usecases::process_pending::PendingMessageProcessor,
    domain::{
        errors::DomainError,
        models::{SchedulerInfo, SchedulerStatus},
        repositories::CacheRepository,
    },
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2 * 60);
pub const DEFAULT_BATCH_SIZE: usize = 2;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    pub batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Default)]
struct SchedulerState {
    running: bool,
    // Bumped on every start so a loop from a previous run never ticks into the current one.
    generation: u64,
    last_tick: Option<DateTime<Utc>>,
    next_tick: Option<DateTime<Utc>>,
    messages_sent: u64,
}

/// Periodically drains pending messages through a [`PendingMessageProcessor`].
///
/// `start`, `stop` and every tick take the state lock exclusively; `status`
/// and `is_running` take it shared. The lock is never held while a batch is
/// being delivered.
pub struct MessageScheduler {
    processor: Arc<dyn PendingMessageProcessor>,
    cache: Option<Arc<dyn CacheRepository>>,
    config: SchedulerConfig,
    state: Arc<RwLock<SchedulerState>>,
    tick_lock: Arc<Mutex<()>>,
    // Not part of the shared state, so dropping the scheduler also ends the ticker loop.
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl MessageScheduler {
    pub fn new(
        processor: Arc<dyn PendingMessageProcessor>,
        cache: Option<Arc<dyn CacheRepository>>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            processor,
            cache,
            config,
            state: Arc::new(RwLock::new(SchedulerState::default())),
            tick_lock: Arc::new(Mutex::new(())),
            shutdown: Mutex::new(None),
        }
    }

    pub async fn start(&self) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.running {
            return Err(DomainError::SchedulerAlreadyRunning);
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        state.generation += 1;
        state.running = true;
        // Coarse signal that scheduling has begun; the first tick lands one interval later.
        state.next_tick = Some(Utc::now());
        *self.shutdown.lock().await = Some(shutdown_tx);

        let ticker = Ticker {
            processor: self.processor.clone(),
            state: self.state.clone(),
            tick_lock: self.tick_lock.clone(),
            interval: self.config.interval,
            batch_size: self.config.batch_size,
            generation: state.generation,
        };
        tokio::spawn(ticker.run(shutdown_rx));

        self.publish_status(SchedulerStatus::Running).await;

        info!(
            interval = ?self.config.interval,
            batch_size = self.config.batch_size,
            "scheduler started"
        );
        Ok(())
    }

    /// Cancels future ticks. A tick already in progress runs to completion.
    pub async fn stop(&self) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.running {
            return Err(DomainError::SchedulerNotRunning);
        }

        state.running = false;
        state.next_tick = None;
        if let Some(shutdown) = self.shutdown.lock().await.take() {
            let _ = shutdown.send(());
        }

        self.publish_status(SchedulerStatus::Stopped).await;

        info!("scheduler stopped");
        Ok(())
    }

    pub async fn status(&self) -> SchedulerInfo {
        let state = self.state.read().await;
        SchedulerInfo {
            status: if state.running {
                SchedulerStatus::Running
            } else {
                SchedulerStatus::Stopped
            },
            last_tick: state.last_tick,
            next_tick: state.next_tick,
            messages_sent: state.messages_sent,
            interval: self.config.interval,
            batch_size: self.config.batch_size,
        }
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    async fn publish_status(&self, status: SchedulerStatus) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(err) = cache.set_scheduler_status(status).await {
            warn!(status = status.as_str(), error = %err, "failed to cache scheduler status");
        }
    }
}

struct Ticker {
    processor: Arc<dyn PendingMessageProcessor>,
    state: Arc<RwLock<SchedulerState>>,
    tick_lock: Arc<Mutex<()>>,
    interval: Duration,
    batch_size: usize,
    generation: u64,
}

impl Ticker {
    async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticks = interval_at(Instant::now() + self.interval, self.interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticks.tick() => self.tick().await,
            }
        }
        debug!(generation = self.generation, "scheduler loop exited");
    }

    async fn tick(&self) {
        let _serial = self.tick_lock.lock().await;

        {
            let mut state = self.state.write().await;
            if !state.running || state.generation != self.generation {
                return;
            }
            let now = Utc::now();
            let step = chrono::Duration::from_std(self.interval).unwrap_or_else(|_| chrono::Duration::zero());
            state.last_tick = Some(now);
            state.next_tick = Some(now + step);
        }

        info!("starting scheduled message processing");

        // Run the batch in its own task so a panic surfaces as a JoinError
        // instead of tearing down the timer loop.
        let processor = self.processor.clone();
        let batch_size = self.batch_size;
        let result = tokio::spawn(async move { processor.process_pending(batch_size).await }).await;

        match result {
            Ok(Ok(sent)) => {
                let mut state = self.state.write().await;
                state.messages_sent += sent as u64;
                info!(
                    messages_sent = sent,
                    total_sent = state.messages_sent,
                    "scheduled message processing completed"
                );
            }
            Ok(Err(err)) => error!(error = %err, "failed to process pending messages"),
            Err(err) => error!(error = %err, "scheduled message processing panicked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        infrastructure::cache::in_memory::InMemoryCacheRepository, test_support::FailingCache,
    };

    const INTERVAL: Duration = Duration::from_secs(60);

    struct StubProcessor {
        calls: AtomicUsize,
        sent_per_call: usize,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl StubProcessor {
        fn sending(sent_per_call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                sent_per_call,
                fail: false,
                gate: None,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::sending(0)
            }
        }

        fn gated(sent_per_call: usize, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::sending(sent_per_call)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PendingMessageProcessor for StubProcessor {
        async fn process_pending(&self, _batch_size: usize) -> anyhow::Result<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                anyhow::bail!("storage unavailable");
            }
            Ok(self.sent_per_call)
        }
    }

    fn scheduler(
        processor: Arc<StubProcessor>,
        cache: Option<Arc<dyn CacheRepository>>,
    ) -> MessageScheduler {
        MessageScheduler::new(
            processor,
            cache,
            SchedulerConfig {
                interval: INTERVAL,
                batch_size: 3,
            },
        )
    }

    #[tokio::test]
    async fn initial_status_is_stopped() {
        let scheduler = scheduler(Arc::new(StubProcessor::sending(0)), None);

        let status = scheduler.status().await;
        assert_eq!(status.status, SchedulerStatus::Stopped);
        assert!(status.last_tick.is_none());
        assert!(status.next_tick.is_none());
        assert_eq!(status.messages_sent, 0);
        assert_eq!(status.interval, INTERVAL);
        assert_eq!(status.batch_size, 3);
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_fails_and_stays_running() {
        let scheduler = scheduler(Arc::new(StubProcessor::sending(0)), None);

        scheduler.start().await.unwrap();
        let status = scheduler.status().await;
        assert!(status.is_running());
        assert!(status.next_tick.is_some());

        let err = scheduler.start().await.unwrap_err();
        assert!(matches!(err, DomainError::SchedulerAlreadyRunning));
        assert!(scheduler.status().await.is_running());
    }

    #[tokio::test]
    async fn stop_when_stopped_fails() {
        let scheduler = scheduler(Arc::new(StubProcessor::sending(0)), None);

        let err = scheduler.stop().await.unwrap_err();
        assert!(matches!(err, DomainError::SchedulerNotRunning));
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_happens_one_interval_after_start() {
        let processor = Arc::new(StubProcessor::sending(1));
        let scheduler = scheduler(processor.clone(), None);

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL - Duration::from_millis(1)).await;
        assert_eq!(processor.calls(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_accumulate_sent_count() {
        let processor = Arc::new(StubProcessor::sending(2));
        let scheduler = scheduler(processor.clone(), None);

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL * 3 + Duration::from_millis(1)).await;

        let status = scheduler.status().await;
        assert_eq!(processor.calls(), 3);
        assert_eq!(status.messages_sent, 6);
        let last_tick = status.last_tick.unwrap();
        let next_tick = status.next_tick.unwrap();
        assert!(next_tick > last_tick);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_keeps_last_tick_and_count() {
        let processor = Arc::new(StubProcessor::sending(2));
        let scheduler = scheduler(processor.clone(), None);

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        let before = scheduler.status().await;

        scheduler.stop().await.unwrap();
        let after = scheduler.status().await;

        assert!(!after.is_running());
        assert!(after.next_tick.is_none());
        assert_eq!(after.last_tick, before.last_tick);
        assert_eq!(after.messages_sent, 2);

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sent_count_survives_restart() {
        let processor = Arc::new(StubProcessor::sending(1));
        let scheduler = scheduler(processor.clone(), None);

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        scheduler.stop().await.unwrap();

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;

        assert_eq!(processor.calls(), 2);
        assert_eq!(scheduler.status().await.messages_sent, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn processing_error_leaves_count_and_keeps_ticking() {
        let processor = Arc::new(StubProcessor::failing());
        let scheduler = scheduler(processor.clone(), None);

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(1)).await;

        let status = scheduler.status().await;
        assert_eq!(processor.calls(), 2);
        assert_eq!(status.messages_sent, 0);
        assert!(status.last_tick.is_some());
        assert!(status.is_running());
    }

    struct PanicOnceProcessor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PendingMessageProcessor for PanicOnceProcessor {
        async fn process_pending(&self, _batch_size: usize) -> anyhow::Result<usize> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("batch blew up");
            }
            Ok(1)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_batch_does_not_kill_the_timer() {
        let processor = Arc::new(PanicOnceProcessor {
            calls: AtomicUsize::new(0),
        });
        let scheduler = MessageScheduler::new(
            processor.clone(),
            None,
            SchedulerConfig {
                interval: INTERVAL,
                batch_size: 3,
            },
        );

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(1)).await;

        let status = scheduler.status().await;
        assert_eq!(processor.calls.load(Ordering::SeqCst), 2);
        assert_eq!(status.messages_sent, 1);
        assert!(scheduler.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_running_scheduler_ends_its_ticks() {
        let processor = Arc::new(StubProcessor::sending(1));
        let scheduler = scheduler(processor.clone(), None);

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        assert_eq!(processor.calls(), 1);

        drop(scheduler);
        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_does_not_interrupt_in_flight_tick() {
        let gate = Arc::new(Notify::new());
        let processor = Arc::new(StubProcessor::gated(4, gate.clone()));
        let scheduler = scheduler(processor.clone(), None);

        scheduler.start().await.unwrap();
        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        assert_eq!(processor.calls(), 1);

        scheduler.stop().await.unwrap();
        assert!(!scheduler.status().await.is_running());

        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(scheduler.status().await.messages_sent, 4);

        tokio::time::sleep(INTERVAL * 2).await;
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_publish_status_to_cache() {
        let cache = Arc::new(InMemoryCacheRepository::new());
        let scheduler = scheduler(
            Arc::new(StubProcessor::sending(0)),
            Some(cache.clone() as Arc<dyn CacheRepository>),
        );

        scheduler.start().await.unwrap();
        assert_eq!(
            cache.get_scheduler_status().await.unwrap(),
            Some(SchedulerStatus::Running)
        );

        scheduler.stop().await.unwrap();
        assert_eq!(
            cache.get_scheduler_status().await.unwrap(),
            Some(SchedulerStatus::Stopped)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cache_failure_never_fails_control_operations() {
        let scheduler = scheduler(
            Arc::new(StubProcessor::sending(0)),
            Some(Arc::new(FailingCache) as Arc<dyn CacheRepository>),
        );

        scheduler.start().await.unwrap();
        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running().await);
    }
}
