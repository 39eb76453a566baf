//! Interval scheduler for continuous monitoring

use futures_util::future::BoxFuture;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub type CallbackError = Box<dyn Error + Send + Sync>;

/// Work run on every tick. Receives a token that is cancelled on stop.
pub type TickCallback =
    Arc<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<(), CallbackError>> + Send + Sync>;

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Scheduler that invokes a callback every `interval` until stopped
pub struct WatchScheduler {
    interval: Duration,
    callback: TickCallback,
    state: Arc<RwLock<Option<Running>>>,
}

impl WatchScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `interval` - Time between ticks (non-zero, and small enough to add to the current instant)
    /// * `callback` - Work to run on each tick
    pub fn new(interval: Duration, callback: TickCallback) -> Result<Self, CallbackError> {
        if interval.is_zero() {
            return Err("Scheduler disabled: interval is 0".into());
        }
        if Instant::now().checked_add(interval).is_none() {
            return Err(format!("Scheduler disabled: interval {:?} is out of range", interval).into());
        }

        info!(
            interval_secs = interval.as_secs_f64(),
            "WatchScheduler: created with interval {:?}", interval
        );

        Ok(Self {
            interval,
            callback,
            state: Arc::new(RwLock::new(None)),
        })
    }

    /// Build a [`TickCallback`] from an async closure.
    pub fn callback<F, Fut>(f: F) -> TickCallback
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        Arc::new(move |token| Box::pin(f(token)))
    }

    /// Start the scheduler. The first tick fires one full interval from now.
    pub async fn start(&self) -> Result<(), CallbackError> {
        let mut state = self.state.write().await;
        if state.is_some() {
            return Err("WatchScheduler: already running".into());
        }

        let period = self.interval;
        let first_tick = Instant::now()
            .checked_add(period)
            .ok_or_else(|| format!("WatchScheduler: interval {:?} is out of range", period))?;

        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();
        let callback = self.callback.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut inflight: JoinSet<()> = JoinSet::new();
            let mut tick: u64 = 0;

            info!("WatchScheduler: started, waiting for first tick...");

            loop {
                tokio::select! {
                    biased;
                    _ = loop_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        tick += 1;
                        debug!(tick, inflight = inflight.len(), "WatchScheduler: tick");
                        let fut = callback(loop_cancel.child_token());
                        inflight.spawn(async move {
                            if let Err(e) = fut.await {
                                error!(tick, error = %e, "WatchScheduler: callback failed on tick {}", tick);
                            }
                        });
                    }
                    Some(joined) = inflight.join_next(), if !inflight.is_empty() => {
                        if let Err(e) = joined {
                            if e.is_panic() {
                                error!(error = %e, "WatchScheduler: callback panicked");
                            }
                        }
                    }
                }
            }

            inflight.shutdown().await;
            info!(ticks = tick, "WatchScheduler: loop exited");
        });

        *state = Some(Running { cancel, handle });
        info!("WatchScheduler: started successfully");
        Ok(())
    }

    /// Stop the scheduler and wait for its loop to exit.
    ///
    /// Returns immediately when the scheduler is not running.
    pub async fn stop(&self) {
        let running = self.state.write().await.take();
        if let Some(Running { cancel, handle }) = running {
            cancel.cancel();
            if let Err(e) = handle.await {
                error!(error = %e, "WatchScheduler: loop terminated abnormally");
            }
            info!("WatchScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        self.state.read().await.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
