//! Scheduled refresh of reactive cells
//!
//! The `Poller` owns the spawned tick loops; each `spawn_*` call returns
//! a `PolledVar` handle exposing the cell, a tokio watch subscription,
//! and an explicit stop hook so tests never leak timers.
//!
//! Two refresh shapes exist:
//!
//! - `spawn_polled`: the producer is awaited inline, so at most one
//!   invocation is in flight per cell; a tick that would overlap a
//!   still-pending one is dropped, not queued
//! - `spawn_fetch_polled`: each tick launches its fetch concurrently and
//!   a monotonic sequence guard discards completions older than the last
//!   applied one, so an early response can never be overwritten by a
//!   stale late one

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cell_store::{Cell, SubscriptionId};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::error::{PollError, Result};
use crate::rule::PollRule;

/// Handle to one polled variable
///
/// Exposes the current value (`get`), ordered synchronous subscription
/// (`subscribe`), an async watch channel (`watch`), and teardown
/// (`stop`). Cloning the handle is cheap and shares the same cell and
/// shutdown signal.
pub struct PolledVar<T> {
    name: String,
    cell: Cell<T>,
    watch_rx: watch::Receiver<T>,
    shutdown: Arc<AtomicBool>,
}

impl<T: Clone + Send + Sync + 'static> PolledVar<T> {
    /// The variable's name, used in log output
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone of the current value
    pub fn get(&self) -> T {
        self.cell.get()
    }

    /// The underlying cell
    pub fn cell(&self) -> &Cell<T> {
        &self.cell
    }

    /// A watch receiver that observes every published value
    ///
    /// The receiver is seeded with the value current at spawn time;
    /// `changed()` resolves on each subsequent publication.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.watch_rx.clone()
    }

    /// Register an ordered synchronous callback on the cell
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.cell.subscribe(callback)
    }

    /// Remove a callback registered with `subscribe`
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.cell.unsubscribe(id)
    }

    /// Signal the tick loop to stop
    ///
    /// Takes effect at the next tick boundary; in-flight fetch
    /// completions are discarded. The cell itself stays readable.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Whether `stop` has been called (or the owning poller shut down)
    pub fn is_stopped(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

impl<T> Clone for PolledVar<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            cell: self.cell.clone(),
            watch_rx: self.watch_rx.clone(),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

struct PollTask {
    name: String,
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns tick loops for a set of polled variables
///
/// All loops run until `shutdown` or their individual `stop`; dropping
/// the poller does not silently detach them, so call `shutdown` in
/// teardown paths.
///
/// Must be used from within a tokio runtime.
#[derive(Default)]
pub struct Poller {
    tasks: Mutex<Vec<PollTask>>,
}

impl Poller {
    /// Create an empty poller
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spawned tick loops (stopped ones included until
    /// `shutdown`)
    pub fn task_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Stop every tick loop and abort its task
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock();
        for task in tasks.drain(..) {
            task.shutdown.store(true, Ordering::Relaxed);
            task.handle.abort();
            debug!(var = %task.name, "poll task shut down");
        }
    }

    /// Create a cell seeded with `initial` and refresh it per `rule`
    ///
    /// On each tick the producer runs, its output goes through
    /// postprocess, and the result is published. A failed tick is logged
    /// and skipped; the previous value is retained and the cadence is
    /// unchanged (no retry acceleration).
    pub fn spawn_polled<R, T>(&self, name: &str, initial: T, rule: PollRule<R, T>) -> PolledVar<T>
    where
        R: Send + 'static,
        T: Clone + Send + Sync + 'static,
    {
        let (cell, watch_rx) = bridged_cell(initial);
        let shutdown = Arc::new(AtomicBool::new(false));

        let loop_cell = cell.clone();
        let loop_shutdown = Arc::clone(&shutdown);
        let var = name.to_string();
        let handle = tokio::spawn(async move {
            let PollRule {
                interval,
                producer,
                postprocess,
            } = rule;
            let mut ticker = tokio::time::interval(interval);
            // Ticks missed while the producer is still running are
            // dropped, not queued
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if loop_shutdown.load(Ordering::Relaxed) {
                    break;
                }
                let raw = match producer().await {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(var = %var, error = %e, "producer failed, keeping previous value");
                        continue;
                    }
                };
                match postprocess(raw) {
                    Ok(value) => loop_cell.set(value),
                    Err(e) => {
                        warn!(var = %var, error = %e, "postprocess failed, keeping previous value");
                    }
                }
            }
            debug!(var = %var, "poll loop stopped");
        });

        self.track(name, Arc::clone(&shutdown), handle);
        PolledVar {
            name: name.to_string(),
            cell,
            watch_rx,
            shutdown,
        }
    }

    /// Create a cell refreshed by an asynchronous fetch-and-parse cycle
    ///
    /// Each tick starts `fetch` without waiting for earlier ticks to
    /// complete. When a fetch resolves, its body is parsed and
    /// published; a rejected fetch or failed parse leaves the previous
    /// value untouched. Completions are applied under a monotonic
    /// sequence guard: a resolution belonging to an older tick than the
    /// last applied one is discarded.
    pub fn spawn_fetch_polled<T, Fe, Pa>(
        &self,
        name: &str,
        initial: T,
        interval: Duration,
        fetch: Fe,
        parse: Pa,
    ) -> Result<PolledVar<T>>
    where
        T: Clone + Send + Sync + 'static,
        Fe: Fn() -> BoxFuture<'static, Result<String>> + Send + Sync + 'static,
        Pa: Fn(&str) -> Result<T> + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(PollError::InvalidInterval);
        }

        let (cell, watch_rx) = bridged_cell(initial);
        let shutdown = Arc::new(AtomicBool::new(false));
        let parse = Arc::new(parse);
        // Tick number of the last applied completion
        let applied = Arc::new(Mutex::new(0u64));

        let loop_cell = cell.clone();
        let loop_shutdown = Arc::clone(&shutdown);
        let var = name.to_string();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut seq: u64 = 0;
            loop {
                ticker.tick().await;
                if loop_shutdown.load(Ordering::Relaxed) {
                    break;
                }
                seq += 1;
                let tick = seq;
                let fut = fetch();
                let cell = loop_cell.clone();
                let parse = Arc::clone(&parse);
                let applied = Arc::clone(&applied);
                let shutdown = Arc::clone(&loop_shutdown);
                let var = var.clone();
                tokio::spawn(async move {
                    let body = match fut.await {
                        Ok(body) => body,
                        Err(e) => {
                            debug!(var = %var, tick, error = %e, "fetch failed, keeping previous value");
                            return;
                        }
                    };
                    let value = match parse(&body) {
                        Ok(value) => value,
                        Err(e) => {
                            debug!(var = %var, tick, error = %e, "parse failed, keeping previous value");
                            return;
                        }
                    };
                    if shutdown.load(Ordering::Relaxed) {
                        return;
                    }
                    let mut last = applied.lock();
                    if tick > *last {
                        *last = tick;
                        cell.set(value);
                    } else {
                        debug!(var = %var, tick, last = *last, "stale completion discarded");
                    }
                });
            }
            debug!(var = %var, "fetch poll loop stopped");
        });

        self.track(name, Arc::clone(&shutdown), handle);
        Ok(PolledVar {
            name: name.to_string(),
            cell,
            watch_rx,
            shutdown,
        })
    }

    fn track(&self, name: &str, shutdown: Arc<AtomicBool>, handle: JoinHandle<()>) {
        self.tasks.lock().push(PollTask {
            name: name.to_string(),
            shutdown,
            handle,
        });
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("task_count", &self.task_count())
            .finish()
    }
}

/// Cell plus a watch channel fed by a cell subscription, so async
/// consumers observe the same publications as synchronous ones
fn bridged_cell<T: Clone + Send + Sync + 'static>(initial: T) -> (Cell<T>, watch::Receiver<T>) {
    let cell = Cell::new(initial.clone());
    let (tx, rx) = watch::channel(initial);
    cell.subscribe(move |value: &T| {
        // Receivers may all be gone; publishing is still fine
        let _ = tx.send(value.clone());
    });
    (cell, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::AtomicU64;

    #[tokio::test]
    async fn test_polled_var_publishes_values() {
        let poller = Poller::new();
        let rule = PollRule::new(
            Duration::from_millis(10),
            || async { Ok(7u32) },
            |n| Ok(n * 10),
        )
        .unwrap();

        let var = poller.spawn_polled("test", 0u32, rule);
        let mut watcher = var.watch();

        watcher.changed().await.unwrap();
        assert_eq!(*watcher.borrow(), 70);
        assert_eq!(var.get(), 70);

        poller.shutdown();
    }

    #[tokio::test]
    async fn test_watch_seeded_with_initial() {
        let poller = Poller::new();
        let rule = PollRule::new(
            Duration::from_secs(3600),
            || async { Ok(1u32) },
            Ok,
        )
        .unwrap();

        let var = poller.spawn_polled("seed", 5u32, rule);
        assert_eq!(*var.watch().borrow(), 5);

        poller.shutdown();
    }

    #[tokio::test]
    async fn test_zero_interval_fetch_rejected() {
        let poller = Poller::new();
        let result = poller.spawn_fetch_polled(
            "bad",
            String::new(),
            Duration::ZERO,
            || async { Ok(String::new()) }.boxed(),
            |s: &str| Ok(s.to_string()),
        );

        assert!(matches!(result, Err(PollError::InvalidInterval)));
    }

    #[tokio::test]
    async fn test_stop_halts_ticks() {
        let poller = Poller::new();
        let calls = Arc::new(AtomicU64::new(0));

        let calls_clone = Arc::clone(&calls);
        let rule = PollRule::new(
            Duration::from_millis(10),
            move || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(0u32)
                }
            },
            Ok,
        )
        .unwrap();

        let var = poller.spawn_polled("stoppable", 0u32, rule);
        tokio::time::sleep(Duration::from_millis(50)).await;
        var.stop();
        assert!(var.is_stopped());

        let at_stop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;

        // One tick may already have been in flight when stop was called
        assert!(calls.load(Ordering::SeqCst) <= at_stop + 1);

        poller.shutdown();
        assert_eq!(poller.task_count(), 0);
    }
}
