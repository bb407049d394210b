//! Task-backed listeners for the monitors
//!
//! Each listener runs as a tokio task owned by a handle. Dropping the handle
//! cancels the task, so a monitor can never outlive the page that mounted it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dwell::DwellMonitor;
use crate::scroll::{ScrollMetrics, ScrollMonitor};

/// Owner of a running listener task.
pub struct MonitorHandle {
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    fn new(shutdown: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            shutdown,
            task: Some(task),
        }
    }

    /// Whether the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancel the listener and wait for it to detach.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Listener task failed");
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Run a scroll monitor over a stream of scroll samples.
///
/// Samples arriving while a previous one is being handled coalesce in the
/// watch channel, and at most one sample is processed per `throttle` window.
/// The latest sample is always processed eventually. The listener detaches
/// when the handle is dropped or the sender goes away.
pub fn spawn_scroll_listener(
    mut monitor: ScrollMonitor,
    mut samples: watch::Receiver<ScrollMetrics>,
    throttle: Duration,
) -> MonitorHandle {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();

    let task = tokio::spawn(async move {
        debug!("Scroll listener attached");
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                changed = samples.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let metrics = *samples.borrow_and_update();
                    monitor.observe(metrics);
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(throttle) => {}
                    }
                }
            }
        }
        debug!("Scroll listener detached");
    });

    MonitorHandle::new(shutdown, task)
}

/// Handle of a running dwell listener.
pub struct DwellHandle {
    monitor: Arc<Mutex<DwellMonitor>>,
    handle: MonitorHandle,
}

impl DwellHandle {
    /// The page is unloading: emit `page_exit` and tear down.
    ///
    /// Returns the seconds spent on the page.
    pub fn unload(self) -> u64 {
        lock(&self.monitor).exit()
    }

    /// Tear down without reporting an exit.
    pub async fn stop(self) {
        self.handle.stop().await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Poll a dwell monitor on a fixed interval.
///
/// The first check happens one interval after mount.
pub fn spawn_dwell_listener(monitor: DwellMonitor, poll_interval: Duration) -> DwellHandle {
    let period = poll_interval.max(Duration::from_millis(1));
    let monitor = Arc::new(Mutex::new(monitor));
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    let polled = Arc::clone(&monitor);

    let task = tokio::spawn(async move {
        debug!(?period, "Dwell listener attached");
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    lock(&polled).check();
                }
            }
        }
        debug!("Dwell listener detached");
    });

    DwellHandle {
        monitor,
        handle: MonitorHandle::new(shutdown, task),
    }
}

fn lock(monitor: &Mutex<DwellMonitor>) -> MutexGuard<'_, DwellMonitor> {
    monitor.lock().unwrap_or_else(PoisonError::into_inner)
}
