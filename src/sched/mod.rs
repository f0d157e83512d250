//! The reminder scheduler.
//!
//! A single loop wakes at each minute boundary and fires one tick: read a
//! fresh snapshot of the store, match users whose notification time equals
//! the current minute, and send each of them their pending tasks. Ticks
//! carry no state from one to the next; every tick is a complete,
//! independent unit of work.
//!
//! Each tick runs as its own spawned task so a slow one (e.g. a stalled
//! mail gateway) never delays the next minute. Within a tick, per-user
//! deliveries are independent tasks joined at tick end; one failure is
//! logged with the offending address and never blocks the rest.

mod aggregate;
mod matcher;

pub use aggregate::pending_descriptions;
pub use matcher::due_users;

use std::sync::Arc;
use std::time::Duration;

use chrono::{Timelike, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::notify::{Notifier, NotifyError};
use crate::store::Store;

/// Handle to the running scheduler loop.
pub struct Scheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    pub fn start(timezone: Tz, store: Store, notifier: Arc<dyn Notifier>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            SchedulerTask {
                timezone,
                store,
                notifier,
                shutdown_rx,
            }
            .run()
            .await;
        });
        Self {
            shutdown_tx,
            handle,
        }
    }

    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop future ticks and wait for in-flight dispatches to finish.
    pub async fn shutdown(self) {
        self.trigger_shutdown();
        if let Err(err) = self.handle.await {
            error!(?err, "scheduler task panicked");
        }
    }
}

struct SchedulerTask {
    timezone: Tz,
    store: Store,
    notifier: Arc<dyn Notifier>,
    shutdown_rx: watch::Receiver<bool>,
}

impl SchedulerTask {
    async fn run(mut self) {
        info!(timezone = %self.timezone, "starting reminder scheduler");

        let mut ticks: JoinSet<()> = JoinSet::new();
        let mut last_fired: Option<String> = None;

        loop {
            let minute = current_minute(&self.timezone);

            // At most one tick per wall-clock minute, even if the loop
            // wakes twice inside it.
            if last_fired.as_deref() != Some(minute.as_str()) {
                last_fired = Some(minute.clone());
                let store = self.store.clone();
                let notifier = Arc::clone(&self.notifier);
                ticks.spawn(async move {
                    run_tick(&store, notifier, &minute).await;
                });
            }

            tokio::select! {
                _ = sleep(until_next_minute(&self.timezone)) => {}
                Some(result) = ticks.join_next() => {
                    if let Err(err) = result {
                        error!(?err, "tick aborted");
                    }
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_ok() && *self.shutdown_rx.borrow() {
                        info!("scheduler shutting down");
                        break;
                    }
                }
            }
        }

        // Already-dispatched reminders get to finish.
        while let Some(result) = ticks.join_next().await {
            if let Err(err) = result {
                error!(?err, "tick aborted");
            }
        }
    }
}

/// One complete dispatch pass for the wall-clock minute `now` (`HH:MM`).
///
/// Reads a fresh snapshot, matches due users, and sends one reminder per
/// due user that has at least one pending task. A total store read
/// failure aborts the tick (a skipped minute, not a crash).
pub async fn run_tick(store: &Store, notifier: Arc<dyn Notifier>, now: &str) {
    let snapshot = match store.snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!(error = %err, "failed to read store, skipping this minute");
            return;
        }
    };

    let due = due_users(&snapshot.preferences, now);
    if due.is_empty() {
        return;
    }
    debug!(count = due.len(), minute = now, "users due for a reminder");

    let mut sends: JoinSet<(String, Result<(), NotifyError>)> = JoinSet::new();
    for email in due {
        let pending = pending_descriptions(&snapshot.tasks, &email);
        if pending.is_empty() {
            continue;
        }
        let notifier = Arc::clone(&notifier);
        let scheduled = now.to_string();
        sends.spawn(async move {
            let result = notifier.notify(&email, &pending, &scheduled).await;
            (email, result)
        });
    }

    while let Some(joined) = sends.join_next().await {
        match joined {
            Ok((email, Ok(()))) => info!(email = %email, "reminder sent"),
            Ok((email, Err(err))) => {
                warn!(email = %email, error = %err, "failed to send reminder");
            }
            Err(err) => error!(?err, "reminder task aborted"),
        }
    }
}

/// The current wall-clock minute in `tz`, zero-padded `HH:MM`.
fn current_minute(tz: &Tz) -> String {
    Utc::now().with_timezone(tz).format("%H:%M").to_string()
}

fn until_next_minute(tz: &Tz) -> Duration {
    let elapsed = u64::from(Utc::now().with_timezone(tz).second());
    Duration::from_secs((60 - elapsed.min(59)).max(1))
}
