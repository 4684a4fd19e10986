#![allow(dead_code)]

//! Deferred follow-up email scheduling.
//!
//! The submission path enqueues; one background loop drains due tasks on a
//! fixed cadence and hands each to the [`Dispatcher`]. Dispatch runs outside
//! the queue lock, so a slow mail provider never blocks intake.

pub mod queue;
pub mod send_time;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

pub use queue::{FollowUpQueue, FollowUpTask};
use send_time::{next_morning_send_time, resolve_zone};

/// Outbound mail transport. One attempt per call; implementations must not
/// retry internally.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, recipient: &str, display_name: &str) -> anyhow::Result<()>;
}

/// A follow-up request as it leaves the submission handler.
#[derive(Debug, Clone)]
pub struct FollowUpRequest {
    pub email: String,
    pub name: String,
    /// IANA zone name from the form; `None` or junk falls back to UTC.
    pub timezone: Option<String>,
}

/// Owns the queue and the ticking loop. Constructed once in `main`, shared
/// through `AppState`, stoppable so tests never leak background activity.
pub struct FollowUpScheduler {
    queue: Arc<FollowUpQueue>,
    dispatcher: Arc<dyn Dispatcher>,
    poll_interval: Duration,
    started: AtomicBool,
    shutdown_tx: broadcast::Sender<()>,
}

impl FollowUpScheduler {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, poll_interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            queue: Arc::new(FollowUpQueue::new()),
            dispatcher,
            poll_interval,
            started: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    /// Queues a follow-up for 09:00 the next day in the applicant's zone.
    /// Fire-and-forget: the HTTP response never reflects the eventual send.
    pub fn schedule(&self, request: FollowUpRequest) {
        let zone = resolve_zone(request.timezone.as_deref());
        let send_time = next_morning_send_time(Utc::now(), zone);
        info!(recipient = %request.email, %zone, %send_time, "queued follow-up email");
        self.queue.enqueue(FollowUpTask {
            recipient: request.email,
            display_name: request.name,
            send_time,
        });
    }

    /// Launches the background tick loop. Two loops draining one queue must
    /// never exist, so a second call starts nothing, logs a warning, and
    /// returns `false`.
    pub fn start(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("follow-up scheduler already started; ignoring duplicate start");
            return false;
        }

        let queue = Arc::clone(&self.queue);
        let dispatcher = Arc::clone(&self.dispatcher);
        let poll_interval = self.poll_interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(
                interval_secs = poll_interval.as_secs(),
                "follow-up scheduler running"
            );
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        dispatch_due(&queue, dispatcher.as_ref(), Utc::now()).await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!("follow-up scheduler stopped");
                        break;
                    }
                }
            }
        });
        true
    }

    /// One drain-and-dispatch pass at an explicit instant. The tick loop
    /// calls this with the current time; tests call it directly.
    pub async fn run_once(&self, now: DateTime<Utc>) {
        dispatch_due(&self.queue, self.dispatcher.as_ref(), now).await;
    }

    /// Signals the tick loop to exit. Idempotent; harmless before `start`.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn queue(&self) -> &FollowUpQueue {
        &self.queue
    }
}

/// Dispatches everything due at `now`, one attempt per task. A failed send
/// is logged and dropped; it never stops the rest of the batch or later
/// ticks.
async fn dispatch_due(queue: &FollowUpQueue, dispatcher: &dyn Dispatcher, now: DateTime<Utc>) {
    for task in queue.drain_due(now) {
        match dispatcher.send(&task.recipient, &task.display_name).await {
            Ok(()) => info!(recipient = %task.recipient, "follow-up email sent"),
            Err(e) => {
                error!(recipient = %task.recipient, error = %e, "follow-up send failed; task dropped");
            }
        }
    }
}
