use crate::error::{DashboardError, DashboardErrorExt};
use crate::repository::StatsRepository;
use autoani_domain::events::CatalogEvent;
use autoani_events::{EventBus, EventReceiverExt};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Background task persisting every [`CatalogEvent`] into the `activity` table and
/// keeping only the newest `retention` entries.
///
/// Clones share the same task. [`ActivityRecorder::shutdown`] stops it after the
/// events already queued are written.
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    stop: Arc<Notify>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ActivityRecorder {
    /// Subscribes before returning, so events published afterwards are never missed.
    /// Must run inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`DashboardError::Events`] when the subscription cannot be created.
    pub fn spawn(repo: StatsRepository, events: &EventBus, retention: u64) -> Result<Self, DashboardError> {
        let mut receiver = events.subscribe::<CatalogEvent>().context("Subscribing to catalog events")?;
        let stop = Arc::new(Notify::new());
        let stopped = Arc::clone(&stop);

        let task = tokio::spawn(async move {
            info!(retention, "Activity recorder started");
            loop {
                tokio::select! {
                    biased;
                    () = stopped.notified() => break,
                    event = receiver.recv_event() => match event {
                        Some(event) => persist(&repo, &event, retention).await,
                        None => break,
                    },
                }
            }
            while let Ok(event) = receiver.try_recv() {
                persist(&repo, &event, retention).await;
            }
            info!("Activity recorder stopped");
        });

        Ok(Self { stop, task: Arc::new(Mutex::new(Some(task))) })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Writes what is already queued, then ends the task. Later calls return at once.
    pub async fn shutdown(&self) {
        let Some(task) = self.task.lock().take() else {
            return;
        };
        self.stop.notify_one();
        if let Err(err) = task.await {
            warn!(error = %err, "Activity recorder ended abnormally");
        }
    }
}

async fn persist(repo: &StatsRepository, event: &CatalogEvent, retention: u64) {
    match repo.record(event).await {
        Ok(()) => debug!(kind = %event.kind, subject = %event.subject_id, "Activity recorded"),
        Err(err) => {
            warn!(error = %err, kind = %event.kind, "Failed to record activity");
            return;
        },
    }
    if let Err(err) = repo.prune_activity(retention).await {
        warn!(error = %err, "Failed to prune activity");
    }
}
