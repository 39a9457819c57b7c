// src/watch/watcher.rs

use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::registry::Registry;
use crate::watch::event_handler::process_event;
use crate::watch::filter::PathFilter;

/// Handle for the filesystem watcher.
///
/// Owns the `notify` watcher and the event-loop task. Dropping the handle
/// stops notifications; [`WatcherHandle::shutdown`] also waits for the loop
/// to drain.
pub struct WatcherHandle {
    inner: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// Stop watching and wait for the event loop to finish.
    ///
    /// Dropping the `notify` watcher drops both channel senders held by its
    /// callback, which is what ends the loop.
    pub async fn shutdown(self) {
        let WatcherHandle { inner, task } = self;
        drop(inner);
        if let Err(err) = task.await {
            warn!("watcher event loop ended abnormally: {err}");
        }
    }
}

/// Start watching the registry root and reloading datasets on change.
///
/// - `filter` must be the same filter used for the bootstrap walk.
/// - `mode` is `NonRecursive` unless subdirectories should be live too.
///
/// Must be called from within a tokio runtime.
pub fn spawn_watcher(
    registry: Arc<Registry>,
    filter: Arc<dyn PathFilter>,
    mode: RecursiveMode,
) -> Result<WatcherHandle> {
    // Two queues from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let (error_tx, error_rx) = mpsc::unbounded_channel::<notify::Error>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // Send failures only happen once the loop is gone; nothing to do.
            match res {
                Ok(event) => {
                    let _ = event_tx.send(event);
                }
                Err(err) => {
                    let _ = error_tx.send(err);
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(registry.root(), mode)?;

    info!(root = ?registry.root(), ?mode, "file watcher started");

    let task = tokio::spawn(run_event_loop(registry, filter, event_rx, error_rx));

    Ok(WatcherHandle {
        inner: watcher,
        task,
    })
}

/// Consume data and error events until both channels are closed.
async fn run_event_loop(
    registry: Arc<Registry>,
    filter: Arc<dyn PathFilter>,
    mut events: mpsc::UnboundedReceiver<Event>,
    mut errors: mpsc::UnboundedReceiver<notify::Error>,
) {
    let mut events_open = true;
    let mut errors_open = true;

    while events_open || errors_open {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => {
                    debug!(?event, "received notify event");
                    process_event(&registry, &filter, event).await;
                }
                None => events_open = false,
            },
            err = errors.recv(), if errors_open => match err {
                Some(err) => warn!(error = %err, "file watch error"),
                None => errors_open = false,
            },
        }
    }

    debug!("watcher event loop finished");
}
