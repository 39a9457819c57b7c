// src/watch/event_handler.rs

//! Turns a single `notify` event into registry reloads.

use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Event, EventKind};
use tracing::{debug, error, trace, warn};

use crate::registry::{Registry, ReloadOutcome};
use crate::watch::filter::PathFilter;

/// Whether an event kind should cause a reload.
///
/// Creates and content writes do; renames, removals, metadata changes
/// (chmod) and accesses do not. `Modify(Any)` is what the polling and
/// kqueue backends report for plain writes.
pub fn is_reload_trigger(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}

/// Process one data event: reload every path in it that passes `filter`.
///
/// Reloads run on the blocking pool and are awaited one by one. Errors are
/// logged; the caller's loop keeps going regardless.
pub async fn process_event(registry: &Arc<Registry>, filter: &Arc<dyn PathFilter>, event: Event) {
    if !is_reload_trigger(&event.kind) {
        trace!(kind = ?event.kind, "ignoring event kind");
        return;
    }

    for path in event.paths {
        let Some(key) = registry.key_for(&path) else {
            warn!(path = ?path, root = ?registry.root(), "event path is outside the watch root");
            continue;
        };
        if !filter.matches(&key) {
            trace!(key = %key, "event filtered out");
            continue;
        }

        let reg = Arc::clone(registry);
        match tokio::task::spawn_blocking(move || reg.reload(&path)).await {
            Ok(Ok(ReloadOutcome::Replaced { .. })) => {}
            Ok(Ok(outcome)) => debug!(?outcome, "reload did not replace entry"),
            Ok(Err(err)) => warn!(key = %key, error = %err, "reload failed"),
            Err(err) => error!(key = %key, error = %err, "reload task panicked"),
        }
    }
}
