use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::models::Transition;
use crate::page::{lock_page, ElementId, SharedPage};

/// A running show/hide animation and the task that settles it.
pub struct TransitionHandle {
    pub element: ElementId,
    pub transition: Transition,
    pub epoch: u64,
    task: JoinHandle<()>,
}

impl TransitionHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Settles `transition` on `element` once `duration` has elapsed, unless a
/// later transition or instant apply has bumped the element's epoch.
pub fn spawn_completion(
    page: SharedPage,
    element: ElementId,
    transition: Transition,
    epoch: u64,
    duration: Duration,
) -> TransitionHandle {
    let task = tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        let settled = lock_page(&page).complete_transition(element, transition, epoch);
        if settled {
            tracing::debug!("Element {} settled after {:?}", element, transition);
        } else {
            tracing::debug!("Stale {:?} completion for element {} dropped", transition, element);
        }
    });

    TransitionHandle {
        element,
        transition,
        epoch,
        task,
    }
}

/// At most one pending completion per element.
#[derive(Default)]
pub struct TransitionTracker {
    pending: HashMap<ElementId, TransitionHandle>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `handle`, cancelling whatever was pending for its element.
    pub fn track(&mut self, handle: TransitionHandle) {
        if let Some(previous) = self.pending.insert(handle.element, handle) {
            if !previous.is_finished() {
                tracing::debug!(
                    "Cancelling {:?} (epoch {}) on element {}",
                    previous.transition,
                    previous.epoch,
                    previous.element
                );
            }
            previous.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.cancel();
        }
    }

    pub fn prune(&mut self) {
        self.pending.retain(|_, handle| !handle.is_finished());
    }

    pub fn pending(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }

    #[cfg(test)]
    pub fn get(&self, element: ElementId) -> Option<&TransitionHandle> {
        self.pending.get(&element)
    }
}

impl Drop for TransitionTracker {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
