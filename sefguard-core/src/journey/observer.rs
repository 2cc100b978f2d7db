use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::constants::EVENT_LOG_DEFAULT_CAPACITY;
use crate::journey::JourneyEvent;
use crate::state::JourneyState;

/// Display consumer notified after every journey change.
///
/// Observers receive a read-only snapshot; they never own or mutate the state.
pub trait JourneyObserver: Send {
    fn on_change(&mut self, state: &JourneyState, event: &JourneyEvent);
}

impl<F> JourneyObserver for F
where
    F: FnMut(&JourneyState, &JourneyEvent) + Send,
{
    fn on_change(&mut self, state: &JourneyState, event: &JourneyEvent) {
        self(state, event);
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Bounded recording observer. Clones share the same buffer, so a test or
/// host can keep one handle while the session owns the other.
#[derive(Debug, Clone)]
pub struct EventLog {
    inner: Arc<Mutex<VecDeque<(JourneyEvent, JourneyState)>>>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(EVENT_LOG_DEFAULT_CAPACITY)
    }
}

impl EventLog {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity: capacity.max(1),
        }
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<JourneyEvent> {
        self.entries().into_iter().map(|(event, _)| event).collect()
    }

    /// Recorded `(event, snapshot-after-event)` pairs, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<(JourneyEvent, JourneyState)> {
        self.buffer().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    /// Lock the buffer. A panic in another holder leaves the queue itself
    /// intact, so a poisoned lock is logged and recovered.
    fn buffer(&self) -> MutexGuard<'_, VecDeque<(JourneyEvent, JourneyState)>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("event log lock poisoned; recovering buffer");
            poisoned.into_inner()
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JourneyObserver for EventLog {
    fn on_change(&mut self, state: &JourneyState, event: &JourneyEvent) {
        let mut guard = self.buffer();
        if guard.len() == self.capacity {
            guard.pop_front();
        }
        guard.push_back((*event, state.clone()));
    }
}
