use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::session::Session;

/// Fan-out of one notification channel to any number of subscribers.
///
/// Subscribers whose receiver was dropped are pruned on the next broadcast.
pub(crate) struct EventBus<T> {
    subscribers: Arc<Mutex<Vec<Sender<T>>>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone> EventBus<T> {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn subscribe(&self) -> Receiver<T> {
        let (tx, rx) = unbounded::<T>();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub(crate) fn broadcast(&self, event: T) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// The four notification channels of the store.
#[derive(Clone)]
pub(crate) struct SessionEvents {
    pub(crate) focus_changed: EventBus<Session>,
    pub(crate) playback_state_changed: EventBus<Session>,
    pub(crate) media_changed: EventBus<Session>,
    pub(crate) timeline_changed: EventBus<Session>,
}

impl SessionEvents {
    pub(crate) fn new() -> Self {
        Self {
            focus_changed: EventBus::new(),
            playback_state_changed: EventBus::new(),
            media_changed: EventBus::new(),
            timeline_changed: EventBus::new(),
        }
    }
}
