//! One-shot completion cell.

use tokio::sync::watch;

/// A value that can be completed exactly once.
///
/// Completing an already-completed signal is a no-op and never blocks, so
/// any number of producers may race to complete it. Waiters registered
/// before or after completion all observe the first value.
#[derive(Debug)]
pub struct Signal<T> {
    slot: watch::Sender<Option<T>>,
}

impl<T: Clone> Signal<T> {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Complete the signal with `value`.
    ///
    /// Returns `false` (and drops `value`) if it was already completed.
    pub fn complete(&self, value: T) -> bool {
        self.slot.send_if_modified(move |slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        })
    }

    pub fn is_completed(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Current value, without waiting.
    pub fn get(&self) -> Option<T> {
        self.slot.borrow().clone()
    }

    /// Wait until the signal is completed and return its value.
    pub async fn wait(&self) -> T {
        let mut rx = self.slot.subscribe();
        let value = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|slot| (*slot).clone());
        match value {
            Some(value) => value,
            // the sender lives in `self`, so the channel cannot close while we borrow it
            None => std::future::pending().await,
        }
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}
