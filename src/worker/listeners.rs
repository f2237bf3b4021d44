use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{Listener, Outcome, ReplyTo};

/// Listeners registered with one worker.
///
/// Identity is the `Arc` allocation, so the same listener can only be
/// registered once. The lock is held while an outcome is fanned out, which
/// makes registration changes and delivery mutually exclusive.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<dyn Listener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the listener is already registered.
    pub fn add(&self, listener: Arc<dyn Listener>) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Returns false if the listener was not registered.
    pub fn remove(&self, listener: &Arc<dyn Listener>) -> bool {
        let mut listeners = self.listeners.lock();
        match listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &Arc<dyn Listener>) -> bool {
        self.listeners.lock().iter().any(|l| Arc::ptr_eq(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// Notifies every registered listener except `skip`. Returns how many
    /// were notified.
    pub(crate) fn notify_all(&self, outcome: &Outcome, skip: Option<&ReplyTo>) -> usize {
        let listeners = self.listeners.lock();
        let mut notified = 0;
        for listener in listeners.iter() {
            if skip.is_some_and(|reply| reply.is(listener)) {
                continue;
            }
            listener.notify(outcome);
            notified += 1;
        }
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkerId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (Arc<AtomicUsize>, Arc<dyn Listener>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let listener: Arc<dyn Listener> = Arc::new(move |_: &Outcome| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (count, listener)
    }

    #[test]
    fn registration_is_idempotent() {
        let registry = ListenerRegistry::new();
        let (_, listener) = counting();

        assert!(!registry.contains(&listener));
        assert!(registry.add(Arc::clone(&listener)));
        assert!(!registry.add(Arc::clone(&listener)));
        assert!(registry.contains(&listener));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&listener));
        assert!(!registry.remove(&listener));
        assert!(registry.is_empty());
    }

    #[test]
    fn fan_out_skips_the_reply_destination() {
        let registry = ListenerRegistry::new();
        let (reply_count, reply) = counting();
        let (other_count, other) = counting();
        registry.add(Arc::clone(&reply));
        registry.add(other);

        let outcome = Outcome::ok(WorkerId(1), None, None);
        let notified = registry.notify_all(&outcome, Some(&ReplyTo::new(&reply)));

        assert_eq!(notified, 1);
        assert_eq!(reply_count.load(Ordering::SeqCst), 0);
        assert_eq!(other_count.load(Ordering::SeqCst), 1);
    }
}
