//! Outcome observers.

use std::ptr;
use std::sync::{Arc, Weak};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use crate::core::Outcome;

/// Receives outcomes from a worker.
///
/// `notify` runs synchronously on the worker's thread, so a slow listener
/// stalls that worker. Listeners must not register or unregister themselves
/// with the worker that is notifying them.
pub trait Listener: Send + Sync {
    fn notify(&self, outcome: &Outcome);
}

impl<F> Listener for F
where
    F: Fn(&Outcome) + Send + Sync,
{
    fn notify(&self, outcome: &Outcome) {
        self(outcome)
    }
}

/// Listener that forwards a copy of every outcome into a channel.
///
/// Lets a caller block on a reply with its own timeout
/// (`Receiver::recv_timeout`), which the queue and workers do not provide.
pub struct ChannelListener {
    sender: Sender<Outcome>,
}

impl ChannelListener {
    /// Creates a listener and the receiving end of its channel.
    pub fn pair() -> (Arc<dyn Listener>, Receiver<Outcome>) {
        let (sender, receiver) = unbounded();
        (Arc::new(Self { sender }), receiver)
    }
}

impl Listener for ChannelListener {
    fn notify(&self, outcome: &Outcome) {
        if self.sender.send(outcome.clone()).is_err() {
            debug!("Reply channel closed, dropping {:?} outcome", outcome.status);
        }
    }
}

/// Reply destination of an event.
///
/// Holds the listener weakly: a queued event never keeps its caller alive,
/// and the reference is only used for routing and for identity comparison.
#[derive(Clone)]
pub struct ReplyTo(Weak<dyn Listener>);

impl ReplyTo {
    pub fn new(listener: &Arc<dyn Listener>) -> Self {
        Self(Arc::downgrade(listener))
    }

    /// Whether this destination is the given listener allocation.
    pub fn is<L: ?Sized>(&self, listener: &Arc<L>) -> bool {
        ptr::addr_eq(self.0.as_ptr(), Arc::as_ptr(listener))
    }

    /// The listener, if it is still alive.
    pub fn upgrade(&self) -> Option<Arc<dyn Listener>> {
        self.0.upgrade()
    }
}

impl std::fmt::Debug for ReplyTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReplyTo({:p})", self.0.as_ptr().cast::<()>())
    }
}
