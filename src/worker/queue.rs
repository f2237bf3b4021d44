//! Shared priority queue of image events.
//!
//! Any number of producers push and any number of workers pop. Workers that
//! find the queue empty park on a condition variable and are all woken by
//! the next push.
//!
//! ## Ordering
//! - **High**: inserted at the front
//! - **Medium**: inserted at `len / 2` of the queue at the time of the push
//! - **Low**: appended
//!
//! Low events are FIFO among themselves. High events are LIFO among
//! themselves: the most recent High push is popped first. Medium placement
//! depends on the instantaneous length, so it is an approximation of a
//! three-band queue and not a strict priority heap.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use crate::core::{ImageEvent, Listener, Priority};

const DEFAULT_CAPACITY: usize = 100;

struct QueueState {
    items: VecDeque<ImageEvent>,
    /// Number of events ever pushed
    counter: u64,
}

pub struct Queue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl Queue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                counter: 0,
            }),
            available: Condvar::new(),
        }
    }

    /// Inserts an event according to its priority and wakes every parked worker.
    pub fn push(&self, event: ImageEvent) {
        let mut state = self.state.lock();
        let priority = event.priority();
        match priority {
            Priority::High => state.items.push_front(event),
            Priority::Medium => {
                let pos = state.items.len() / 2;
                state.items.insert(pos, event);
            }
            Priority::Low => state.items.push_back(event),
        }
        state.counter += 1;
        debug!("Queued {} priority event, {} waiting", priority, state.items.len());

        self.available.notify_all();
    }

    /// Takes the front event, parking until a push or [`wake_all`](Self::wake_all)
    /// if the queue is empty.
    ///
    /// A wake-up does not guarantee work: another worker may have taken the
    /// new event first, in which case this returns `None`.
    pub fn pop(&self) -> Option<ImageEvent> {
        self.pop_unless(|| false)
    }

    /// Like [`pop`](Self::pop) but parks for at most `timeout`.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<ImageEvent> {
        let mut state = self.state.lock();
        if state.items.is_empty() {
            self.available.wait_for(&mut state, timeout);
        }
        state.items.pop_front()
    }

    /// Like [`pop`](Self::pop), but returns `None` without taking anything once
    /// `cancelled` reports true.
    ///
    /// `cancelled` is evaluated under the queue lock, so a flag set before
    /// [`wake_all`](Self::wake_all) is always observed: either here, or by the
    /// wake-up that follows.
    pub fn pop_unless(&self, cancelled: impl Fn() -> bool) -> Option<ImageEvent> {
        let mut state = self.state.lock();
        if cancelled() {
            return None;
        }
        if let Some(event) = state.items.pop_front() {
            return Some(event);
        }

        self.available.wait(&mut state);

        if cancelled() {
            return None;
        }
        state.items.pop_front()
    }

    /// Wakes every parked caller of `pop` without adding work.
    pub fn wake_all(&self) {
        let _state = self.state.lock();
        self.available.notify_all();
    }

    /// Removes every queued event regardless of who sent it.
    pub fn flush_all(&self) -> usize {
        let mut state = self.state.lock();
        let size = state.items.len();
        state.items.clear();

        info!("Flushed queue of {} items", size);
        size
    }

    /// Removes the events whose reply destination is `listener`, keeping the
    /// order of everything else.
    pub fn flush_for(&self, listener: &Arc<dyn Listener>) -> usize {
        let mut state = self.state.lock();
        let before = state.items.len();
        state
            .items
            .retain(|event| !event.reply_to().is_some_and(|reply| reply.is(listener)));
        let removed = before - state.items.len();

        info!("Flushed {} of {} queued items for listener", removed, before);
        removed
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Number of events pushed since the queue was created.
    pub fn counter(&self) -> u64 {
        self.state.lock().counter
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        write!(
            f,
            "Queue has received {} items and currently has {} items waiting to be processed",
            state.counter,
            state.items.len()
        )
    }
}
