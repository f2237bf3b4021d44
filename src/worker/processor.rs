//! The worker: one thread draining a shared [`Queue`].
//!
//! ## Lifecycle
//! ```text
//! Idle ──start()/run()──► Running ──stop()/ExitTask──► Stopping ──loop exits──► Stopped
//! ```
//! A worker is single-use: once it has left `Idle` it can never be started
//! again. Build a new worker (with a new id) instead.
//!
//! ## Event processing
//! - Tasks run in order against the event's image
//! - The first task error abandons the rest of the event and produces an
//!   `Error` outcome; the worker keeps running
//! - A panicking task is caught and produces an `Unknown` outcome
//! - An exit task stops the worker; no outcome is sent for its event
//! - Otherwise one `OK` outcome carries the final image
//!
//! `stop()` is cooperative: an in-flight task always runs to completion.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::core::{ImageEvent, Listener, Outcome, ReplyTo, WorkerId};
use crate::worker::error::{panic_message, WorkerError, WorkerResult};
use crate::worker::listeners::ListenerRegistry;
use crate::worker::queue::Queue;
use crate::worker::registry::{RunningGuard, WorkerRegistry};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPING: u8 = 2;
const STOPPED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            IDLE => Self::Idle,
            RUNNING => Self::Running,
            STOPPING => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

struct WorkerInner {
    id: WorkerId,
    queue: Arc<Queue>,
    state: AtomicU8,
    listeners: ListenerRegistry,
    registry: Option<Arc<WorkerRegistry>>,
    thread_name: String,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to a worker. Clones refer to the same worker.
#[derive(Clone)]
pub struct Worker {
    inner: Arc<WorkerInner>,
}

pub struct WorkerBuilder {
    id: WorkerId,
    queue: Arc<Queue>,
    registry: Option<Arc<WorkerRegistry>>,
    thread_name: Option<String>,
}

impl WorkerBuilder {
    /// Count this worker in `registry` while its loop runs.
    pub fn registry(mut self, registry: Arc<WorkerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    pub fn build(self) -> Worker {
        let thread_name = self
            .thread_name
            .unwrap_or_else(|| format!("image-worker-{}", self.id.0));
        Worker {
            inner: Arc::new(WorkerInner {
                id: self.id,
                queue: self.queue,
                state: AtomicU8::new(IDLE),
                listeners: ListenerRegistry::new(),
                registry: self.registry,
                thread_name,
                handle: Mutex::new(None),
            }),
        }
    }
}

impl Worker {
    pub fn new(id: WorkerId, queue: Arc<Queue>) -> Self {
        Self::builder(id, queue).build()
    }

    pub fn builder(id: WorkerId, queue: Arc<Queue>) -> WorkerBuilder {
        WorkerBuilder {
            id,
            queue,
            registry: None,
            thread_name: None,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.inner.id
    }

    /// The queue this worker drains. Push events here.
    pub fn queue(&self) -> &Arc<Queue> {
        &self.inner.queue
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.inner.state.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.load(Ordering::SeqCst) == RUNNING
    }

    /// Spawns the worker thread.
    pub fn start(&self) -> WorkerResult<()> {
        self.begin()?;
        let guard = self.inner.registry.as_ref().map(|r| r.enter());
        let worker = self.clone();

        let handle = thread::Builder::new()
            .name(self.inner.thread_name.clone())
            .spawn(move || worker.run_loop(guard))
            .map_err(|source| {
                self.inner.state.store(STOPPED, Ordering::SeqCst);
                WorkerError::Spawn {
                    worker: self.id(),
                    source,
                }
            })?;

        *self.inner.handle.lock() = Some(handle);
        Ok(())
    }

    /// Runs the worker loop on the calling thread until the worker stops.
    pub fn run(&self) -> WorkerResult<()> {
        self.begin()?;
        let guard = self.inner.registry.as_ref().map(|r| r.enter());
        self.run_loop(guard);
        Ok(())
    }

    /// Asks a running worker to stop once its current task finishes.
    /// Returns false if the worker was not running.
    pub fn stop(&self) -> bool {
        let requested = self
            .inner
            .state
            .compare_exchange(RUNNING, STOPPING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if requested {
            info!("{}: stop requested", self);
            self.inner.queue.wake_all();
        }
        requested
    }

    /// Waits for the thread spawned by [`start`](Self::start).
    ///
    /// Must not be called from a listener running on this worker's thread.
    pub fn join(&self) -> WorkerResult<()> {
        let handle = self.inner.handle.lock().take();
        match handle {
            Some(handle) => handle.join().map_err(|payload| WorkerError::Panicked {
                worker: self.id(),
                message: panic_message(&*payload),
            }),
            None => Ok(()),
        }
    }

    /// Registers a listener for every outcome. Returns false if it already is.
    pub fn add_listener(&self, listener: Arc<dyn Listener>) -> bool {
        let added = self.inner.listeners.add(listener);
        debug!("{}: registered a listener {}", self, added);
        added
    }

    pub fn remove_listener(&self, listener: &Arc<dyn Listener>) -> bool {
        let removed = self.inner.listeners.remove(listener);
        debug!("{}: unregistered a listener {}", self, removed);
        removed
    }

    pub fn has_listener(&self, listener: &Arc<dyn Listener>) -> bool {
        self.inner.listeners.contains(listener)
    }

    /// Executes every task of `event` and reports the outcome.
    pub fn process_event(&self, mut event: ImageEvent) {
        debug!("{}: processing {:?}", self, event);

        while let Some(task) = event.consume_next_task() {
            debug!("{}: running task {}", self, task.name());
            let result = panic::catch_unwind(AssertUnwindSafe(|| task.execute(&mut event)));

            match result {
                Ok(Ok(())) if task.stops_worker() => {
                    let dropped = event.clear_tasks();
                    if dropped > 0 {
                        warn!("{}: exit task discarded {} remaining tasks", self, dropped);
                    }
                    self.request_stop();
                    return;
                }
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(
                        "{}: task {} failed ({}), abandoning {} remaining tasks: {}",
                        self,
                        task.name(),
                        err.as_label(),
                        event.remaining_count(),
                        err.message()
                    );
                    let outcome = Outcome::error(
                        self.id(),
                        err.to_string(),
                        event.take_image(),
                        event.take_metadata(),
                    );
                    self.send_outcome(event.reply_to(), &outcome);
                    return;
                }
                Err(payload) => {
                    let message = format!(
                        "task {} panicked: {}",
                        task.name(),
                        panic_message(&*payload)
                    );
                    error!("{}: {}", self, message);
                    let outcome = Outcome::unknown(
                        self.id(),
                        message,
                        event.take_image(),
                        event.take_metadata(),
                    );
                    self.send_outcome(event.reply_to(), &outcome);
                    return;
                }
            }
        }

        let outcome = Outcome::ok(self.id(), event.take_image(), event.take_metadata());
        self.send_outcome(event.reply_to(), &outcome);
    }

    fn begin(&self) -> WorkerResult<()> {
        self.inner
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| WorkerError::AlreadyStarted(self.id()))
    }

    fn run_loop(&self, _running: Option<RunningGuard>) {
        let _exit = ExitGuard(self);
        info!("{}: started", self);

        while self.is_running() {
            // Blocks until work arrives, the queue is woken, or stop() is called
            let Some(event) = self.inner.queue.pop_unless(|| !self.is_running()) else {
                continue;
            };
            self.process_event(event);
        }
    }

    fn request_stop(&self) {
        info!("{}: exit task received", self);
        let state = &self.inner.state;
        if state
            .compare_exchange(RUNNING, STOPPING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // Processed outside a running loop; the worker can no longer start
            let _ = state.compare_exchange(IDLE, STOPPED, Ordering::SeqCst, Ordering::SeqCst);
        }
    }

    fn send_outcome(&self, reply_to: Option<&ReplyTo>, outcome: &Outcome) {
        let mut sent = 0;

        if let Some(reply) = reply_to {
            match reply.upgrade() {
                Some(listener) => {
                    listener.notify(outcome);
                    sent += 1;
                }
                None => debug!("{}: reply destination no longer exists", self),
            }
        }

        sent += self.inner.listeners.notify_all(outcome, reply_to);

        if sent == 0 {
            error!(
                "{}: no one to send reply to (status: {:?}, metadata: {:?})",
                self, outcome.status, outcome.metadata
            );
        } else {
            debug!("{}: sent {:?} outcome to {} listeners", self, outcome.status, sent);
        }
    }
}

/// Marks the worker stopped when its loop ends, including by panic.
struct ExitGuard<'a>(&'a Worker);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.0.inner.state.store(STOPPED, Ordering::SeqCst);
        info!("{}: exiting", self.0);
    }
}

impl fmt::Display for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.id, f)
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}
