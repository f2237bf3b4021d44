use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::{ImageEvent, Listener, PipelineConfig, Priority};
use crate::processing::ExitTask;
use crate::worker::error::{WorkerError, WorkerResult};
use crate::worker::processor::Worker;
use crate::worker::queue::Queue;
use crate::worker::registry::WorkerRegistry;

/// A fixed set of workers draining one shared queue.
pub struct WorkerPool {
    queue: Arc<Queue>,
    registry: Arc<WorkerRegistry>,
    workers: Vec<Worker>,
}

impl WorkerPool {
    pub fn new(config: &PipelineConfig) -> Self {
        let queue = Arc::new(Queue::with_capacity(config.queue_capacity));
        let registry = WorkerRegistry::new();

        let workers = (0..config.worker_count)
            .map(|_| {
                let id = registry.next_id();
                Worker::builder(id, Arc::clone(&queue))
                    .registry(Arc::clone(&registry))
                    .thread_name(format!("{}-{}", config.thread_name_prefix, id.0))
                    .build()
            })
            .collect::<Vec<_>>();

        debug!("Created pool with {} workers", workers.len());
        Self {
            queue,
            registry,
            workers,
        }
    }

    /// Starts every worker. Stops the ones already started if one fails.
    pub fn start(&self) -> WorkerResult<()> {
        for worker in &self.workers {
            if let Err(e) = worker.start() {
                warn!("Failed to start {}: {}", worker, e);
                let _ = self.stop_now();
                return Err(e);
            }
        }
        info!("Started {} workers", self.workers.len());
        Ok(())
    }

    pub fn queue(&self) -> &Arc<Queue> {
        &self.queue
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn submit(&self, event: ImageEvent) {
        self.queue.push(event);
    }

    /// Registers `listener` with every worker. Returns true if any worker
    /// did not have it yet.
    pub fn add_listener(&self, listener: &Arc<dyn Listener>) -> bool {
        self.workers
            .iter()
            .fold(false, |added, w| w.add_listener(Arc::clone(listener)) | added)
    }

    pub fn remove_listener(&self, listener: &Arc<dyn Listener>) -> bool {
        self.workers
            .iter()
            .fold(false, |removed, w| w.remove_listener(listener) | removed)
    }

    /// Number of worker loops currently running.
    pub fn running(&self) -> usize {
        self.registry.running()
    }

    /// Lets queued work drain, then stops and joins every worker.
    ///
    /// One low priority exit event is queued per worker, so everything
    /// already queued at a higher or equal band is processed first.
    pub fn shutdown(self) -> WorkerResult<()> {
        info!("Shutting down pool: {}", self.queue);
        for _ in self.workers.iter().filter(|w| w.is_running()) {
            self.queue
                .push(ImageEvent::new(Priority::Low).with_task(ExitTask::new()));
        }
        self.join_all()
    }

    /// Stops every worker after its current task. Queued events stay queued.
    pub fn stop_now(&self) -> WorkerResult<()> {
        for worker in &self.workers {
            worker.stop();
        }
        self.join_all()
    }

    fn join_all(&self) -> WorkerResult<()> {
        let mut first_error: Option<WorkerError> = None;
        for worker in &self.workers {
            if let Err(e) = worker.join() {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
