mod error;
mod listeners;
mod pool;
mod processor;
mod queue;
mod registry;
mod task;

pub use error::{WorkerError, WorkerResult};
pub use listeners::ListenerRegistry;
pub use pool::WorkerPool;
pub use processor::{Worker, WorkerBuilder, WorkerState};
pub use queue::Queue;
pub use registry::WorkerRegistry;
pub use task::Task;
