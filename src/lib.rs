// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod worker;
pub mod processing;

// Public exports for external consumers
pub use crate::core::{
    ChannelListener, ImageEvent, Listener, Outcome, OutcomeStatus, PipelineConfig, Priority,
    ReplyTo, TaskId, WorkerId,
};
pub use processing::{ExitTask, FileOperation, FileTask, Kernel, KernelTask, NullTask, ResizeTask};
pub use utils::{ConfigError, PathError, TaskError, TaskResult};
pub use worker::{Queue, Task, Worker, WorkerError, WorkerPool, WorkerRegistry, WorkerResult, WorkerState};

// The demonstration binary lives in main.rs and only uses this public API.
