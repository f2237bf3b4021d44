use std::fmt;

use crate::core::ImageEvent;
use crate::utils::TaskResult;

/// A unit of work executed against an event's image.
///
/// Implementations validate their parameters when they are constructed and
/// return [`TaskError::Malformed`](crate::TaskError::Malformed) from the
/// constructor rather than from `execute`. A task may read the event's image
/// and replace it as a whole; it never leaves a half-modified image behind.
pub trait Task: Send + fmt::Debug {
    /// Name of the task, for logs and outcomes
    fn name(&self) -> &str;

    /// Runs the task. Any error abandons the rest of the event.
    fn execute(&self, event: &mut ImageEvent) -> TaskResult<()>;

    /// Whether the worker that runs this task should stop afterwards.
    fn stops_worker(&self) -> bool {
        false
    }
}
