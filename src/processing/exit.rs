use tracing::info;

use crate::core::ImageEvent;
use crate::utils::TaskResult;
use crate::worker::Task;

/// Stops the worker that executes it. No outcome is sent for its event.
#[derive(Debug, Clone, Default)]
pub struct ExitTask;

impl ExitTask {
    pub const NAME: &'static str = "exit";

    pub fn new() -> Self {
        Self
    }
}

impl Task for ExitTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn execute(&self, _event: &mut ImageEvent) -> TaskResult<()> {
        info!("Exit task received");
        Ok(())
    }

    fn stops_worker(&self) -> bool {
        true
    }
}
