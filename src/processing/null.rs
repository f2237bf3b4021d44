use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::core::ImageEvent;
use crate::utils::TaskResult;
use crate::worker::Task;

/// Sleeps without touching the image. Useful to simulate slow work.
#[derive(Debug, Clone)]
pub struct NullTask {
    sleep: Duration,
}

impl NullTask {
    pub const NAME: &'static str = "do_nothing";
    pub const MIN_SLEEP: Duration = Duration::from_millis(1);
    pub const MAX_SLEEP: Duration = Duration::from_secs(60);
    pub const DEFAULT_SLEEP: Duration = Duration::from_secs(1);

    /// `sleep` is clamped to `[MIN_SLEEP, MAX_SLEEP]`.
    pub fn new(sleep: Duration) -> Self {
        Self {
            sleep: sleep.clamp(Self::MIN_SLEEP, Self::MAX_SLEEP),
        }
    }

    pub fn sleep(&self) -> Duration {
        self.sleep
    }
}

impl Default for NullTask {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SLEEP)
    }
}

impl Task for NullTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn execute(&self, _event: &mut ImageEvent) -> TaskResult<()> {
        thread::sleep(self.sleep);
        debug!("Null task slept {:?}", self.sleep);
        Ok(())
    }
}
